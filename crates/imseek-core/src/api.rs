//! HTTP client for the remote term/study index
//!
//! The service speaks JSON most of the time but occasionally returns plain
//! text (sometimes itself JSON-encoded), so responses are sniffed by
//! content type and carried as a [`Payload`] for the tolerant coercers
//! downstream.

use crate::error::ApiError;
use reqwest::Client;
use std::time::Duration;

/// Default base URL of the upstream index.
pub const DEFAULT_API_BASE: &str = "https://mil.psy.ntu.edu.tw:5000";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A sniffed response body: parsed JSON when the server declared it,
/// otherwise the raw text.
#[derive(Clone, Debug)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
}

impl Payload {
    /// Resolve the payload to a JSON value, unwrapping one level of
    /// string-encoded JSON (a JSON string body, or a text body that parses
    /// as JSON). Returns `None` when no JSON shape can be recovered.
    pub fn to_value(&self) -> Option<serde_json::Value> {
        match self {
            Payload::Json(serde_json::Value::String(inner)) => serde_json::from_str(inner).ok(),
            Payload::Json(value) => Some(value.clone()),
            Payload::Text(text) => serde_json::from_str(text).ok(),
        }
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Percent-encode a query for use as a path segment. Trims first.
    pub fn encode_query(query: &str) -> String {
        urlencoding::encode(query.trim()).into_owned()
    }

    pub async fn get(&self, path: &str) -> Result<Payload, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json, text/plain; q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout
                } else {
                    ApiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                url,
                body,
            });
        }

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if is_json {
            let value =
                serde_json::from_str(&body).map_err(|e| ApiError::Network(e.to_string()))?;
            Ok(Payload::Json(value))
        } else {
            Ok(Payload::Text(body))
        }
    }

    /// `GET /terms` — the full vocabulary.
    pub async fn terms(&self) -> Result<Payload, ApiError> {
        self.get("/terms").await
    }

    /// `GET /terms/{query}` — co-occurrence candidates for a query.
    pub async fn related_terms(&self, query: &str) -> Result<Payload, ApiError> {
        self.get(&format!("/terms/{}", Self::encode_query(query)))
            .await
    }

    /// `GET /query/{query}/studies` — studies matching a query.
    pub async fn search_studies(&self, query: &str) -> Result<Payload, ApiError> {
        self.get(&format!("/query/{}/studies", Self::encode_query(query)))
            .await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}
