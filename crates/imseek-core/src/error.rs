//! Error types shared across imseek-core

use thiserror::Error;

/// Failure talking to the remote term/study index.
///
/// `Status` keeps the full diagnostic context (URL, status text, body) so
/// the frontend can log it; the end user only ever sees a generic message.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status} {status_text} for {url}")]
    Status {
        status: u16,
        status_text: String,
        url: String,
        body: String,
    },
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("request timed out")]
    Timeout,
}

/// Failure persisting or loading the saved collection.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
