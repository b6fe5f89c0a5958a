//! Study record normalization
//!
//! The study index returns heterogeneous shapes: a bare array, an object
//! wrapping a `results` or `studies` array, or a JSON-encoded string of
//! either. Individual records vary in field casing and naming. Everything
//! is normalized here into one canonical [`Study`] before any rendering;
//! unrecognized shapes degrade to an empty page, never an error.

use crate::api::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical, post-normalization study record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    pub id: String,
    pub title: String,
    pub journal: String,
    pub year: String,
    pub authors: String,
}

/// One normalized search response.
#[derive(Clone, Debug, Default)]
pub struct StudyPage {
    pub studies: Vec<Study>,
    /// Total reported by the service when it carries a numeric `count`
    /// field, which may exceed the returned page; otherwise the page
    /// length.
    pub total: u64,
}

/// Normalize one raw record, trying the known field aliases before
/// falling back to placeholders.
///
/// The id falls back to the title when no identifier is present, so two
/// unidentified records with the same title collide in the saved
/// collection. Accepted ambiguity of the upstream data.
pub fn normalize_study(item: &Value) -> Study {
    let title = first_string(item, &["title", "Title", "paper_title"])
        .unwrap_or_else(|| "Untitled".to_string());
    let journal = first_string(item, &["journal", "Journal", "source"]).unwrap_or_default();
    let year = first_string(item, &["year", "Year", "pub_year"]).unwrap_or_default();
    let authors = resolve_authors(item);
    let id = first_string(item, &["id", "pmid", "doi"]).unwrap_or_else(|| title.clone());

    Study {
        id,
        title,
        journal,
        year,
        authors,
    }
}

/// Coerce a search payload into a canonical page.
pub fn coerce_studies(payload: &Payload) -> StudyPage {
    let Some(value) = payload.to_value() else {
        return StudyPage::default();
    };

    let items: &[Value] = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => match obj.get("results").or_else(|| obj.get("studies")) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    let studies: Vec<Study> = items.iter().map(normalize_study).collect();
    let total = value
        .get("count")
        .and_then(Value::as_u64)
        .unwrap_or(studies.len() as u64);

    StudyPage { studies, total }
}

fn first_string(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match item.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn resolve_authors(item: &Value) -> String {
    for key in ["authors", "Authors", "author"] {
        match item.get(key) {
            Some(Value::Array(list)) => {
                return list
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
            }
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            _ => {}
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_resolves_aliases_and_placeholders() {
        let study = normalize_study(&json!({
            "paper_title": "Neural correlates of memory",
            "Journal": "J Neurosci",
            "pub_year": 2019,
            "authors": ["Smith J", "Doe A"],
            "pmid": "12345678"
        }));
        assert_eq!(study.title, "Neural correlates of memory");
        assert_eq!(study.journal, "J Neurosci");
        assert_eq!(study.year, "2019");
        assert_eq!(study.authors, "Smith J, Doe A");
        assert_eq!(study.id, "12345678");
    }

    #[test]
    fn normalize_falls_back_to_title_as_id() {
        let study = normalize_study(&json!({ "title": "Only a title" }));
        assert_eq!(study.id, "Only a title");
        assert_eq!(study.journal, "");
        assert_eq!(study.authors, "");
    }

    #[test]
    fn normalize_defaults_missing_title() {
        let study = normalize_study(&json!({}));
        assert_eq!(study.title, "Untitled");
        assert_eq!(study.id, "Untitled");
    }

    #[test]
    fn coerce_accepts_bare_array() {
        let page = coerce_studies(&Payload::Json(json!([{ "title": "X" }])));
        assert_eq!(page.studies.len(), 1);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn coerce_accepts_wrapped_arrays() {
        let page = coerce_studies(&Payload::Json(json!({ "results": [{ "title": "X" }] })));
        assert_eq!(page.studies.len(), 1);

        let page = coerce_studies(&Payload::Json(json!({ "studies": [{ "title": "X" }] })));
        assert_eq!(page.studies.len(), 1);
    }

    #[test]
    fn coerce_accepts_json_encoded_string() {
        let page = coerce_studies(&Payload::Text(
            "{\"studies\": [{\"title\": \"X\"}], \"count\": 42}".to_string(),
        ));
        assert_eq!(page.studies.len(), 1);
        assert_eq!(page.total, 42);
    }

    #[test]
    fn coerce_prefers_explicit_count_over_page_length() {
        let page = coerce_studies(&Payload::Json(json!({
            "studies": [{ "title": "X" }],
            "count": 1
        })));
        assert_eq!(page.studies.len(), 1);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn unrecognized_shapes_degrade_to_empty() {
        assert!(coerce_studies(&Payload::Json(json!(42))).studies.is_empty());
        assert!(coerce_studies(&Payload::Text("plain prose".to_string()))
            .studies
            .is_empty());
        assert!(coerce_studies(&Payload::Json(json!({ "other": [] })))
            .studies
            .is_empty());
    }
}
