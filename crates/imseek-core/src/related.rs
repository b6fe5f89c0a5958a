//! Related-term coercion and ranking
//!
//! The co-occurrence endpoint answers `{related: [...]}` most of the time
//! but may also return a bare array, a `{results|terms: [...]}` wrapper,
//! or a JSON-encoded string of any of these. Candidates are coerced into
//! canonical [`RelatedTerm`] records, ranked by co-occurrence count, and
//! truncated before rendering as chips.

use crate::api::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of chips surfaced after ranking.
pub const RELATED_TOP: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelatedTerm {
    pub term: String,
    /// Co-occurrence count with the query terms; the ranking key.
    pub count: u64,
    /// Similarity score in 0..1. Display-only, never used for ordering.
    pub jaccard: f64,
}

impl RelatedTerm {
    /// Chip label: term and count glued together, e.g. `apple 329`.
    pub fn label(&self) -> String {
        format!("{} {}", self.term, self.count)
    }
}

/// Coerce a related-terms payload into candidates. Unrecognized shapes
/// yield an empty list, never an error; empty-term candidates are dropped.
pub fn coerce_related(payload: &Payload) -> Vec<RelatedTerm> {
    let Some(value) = payload.to_value() else {
        return Vec::new();
    };

    let items: &[Value] = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => match obj
            .get("related")
            .or_else(|| obj.get("results"))
            .or_else(|| obj.get("terms"))
        {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    items
        .iter()
        .filter_map(|item| {
            let term = item.get("term").and_then(Value::as_str).unwrap_or("");
            if term.is_empty() {
                return None;
            }
            Some(RelatedTerm {
                term: term.to_string(),
                count: number_field(item, &["co_count", "count"]),
                jaccard: item
                    .get("jaccard")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
            })
        })
        .collect()
}

/// Rank by count descending, preserving the original relative order among
/// equal counts, and truncate to the top [`RELATED_TOP`].
pub fn rank_related(mut items: Vec<RelatedTerm>) -> Vec<RelatedTerm> {
    items.sort_by(|a, b| b.count.cmp(&a.count));
    items.truncate(RELATED_TOP);
    items
}

fn number_field(item: &Value, keys: &[&str]) -> u64 {
    keys.iter()
        .find_map(|key| item.get(key).and_then(Value::as_u64))
        .unwrap_or(0)
}
