//! Term catalog: the full vocabulary plus a filtered, chunk-rendered view
//!
//! The catalog is loaded once at startup and may be refreshed in full.
//! Filtering is a case-insensitive prefix match (not substring) over the
//! whole vocabulary. Rendering is paginated through a cursor so a large
//! view reaches the screen in 200-item chunks, driven by scroll position.

use crate::api::Payload;

/// Chunk size for incremental rendering.
pub const TERMS_PAGE: usize = 200;

#[derive(Debug, Default)]
pub struct TermCatalog {
    all: Vec<String>,
    view: Vec<String>,
    rendered: usize,
    keyword: String,
}

impl TermCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole vocabulary (startup load or explicit refresh).
    /// The current keyword is re-applied and the render cursor reset.
    pub fn replace_all(&mut self, terms: Vec<String>) {
        self.all = terms;
        let keyword = self.keyword.clone();
        self.apply_filter(&keyword);
    }

    /// Recompute the view for `keyword` and reset the render cursor.
    /// An empty or whitespace-only keyword restores the full catalog.
    pub fn apply_filter(&mut self, keyword: &str) {
        self.keyword = keyword.to_string();
        self.view = filter_terms(&self.all, keyword);
        self.rendered = 0;
    }

    /// Advance the render cursor by up to [`TERMS_PAGE`] items and return
    /// the newly visible slice. No-op on an exhausted view.
    pub fn render_next_chunk(&mut self) -> &[String] {
        let start = self.rendered;
        let end = (start + TERMS_PAGE).min(self.view.len());
        self.rendered = end;
        &self.view[start..end]
    }

    /// The items rendered so far, in view order.
    pub fn visible(&self) -> &[String] {
        &self.view[..self.rendered]
    }

    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn total_len(&self) -> usize {
        self.all.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.rendered >= self.view.len()
    }
}

/// Case-insensitive prefix filter over the vocabulary. Pure and
/// deterministic; an empty keyword returns the full catalog.
pub fn filter_terms(all: &[String], keyword: &str) -> Vec<String> {
    let kw = keyword.trim().to_lowercase();
    if kw.is_empty() {
        return all.to_vec();
    }
    all.iter()
        .filter(|t| t.to_lowercase().starts_with(&kw))
        .cloned()
        .collect()
}

/// Coerce a `/terms` payload into a vocabulary list: a bare array or an
/// object with a `terms` array; anything else degrades to empty.
pub fn coerce_terms(payload: &Payload) -> Vec<String> {
    let Some(value) = payload.to_value() else {
        return Vec::new();
    };
    let items = match &value {
        serde_json::Value::Array(items) => items.as_slice(),
        serde_json::Value::Object(obj) => match obj.get("terms") {
            Some(serde_json::Value::Array(items)) => items.as_slice(),
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items
        .iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vocab() -> Vec<String> {
        ["Memory", "memory consolidation", "motor", "attention"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn filter_is_prefix_only_and_case_insensitive() {
        let out = filter_terms(&vocab(), "MEM");
        assert_eq!(out, vec!["Memory", "memory consolidation"]);
        // "emo" is a substring of "Memory" but not a prefix
        assert!(filter_terms(&vocab(), "emo").is_empty());
    }

    #[test]
    fn empty_keyword_returns_full_catalog() {
        assert_eq!(filter_terms(&vocab(), ""), vocab());
        assert_eq!(filter_terms(&vocab(), "   "), vocab());
    }

    #[test]
    fn chunk_rendering_is_append_only_and_idempotent() {
        let mut catalog = TermCatalog::new();
        catalog.replace_all((0..450).map(|i| format!("term{i:04}")).collect());

        assert_eq!(catalog.render_next_chunk().len(), TERMS_PAGE);
        assert_eq!(catalog.render_next_chunk().len(), TERMS_PAGE);
        assert_eq!(catalog.render_next_chunk().len(), 50);
        assert_eq!(catalog.rendered(), 450);

        // Exhausted: further calls must not mutate the visible list.
        assert!(catalog.render_next_chunk().is_empty());
        assert_eq!(catalog.rendered(), 450);
        assert_eq!(catalog.visible().len(), 450);
    }

    #[test]
    fn new_filter_resets_render_cursor() {
        let mut catalog = TermCatalog::new();
        catalog.replace_all((0..300).map(|i| format!("term{i:04}")).collect());
        catalog.render_next_chunk();
        assert_eq!(catalog.rendered(), TERMS_PAGE);

        catalog.apply_filter("term00");
        assert_eq!(catalog.rendered(), 0);
        assert_eq!(catalog.view_len(), 100);
    }

    #[test]
    fn replace_all_reapplies_current_keyword() {
        let mut catalog = TermCatalog::new();
        catalog.apply_filter("mem");
        catalog.replace_all(vocab());
        assert_eq!(catalog.view_len(), 2);
    }

    #[test]
    fn coerce_terms_accepts_bare_array_and_wrapper() {
        let bare = Payload::Json(json!(["alpha", "beta"]));
        assert_eq!(coerce_terms(&bare), vec!["alpha", "beta"]);

        let wrapped = Payload::Json(json!({ "terms": ["gamma"] }));
        assert_eq!(coerce_terms(&wrapped), vec!["gamma"]);

        let malformed = Payload::Json(json!({ "nope": 1 }));
        assert!(coerce_terms(&malformed).is_empty());

        let text = Payload::Text("[\"delta\"]".to_string());
        assert_eq!(coerce_terms(&text), vec!["delta"]);
    }
}
