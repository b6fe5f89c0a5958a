//! Saved collection: durable, deduplicated bookmark list of studies
//!
//! The whole collection is one JSON array at a fixed path, atomically
//! replaced on every mutation. Storage failures never interrupt the user:
//! a corrupt or absent file loads as an empty collection, and write
//! failures are logged and swallowed.

use crate::error::StoreError;
use crate::study::Study;
use std::fs;
use std::path::{Path, PathBuf};

const STORE_FILE: &str = "saved_studies.json";
const EXPORT_RULE_WIDTH: usize = 40;

/// File-backed JSON store for the saved collection.
#[derive(Debug, Clone)]
pub struct SavedStore {
    path: PathBuf,
}

impl SavedStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("imseek").join(STORE_FILE))
    }

    /// Load the collection, degrading to empty on absence or corruption.
    pub fn load(&self) -> Vec<Study> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt saved store, starting empty");
                Vec::new()
            }
        }
    }

    /// Replace the stored collection atomically (write-then-rename).
    pub fn persist(&self, items: &[Study]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json =
            serde_json::to_string(items).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Deduplicated, most-recent-first set of saved studies.
#[derive(Debug, Default)]
pub struct SavedCollection {
    items: Vec<Study>,
    store: Option<SavedStore>,
}

impl SavedCollection {
    /// Load from a store; every mutation writes back through it.
    pub fn load(store: SavedStore) -> Self {
        let items = store.load();
        Self {
            items,
            store: Some(store),
        }
    }

    /// Collection without persistence.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Study] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Save a study. No-op on an empty id or a duplicate (by id); new
    /// saves prepend so the collection stays most-recent-first.
    pub fn save(&mut self, study: Study) -> bool {
        if study.id.is_empty() || self.items.iter().any(|s| s.id == study.id) {
            return false;
        }
        self.items.insert(0, study);
        self.write_back();
        true
    }

    /// Remove all entries with this id; persists only on actual removal.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|s| s.id != id);
        if self.items.len() != before {
            self.write_back();
            true
        } else {
            false
        }
    }

    /// Empty the collection. Confirmation is the frontend's job.
    pub fn clear(&mut self) {
        self.items.clear();
        self.write_back();
    }

    /// Plain-text export: one block per study, most-recent-first, blocks
    /// separated by a fixed-width dashed rule.
    pub fn export_text(&self) -> String {
        self.items
            .iter()
            .map(|s| {
                [
                    format!("Title: {}", s.title),
                    format!("Authors: {}", s.authors),
                    format!("Journal: {}", s.journal),
                    format!("Year: {}", s.year),
                    format!("ID: {}", s.id),
                    "-".repeat(EXPORT_RULE_WIDTH),
                ]
                .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn write_back(&self) {
        let Some(store) = &self.store else { return };
        if let Err(e) = store.persist(&self.items) {
            tracing::warn!(error = %e, "failed to persist saved collection");
        }
    }
}

/// Sanitize a user-supplied export base name by replacing path-unsafe
/// characters with underscores.
pub fn sanitize_file_base(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

/// Write the export document next to `dir` as `<base>.txt`.
pub fn write_export(dir: &Path, base: &str, content: &str) -> Result<PathBuf, StoreError> {
    let path = dir.join(format!("{}.txt", sanitize_file_base(base)));
    fs::write(&path, content)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn study(id: &str, title: &str) -> Study {
        Study {
            id: id.to_string(),
            title: title.to_string(),
            journal: "J".to_string(),
            year: "2020".to_string(),
            authors: "A, B".to_string(),
        }
    }

    #[test]
    fn save_dedups_by_id_and_keeps_position() {
        let mut saved = SavedCollection::in_memory();
        assert!(saved.save(study("a", "First")));
        assert!(saved.save(study("b", "Second")));
        assert!(!saved.save(study("a", "First again")));
        assert_eq!(saved.len(), 2);
        // Original position preserved: "a" is still last.
        assert_eq!(saved.items()[1].id, "a");
    }

    #[test]
    fn saves_are_most_recent_first() {
        let mut saved = SavedCollection::in_memory();
        saved.save(study("a", "A"));
        saved.save(study("b", "B"));
        let ids: Vec<&str> = saved.items().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn save_rejects_empty_id() {
        let mut saved = SavedCollection::in_memory();
        assert!(!saved.save(study("", "No id")));
        assert!(saved.is_empty());
    }

    #[test]
    fn delete_removes_all_matches_only() {
        let mut saved = SavedCollection::in_memory();
        saved.save(study("a", "A"));
        saved.save(study("b", "B"));
        assert!(saved.delete("a"));
        assert!(!saved.delete("a"));
        assert_eq!(saved.len(), 1);
        assert_eq!(saved.items()[0].id, "b");
    }

    #[test]
    fn export_round_trips_field_tuples_in_order() {
        let mut saved = SavedCollection::in_memory();
        saved.save(study("a", "First"));
        saved.save(study("b", "Second"));

        let text = saved.export_text();
        let rule = "-".repeat(EXPORT_RULE_WIDTH);
        let parsed: Vec<Vec<String>> = text
            .split(&format!("{rule}\n"))
            .filter(|block| !block.trim().is_empty())
            .map(|block| {
                block
                    .lines()
                    .filter(|l| l.contains(": "))
                    .map(|l| l.split_once(": ").unwrap().1.to_string())
                    .collect()
            })
            .collect();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], vec!["Second", "A, B", "J", "2020", "b"]);
        assert_eq!(parsed[1], vec!["First", "A, B", "J", "2020", "a"]);
    }

    #[test]
    fn sanitize_replaces_path_unsafe_characters() {
        assert_eq!(sanitize_file_base("a/b\\c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_file_base("plain name"), "plain name");
    }
}
