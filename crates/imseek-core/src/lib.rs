//! imseek-core: core library for the imseek exploratory search client
//!
//! This library provides the non-terminal logic of imseek:
//! - API access to the term/study index (terms, related terms, study search)
//! - Tolerant response normalization into canonical records
//! - Term catalog with prefix filtering and chunked rendering
//! - Related-term ranking
//! - Saved collection with durable persistence and text export
//! - Debounce primitive shared by every live-input consumer
//!
//! The TUI frontend composes these into coordinated panels.

pub mod api;
pub mod catalog;
pub mod debounce;
pub mod error;
pub mod query;
pub mod related;
pub mod saved;
pub mod study;

// Re-export main types for convenience
pub use api::{ApiClient, Payload, DEFAULT_API_BASE};
pub use catalog::{TermCatalog, TERMS_PAGE};
pub use debounce::Debouncer;
pub use error::{ApiError, StoreError};
pub use query::append_term;
pub use related::{coerce_related, rank_related, RelatedTerm, RELATED_TOP};
pub use saved::{sanitize_file_base, SavedCollection, SavedStore};
pub use study::{coerce_studies, normalize_study, Study, StudyPage};
