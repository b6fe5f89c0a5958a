//! Application state: the four coordinated panels and their debouncers

use imseek_core::{
    append_term, Debouncer, RelatedTerm, SavedCollection, Study, TermCatalog,
};
use std::time::Duration;
use tui_textarea::{CursorMove, TextArea};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);
pub const RELATED_DEBOUNCE: Duration = Duration::from_millis(400);
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(200);

/// When the term-list selection comes within this many rows of the end of
/// the rendered items, the next chunk is rendered (infinite scroll).
pub const SCROLL_THRESHOLD: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Terms,
    Query,
    Studies,
    Related,
    Saved,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Terms => Focus::Query,
            Focus::Query => Focus::Related,
            Focus::Related => Focus::Studies,
            Focus::Studies => Focus::Saved,
            Focus::Saved => Focus::Terms,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Terms => Focus::Saved,
            Focus::Query => Focus::Terms,
            Focus::Related => Focus::Query,
            Focus::Studies => Focus::Related,
            Focus::Saved => Focus::Studies,
        }
    }
}

/// Study panel state machine. Re-entrant: every new query restarts at
/// `Loading`.
#[derive(Debug, Clone)]
pub enum StudiesPanel {
    Prompt,
    Loading,
    Results { studies: Vec<Study>, total: u64 },
    Empty,
    Error,
}

impl StudiesPanel {
    /// Count badge text; hidden (None) in Prompt, Loading and Error.
    /// Empty shows an explicit `0 results`.
    pub fn badge(&self) -> Option<String> {
        match self {
            StudiesPanel::Results { total, .. } => Some(result_badge(*total)),
            StudiesPanel::Empty => Some(result_badge(0)),
            _ => None,
        }
    }
}

/// Related-terms panel state machine. Unlike the study panel, a zero
/// result set hides the badge entirely.
#[derive(Debug, Clone)]
pub enum RelatedPanel {
    Prompt,
    Loading,
    Ready(Vec<RelatedTerm>),
    Empty,
    Error,
}

impl RelatedPanel {
    pub fn badge(&self) -> Option<String> {
        match self {
            RelatedPanel::Ready(items) => {
                let n = items.len();
                Some(format!("{} term{}", n, if n == 1 { "" } else { "s" }))
            }
            _ => None,
        }
    }
}

fn result_badge(n: u64) -> String {
    format!("{} result{}", n, if n == 1 { "" } else { "s" })
}

#[derive(Debug, Clone)]
pub enum Modal {
    ConfirmClear,
    ExportName { input: String },
    Notice(String),
}

pub struct App {
    pub focus: Focus,

    pub catalog: TermCatalog,
    pub filter_input: String,
    pub terms_error: Option<String>,
    pub terms_loading: bool,
    pub term_selected: usize,

    pub query: TextArea<'static>,

    pub studies: StudiesPanel,
    pub study_selected: usize,
    pub study_gen: u64,
    pub search_inflight: bool,

    pub related: RelatedPanel,
    pub related_selected: usize,
    pub related_gen: u64,

    pub saved: SavedCollection,
    pub saved_selected: usize,

    pub search_debounce: Debouncer,
    pub related_debounce: Debouncer,
    pub filter_debounce: Debouncer,

    pub modal: Option<Modal>,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(saved: SavedCollection) -> Self {
        Self {
            focus: Focus::Terms,
            catalog: TermCatalog::new(),
            filter_input: String::new(),
            terms_error: None,
            terms_loading: true,
            term_selected: 0,
            query: TextArea::default(),
            studies: StudiesPanel::Prompt,
            study_selected: 0,
            study_gen: 0,
            search_inflight: false,
            related: RelatedPanel::Prompt,
            related_selected: 0,
            related_gen: 0,
            saved,
            saved_selected: 0,
            search_debounce: Debouncer::new(SEARCH_DEBOUNCE),
            related_debounce: Debouncer::new(RELATED_DEBOUNCE),
            filter_debounce: Debouncer::new(FILTER_DEBOUNCE),
            modal: None,
            status: None,
            should_quit: false,
        }
    }

    pub fn query_text(&self) -> String {
        self.query.lines().join(" ")
    }

    /// Append a term to the query buffer, caret landing at end of text.
    pub fn append_query_term(&mut self, term: &str) {
        let current = self.query_text();
        let updated = append_term(&current, term);
        let suffix = updated[current.len()..].to_string();
        self.query.move_cursor(CursorMove::End);
        self.query.insert_str(&suffix);
    }

    /// Side effects shared by every query mutation path (typing, term
    /// selection, chip selection): arm both panel debouncers. Each panel
    /// has exactly one debouncer, so a click racing with typing still
    /// collapses into a single request per panel.
    pub fn after_query_mutation(&mut self) {
        self.search_debounce.trigger();
        self.related_debounce.trigger();
    }

    /// Render the next catalog chunk when the selection nears the bottom
    /// of the rendered items.
    pub fn ensure_term_chunk(&mut self) {
        if !self.catalog.is_exhausted()
            && self.term_selected + SCROLL_THRESHOLD >= self.catalog.rendered()
        {
            self.catalog.render_next_chunk();
        }
    }

    pub fn selected_term(&self) -> Option<&str> {
        self.catalog
            .visible()
            .get(self.term_selected)
            .map(String::as_str)
    }

    pub fn selected_chip(&self) -> Option<&RelatedTerm> {
        match &self.related {
            RelatedPanel::Ready(items) => items.get(self.related_selected),
            _ => None,
        }
    }

    pub fn selected_study(&self) -> Option<&Study> {
        match &self.studies {
            StudiesPanel::Results { studies, .. } => studies.get(self.study_selected),
            _ => None,
        }
    }
}
