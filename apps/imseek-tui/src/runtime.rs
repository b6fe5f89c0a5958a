//! Event loop: terminal events, debounce polling, and network messages
//!
//! Single cooperative loop. Requests run in spawned tasks and answer over
//! one channel; each of the study and related panels carries a monotonic
//! request generation, and a response is rendered only when its captured
//! generation still matches the panel's latest, so a slow earlier request
//! can never overwrite a newer one.

use crate::app::{App, RelatedPanel, StudiesPanel};
use crate::{events, ui};
use crossterm::event::Event as CEvent;
use imseek_core::{
    catalog, coerce_related, coerce_studies, rank_related, ApiClient, ApiError, RelatedTerm,
    StudyPage,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug)]
pub enum NetMessage {
    Terms {
        result: std::result::Result<Vec<String>, ApiError>,
    },
    Studies {
        generation: u64,
        result: std::result::Result<StudyPage, ApiError>,
    },
    Related {
        generation: u64,
        result: std::result::Result<Vec<RelatedTerm>, ApiError>,
    },
}

/// Fans user intents out into spawned API calls.
pub struct Dispatcher {
    api: Arc<ApiClient>,
    tx: mpsc::UnboundedSender<NetMessage>,
}

impl Dispatcher {
    pub fn load_terms(&self, app: &mut App) {
        app.terms_loading = true;
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.terms().await.map(|p| catalog::coerce_terms(&p));
            let _ = tx.send(NetMessage::Terms { result });
        });
    }

    pub fn search_studies(&self, app: &mut App) {
        let query = app.query_text().trim().to_string();
        if query.is_empty() {
            app.studies = StudiesPanel::Prompt;
            return;
        }
        app.study_gen += 1;
        let generation = app.study_gen;
        app.search_inflight = true;
        app.studies = StudiesPanel::Loading;

        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.search_studies(&query).await.map(|p| coerce_studies(&p));
            let _ = tx.send(NetMessage::Studies { generation, result });
        });
    }

    pub fn lookup_related(&self, app: &mut App) {
        let query = app.query_text().trim().to_string();
        if query.is_empty() {
            app.related = RelatedPanel::Prompt;
            return;
        }
        app.related_gen += 1;
        let generation = app.related_gen;
        app.related = RelatedPanel::Loading;

        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api
                .related_terms(&query)
                .await
                .map(|p| rank_related(coerce_related(&p)));
            let _ = tx.send(NetMessage::Related { generation, result });
        });
    }
}

pub async fn run(api: Arc<ApiClient>, mut app: App) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

    let (net_tx, mut net_rx) = mpsc::unbounded_channel::<NetMessage>();
    let dispatcher = Dispatcher { api, tx: net_tx };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<CEvent>();
    std::thread::spawn(move || loop {
        if let Ok(true) = crossterm::event::poll(Duration::from_millis(50)) {
            if let Ok(ev) = crossterm::event::read() {
                if event_tx.send(ev).is_err() {
                    break;
                }
            }
        }
    });

    let mut tick = tokio::time::interval(Duration::from_millis(50));

    dispatcher.load_terms(&mut app);

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        select! {
            Some(ev) = event_rx.recv() => {
                events::handle_event(ev, &mut app, &dispatcher);
            }
            Some(msg) = net_rx.recv() => {
                handle_net(&mut app, msg);
            }
            _ = tick.tick() => {
                poll_debouncers(&mut app, &dispatcher);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn poll_debouncers(app: &mut App, dispatcher: &Dispatcher) {
    if app.filter_debounce.fire() {
        let keyword = app.filter_input.clone();
        app.catalog.apply_filter(&keyword);
        app.catalog.render_next_chunk();
        app.term_selected = 0;
    }
    if app.search_debounce.fire() {
        dispatcher.search_studies(app);
    }
    if app.related_debounce.fire() {
        dispatcher.lookup_related(app);
    }
}

fn handle_net(app: &mut App, msg: NetMessage) {
    match msg {
        NetMessage::Terms { result } => {
            app.terms_loading = false;
            match result {
                Ok(terms) => {
                    app.terms_error = None;
                    app.catalog.replace_all(terms);
                    app.catalog.render_next_chunk();
                    app.term_selected = 0;
                }
                Err(e) => {
                    // Previous catalog stays intact; only a first boot with
                    // nothing to show gets the inline error.
                    tracing::error!(error = %e, "failed to load terms");
                    if app.catalog.total_len() == 0 {
                        app.terms_error = Some("Failed to load terms.".to_string());
                    } else {
                        app.status = Some("Failed to refresh terms.".to_string());
                    }
                }
            }
        }
        NetMessage::Studies { generation, result } => {
            if generation != app.study_gen {
                tracing::debug!(generation, latest = app.study_gen, "discarding stale study response");
                return;
            }
            app.search_inflight = false;
            match result {
                Ok(page) if page.studies.is_empty() => {
                    app.studies = StudiesPanel::Empty;
                }
                Ok(page) => {
                    app.study_selected = 0;
                    app.studies = StudiesPanel::Results {
                        studies: page.studies,
                        total: page.total,
                    };
                }
                Err(e) => {
                    tracing::error!(error = %e, "study search failed");
                    app.studies = StudiesPanel::Error;
                }
            }
        }
        NetMessage::Related { generation, result } => {
            if generation != app.related_gen {
                tracing::debug!(generation, latest = app.related_gen, "discarding stale related response");
                return;
            }
            match result {
                Ok(items) if items.is_empty() => {
                    app.related = RelatedPanel::Empty;
                }
                Ok(items) => {
                    app.related_selected = 0;
                    app.related = RelatedPanel::Ready(items);
                }
                Err(e) => {
                    tracing::error!(error = %e, "related-terms lookup failed");
                    app.related = RelatedPanel::Error;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imseek_core::SavedCollection;

    fn ok_page(titles: &[&str], total: u64) -> std::result::Result<StudyPage, ApiError> {
        Ok(StudyPage {
            studies: titles
                .iter()
                .map(|t| imseek_core::Study {
                    id: t.to_string(),
                    title: t.to_string(),
                    journal: String::new(),
                    year: String::new(),
                    authors: String::new(),
                })
                .collect(),
            total,
        })
    }

    #[test]
    fn stale_study_responses_are_discarded() {
        let mut app = App::new(SavedCollection::in_memory());
        app.study_gen = 2;
        app.studies = StudiesPanel::Loading;

        // A response from generation 1 resolves after generation 2 was
        // issued; it must not render.
        handle_net(
            &mut app,
            NetMessage::Studies {
                generation: 1,
                result: ok_page(&["old"], 1),
            },
        );
        assert!(matches!(app.studies, StudiesPanel::Loading));

        handle_net(
            &mut app,
            NetMessage::Studies {
                generation: 2,
                result: ok_page(&["new"], 1),
            },
        );
        match &app.studies {
            StudiesPanel::Results { studies, .. } => assert_eq!(studies[0].title, "new"),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn empty_page_lands_in_empty_state() {
        let mut app = App::new(SavedCollection::in_memory());
        app.study_gen = 1;
        handle_net(
            &mut app,
            NetMessage::Studies {
                generation: 1,
                result: ok_page(&[], 0),
            },
        );
        assert!(matches!(app.studies, StudiesPanel::Empty));
    }

    #[test]
    fn zero_related_terms_hide_the_badge() {
        let mut app = App::new(SavedCollection::in_memory());
        app.related_gen = 1;
        handle_net(
            &mut app,
            NetMessage::Related {
                generation: 1,
                result: Ok(Vec::new()),
            },
        );
        assert!(matches!(app.related, RelatedPanel::Empty));
        assert_eq!(app.related.badge(), None);
    }

    #[test]
    fn wrapped_search_response_renders_count_badge() {
        let mut app = App::new(SavedCollection::in_memory());
        app.study_gen = 1;
        let payload = imseek_core::Payload::Text(
            "{\"studies\": [{\"title\": \"X\"}], \"count\": 1}".to_string(),
        );
        handle_net(
            &mut app,
            NetMessage::Studies {
                generation: 1,
                result: Ok(coerce_studies(&payload)),
            },
        );
        assert_eq!(app.studies.badge(), Some("1 result".to_string()));
        match &app.studies {
            StudiesPanel::Results { studies, .. } => assert_eq!(studies.len(), 1),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn terms_failure_keeps_previous_catalog() {
        let mut app = App::new(SavedCollection::in_memory());
        app.catalog.replace_all(vec!["kept".to_string()]);
        handle_net(
            &mut app,
            NetMessage::Terms {
                result: Err(ApiError::Network("down".to_string())),
            },
        );
        assert_eq!(app.catalog.total_len(), 1);
        assert!(app.terms_error.is_none());
        assert!(app.status.is_some());
    }

    #[test]
    fn boot_failure_surfaces_inline_error() {
        let mut app = App::new(SavedCollection::in_memory());
        handle_net(
            &mut app,
            NetMessage::Terms {
                result: Err(ApiError::Network("down".to_string())),
            },
        );
        assert!(app.terms_error.is_some());
    }
}
