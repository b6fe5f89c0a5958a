//! Key handling per focused panel and modal

use crate::app::{App, Focus, Modal, RelatedPanel, StudiesPanel};
use crate::runtime::Dispatcher;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use imseek_core::saved::write_export;

pub fn handle_event(ev: CEvent, app: &mut App, dispatcher: &Dispatcher) {
    let CEvent::Key(key) = ev else { return };
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.modal.is_some() {
        handle_modal_key(key, app);
        return;
    }

    // Global bindings
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => {
                app.should_quit = true;
                return;
            }
            KeyCode::Char('r') => {
                dispatcher.load_terms(app);
                return;
            }
            _ => {}
        }
    }
    match key.code {
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Terms => handle_terms_key(key, app),
        Focus::Query => handle_query_key(key, app, dispatcher),
        Focus::Studies => handle_studies_key(key, app),
        Focus::Related => handle_related_key(key, app),
        Focus::Saved => handle_saved_key(key, app),
    }
}

fn handle_modal_key(key: KeyEvent, app: &mut App) {
    let Some(modal) = app.modal.clone() else { return };
    match modal {
        Modal::Notice(_) => {
            app.modal = None;
        }
        Modal::ConfirmClear => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                app.saved.clear();
                app.saved_selected = 0;
                app.status = Some("Cleared saved studies.".to_string());
                app.modal = None;
            }
            _ => {
                app.modal = None;
            }
        },
        Modal::ExportName { mut input } => match key.code {
            KeyCode::Esc => {
                app.modal = None;
            }
            KeyCode::Enter => {
                app.modal = None;
                let base = input.trim().to_string();
                if base.is_empty() {
                    return;
                }
                let content = app.saved.export_text();
                let dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
                match write_export(&dir, &base, &content) {
                    Ok(path) => {
                        app.status = Some(format!("Exported to {}", path.display()));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "export failed");
                        app.modal = Some(Modal::Notice("Export failed.".to_string()));
                    }
                }
            }
            KeyCode::Backspace => {
                input.pop();
                app.modal = Some(Modal::ExportName { input });
            }
            KeyCode::Char(c) => {
                input.push(c);
                app.modal = Some(Modal::ExportName { input });
            }
            _ => {}
        },
    }
}

/// Panel A: filter typing, list navigation, selection into the query.
fn handle_terms_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up => {
            app.term_selected = app.term_selected.saturating_sub(1);
        }
        KeyCode::Down => {
            let visible = app.catalog.visible().len();
            if app.term_selected + 1 < visible {
                app.term_selected += 1;
            }
            app.ensure_term_chunk();
        }
        KeyCode::PageUp => {
            app.term_selected = app.term_selected.saturating_sub(20);
        }
        KeyCode::PageDown => {
            let visible = app.catalog.visible().len();
            app.term_selected = (app.term_selected + 20).min(visible.saturating_sub(1));
            app.ensure_term_chunk();
        }
        KeyCode::Enter => {
            if let Some(term) = app.selected_term().map(str::to_string) {
                app.append_query_term(&term);
                app.after_query_mutation();
                app.focus = Focus::Query;
            }
        }
        KeyCode::Backspace => {
            app.filter_input.pop();
            app.filter_debounce.trigger();
        }
        KeyCode::Char(c) => {
            app.filter_input.push(c);
            app.filter_debounce.trigger();
        }
        _ => {}
    }
}

/// Panel B: query editing. Enter bypasses the study-search debounce but
/// not the related-terms one.
fn handle_query_key(key: KeyEvent, app: &mut App, dispatcher: &Dispatcher) {
    match key.code {
        KeyCode::Enter => {
            if !app.search_inflight {
                app.search_debounce.cancel();
                dispatcher.search_studies(app);
            }
        }
        _ => {
            if app.query.input(key) {
                app.after_query_mutation();
            }
        }
    }
}

/// Panel C: result navigation and saving.
fn handle_studies_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up => {
            app.study_selected = app.study_selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if let StudiesPanel::Results { studies, .. } = &app.studies {
                if app.study_selected + 1 < studies.len() {
                    app.study_selected += 1;
                }
            }
        }
        KeyCode::Enter | KeyCode::Char('s') => {
            if let Some(study) = app.selected_study().cloned() {
                let title = study.title.clone();
                if app.saved.save(study) {
                    app.status = Some(format!("Saved: {title}"));
                } else {
                    app.status = Some("Already saved.".to_string());
                }
            }
        }
        _ => {}
    }
}

/// Related-terms chips: selection feeds back into the query, re-arming
/// this panel's own lookup.
fn handle_related_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Left | KeyCode::Up => {
            app.related_selected = app.related_selected.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Down => {
            if let RelatedPanel::Ready(items) = &app.related {
                if app.related_selected + 1 < items.len() {
                    app.related_selected += 1;
                }
            }
        }
        KeyCode::Enter => {
            if let Some(term) = app.selected_chip().map(|c| c.term.clone()) {
                app.append_query_term(&term);
                app.after_query_mutation();
            }
        }
        _ => {}
    }
}

/// Panel D: saved collection management.
fn handle_saved_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up => {
            app.saved_selected = app.saved_selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.saved_selected + 1 < app.saved.len() {
                app.saved_selected += 1;
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app
                .saved
                .items()
                .get(app.saved_selected)
                .map(|s| s.id.clone())
            {
                app.saved.delete(&id);
                app.saved_selected = app.saved_selected.min(app.saved.len().saturating_sub(1));
            }
        }
        KeyCode::Char('c') => {
            app.modal = Some(Modal::ConfirmClear);
        }
        KeyCode::Char('e') => {
            if app.saved.is_empty() {
                // Export from an empty collection is a blocking notice,
                // not a silent no-op.
                app.modal = Some(Modal::Notice("No saved studies to export.".to_string()));
            } else {
                app.modal = Some(Modal::ExportName {
                    input: "saved_studies".to_string(),
                });
            }
        }
        _ => {}
    }
}
