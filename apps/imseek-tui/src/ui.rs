//! Panel rendering

use crate::app::{App, Focus, Modal, RelatedPanel, StudiesPanel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(outer[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(6),
            Constraint::Length(9),
        ])
        .split(columns[1]);

    draw_filter(f, app, left[0]);
    draw_terms(f, app, left[1]);
    draw_query(f, app, right[0]);
    draw_related(f, app, right[1]);
    draw_studies(f, app, right[2]);
    draw_saved(f, app, right[3]);
    draw_status(f, app, outer[1]);

    if app.modal.is_some() {
        let area = f.area();
        draw_modal(f, app, area);
    }
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn dim(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

fn error_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Red),
    ))
}

fn draw_filter(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Terms;
    let text = if focused {
        format!("{}\u{2588}", app.filter_input)
    } else {
        app.filter_input.clone()
    };
    let widget = Paragraph::new(text).block(panel_block("Filter".to_string(), focused));
    f.render_widget(widget, area);
}

fn draw_terms(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Terms;
    let title = if app.terms_loading {
        "Terms (loading…)".to_string()
    } else {
        format!(
            "Terms ({}/{})",
            app.catalog.rendered(),
            app.catalog.view_len()
        )
    };
    let block = panel_block(title, focused);

    // A refresh keeps the previous catalog on screen; only a first boot
    // with nothing loaded yet shows the placeholder.
    if app.terms_loading && app.catalog.total_len() == 0 {
        f.render_widget(Paragraph::new(dim("Loading terms…")).block(block), area);
        return;
    }
    if let Some(msg) = &app.terms_error {
        f.render_widget(Paragraph::new(error_line(msg)).block(block), area);
        return;
    }
    if app.catalog.visible().is_empty() {
        f.render_widget(Paragraph::new(dim("No matching terms")).block(block), area);
        return;
    }

    let items: Vec<ListItem> = app
        .catalog
        .visible()
        .iter()
        .map(|t| ListItem::new(t.clone()))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    state.select(Some(app.term_selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_query(f: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Query;
    app.query.set_block(panel_block("Query".to_string(), focused));
    app.query.set_cursor_line_style(Style::default());
    f.render_widget(&app.query, area);
}

fn draw_studies(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Studies;
    let title = match app.studies.badge() {
        Some(badge) => format!("Studies — {badge}"),
        None => "Studies".to_string(),
    };
    let block = panel_block(title, focused);

    match &app.studies {
        StudiesPanel::Prompt => {
            f.render_widget(
                Paragraph::new(dim("Type a query above to search studies.")).block(block),
                area,
            );
        }
        StudiesPanel::Loading => {
            f.render_widget(Paragraph::new(dim("Searching…")).block(block), area);
        }
        StudiesPanel::Empty => {
            f.render_widget(Paragraph::new(dim("No studies found.")).block(block), area);
        }
        StudiesPanel::Error => {
            f.render_widget(
                Paragraph::new(error_line("Something went wrong. Please try again."))
                    .block(block),
                area,
            );
        }
        StudiesPanel::Results { studies, .. } => {
            let items: Vec<ListItem> = studies
                .iter()
                .map(|s| {
                    let detail = format!(
                        "  {} · {} · {}",
                        or_dash(&s.authors),
                        or_dash(&s.journal),
                        or_dash(&s.year)
                    );
                    ListItem::new(vec![
                        Line::from(Span::styled(
                            s.title.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                        dim(&detail),
                    ])
                })
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            let mut state = ListState::default();
            state.select(Some(app.study_selected));
            f.render_stateful_widget(list, area, &mut state);
        }
    }
}

fn draw_related(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Related;
    let title = match app.related.badge() {
        Some(badge) => format!("Related Terms — {badge}"),
        None => "Related Terms".to_string(),
    };
    let block = panel_block(title, focused);

    match &app.related {
        RelatedPanel::Prompt => {
            f.render_widget(
                Paragraph::new(dim("Type a query above to see related terms.")).block(block),
                area,
            );
        }
        RelatedPanel::Loading => {
            f.render_widget(
                Paragraph::new(dim("Loading related terms…")).block(block),
                area,
            );
        }
        RelatedPanel::Empty => {
            f.render_widget(Paragraph::new(dim("No related terms.")).block(block), area);
        }
        RelatedPanel::Error => {
            f.render_widget(
                Paragraph::new(error_line("Failed to load related terms.")).block(block),
                area,
            );
        }
        RelatedPanel::Ready(items) => {
            let lines = chip_lines(items, app.related_selected, area.width.saturating_sub(2));
            f.render_widget(Paragraph::new(lines).block(block), area);
        }
    }
}

/// Flow chips left to right, wrapping whole chips onto new rows.
fn chip_lines(
    items: &[imseek_core::RelatedTerm],
    selected: usize,
    width: u16,
) -> Vec<Line<'static>> {
    let width = width.max(1) as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut used = 0usize;

    for (i, chip) in items.iter().enumerate() {
        let label = format!(" {} ", chip.label());
        let len = label.chars().count() + 1;
        if used + len > width && !current.is_empty() {
            lines.push(Line::from(std::mem::take(&mut current)));
            used = 0;
        }
        let style = if i == selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().bg(Color::Rgb(40, 40, 48))
        };
        current.push(Span::styled(label, style));
        current.push(Span::raw(" "));
        used += len;
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

fn draw_saved(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Saved;
    let block = panel_block(format!("Saved ({})", app.saved.len()), focused);

    if app.saved.is_empty() {
        f.render_widget(Paragraph::new(dim("Nothing saved yet.")).block(block), area);
        return;
    }

    let items: Vec<ListItem> = app
        .saved
        .items()
        .iter()
        .map(|s| {
            let detail = format!("  {} · {}", or_dash(&s.journal), or_dash(&s.year));
            ListItem::new(vec![Line::from(s.title.clone()), dim(&detail)])
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    state.select(Some(app.saved_selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let hint = match app.focus {
        Focus::Terms => "type: filter · enter: add to query · ctrl-r: refresh",
        Focus::Query => "type to search · enter: run now",
        Focus::Studies => "↑↓: move · s/enter: save",
        Focus::Related => "←→: move · enter: add to query",
        Focus::Saved => "↑↓: move · d: delete · c: clear · e: export",
    };
    let mut spans = vec![Span::styled(
        format!(" {hint} · tab: next panel · ctrl-c: quit "),
        Style::default().fg(Color::DarkGray),
    )];
    // Chip similarity is auxiliary detail, shown here rather than ordering
    // anything.
    if app.focus == Focus::Related {
        if let Some(chip) = app.selected_chip() {
            spans.push(Span::raw(format!(
                " co-occurrence: {} · jaccard: {:.3} ",
                chip.count, chip.jaccard
            )));
        }
    }
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Green),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_modal(f: &mut Frame, app: &App, area: Rect) {
    let Some(modal) = &app.modal else { return };
    let rect = centered_rect(50, 5, area);
    f.render_widget(Clear, rect);

    let (title, body) = match modal {
        Modal::ConfirmClear => (
            "Clear saved studies",
            vec![
                Line::from("Clear all saved studies?"),
                dim("y/enter: confirm · any other key: cancel"),
            ],
        ),
        Modal::ExportName { input } => (
            "Export saved studies",
            vec![
                Line::from(format!("File name (without extension): {input}\u{2588}")),
                dim("enter: export · esc: cancel"),
            ],
        ),
        Modal::Notice(msg) => (
            "Notice",
            vec![Line::from(msg.clone()), dim("any key: dismiss")],
        ),
    };

    let widget = Paragraph::new(body).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title),
    );
    f.render_widget(widget, rect);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height: height.min(area.height),
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}
