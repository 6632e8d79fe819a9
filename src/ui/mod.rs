// UI module for rendering the TUI.
// Layout: repo header, tree pane + content pane, status bar.

mod content;
mod tree;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, InputMode};
use crate::browser::LoadingState;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Repo header
            Constraint::Min(1),    // Tree + content panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(1)])
        .split(chunks[1]);

    tree::draw_tree_pane(frame, app, panes[0]);
    content::draw_content_pane(frame, app, panes[1]);

    draw_status_bar(frame, app, chunks[2]);
}

/// Repo name, primary language, and topics.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {}/{} @ {} ", app.owner, app.repo, app.branch));

    let line = match &app.repo_info {
        LoadingState::Loaded(info) => {
            let mut spans = Vec::new();
            if let Some(language) = &info.language {
                spans.push(Span::styled(
                    language.clone(),
                    Style::default().fg(Color::Cyan),
                ));
            }
            for topic in &info.topics {
                spans.push(Span::styled(
                    format!("  #{}", topic),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if spans.is_empty() {
                spans.push(Span::styled(
                    info.description.clone().unwrap_or_default(),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
        LoadingState::Loading => Line::styled("Loading...", Style::default().fg(Color::Yellow)),
        LoadingState::Error(e) => Line::styled(e.clone(), Style::default().fg(Color::Red)),
        LoadingState::Idle => Line::raw(""),
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Key hints, repo URL, and any transient alert.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(alert) = &app.alert {
        let text = Paragraph::new(alert.as_str()).style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(text, area);
        return;
    }

    let hints = match app.input_mode {
        InputMode::Filter => " type = filter  Enter/Esc = done ".to_string(),
        InputMode::Normal => {
            let url = app
                .repo_info
                .data()
                .map(|info| info.html_url.as_str())
                .unwrap_or("");
            format!(
                " q quit  / filter  ↑↓ move  ⏎ open  →← expand  d download   {}",
                url
            )
        }
    };
    let text = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}
