// Content pane rendering.
// Shows the README until a file is selected, then the file's content:
// markdown through the line-styled viewer, everything else as
// preformatted monospace text.

use chrono::{DateTime, Local};
use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::browser::LoadingState;
use crate::format;
use crate::meta::FileMeta;

pub fn draw_content_pane(frame: &mut Frame, app: &App, area: Rect) {
    match &app.browser.selected_path {
        Some(path) => draw_file(frame, app, path, area),
        None => draw_readme(frame, app, area),
    }
}

fn draw_readme(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" README ");
    match &app.readme {
        LoadingState::Loading => {
            let text = Paragraph::new("⏳ Loading README...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(text, area);
        }
        LoadingState::Loaded(text) => {
            let body = Paragraph::new(markdown_lines(text))
                .wrap(Wrap { trim: false })
                .scroll((app.content_scroll, 0))
                .block(block);
            frame.render_widget(body, area);
        }
        // Missing README: empty pane with a hint, not an error.
        LoadingState::Idle | LoadingState::Error(_) => {
            let text = Paragraph::new("Select a file on the left to view its content")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(text, area);
        }
    }
}

fn draw_file(frame: &mut Frame, app: &App, path: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", path));

    match &app.browser.content {
        LoadingState::Idle => {
            frame.render_widget(block, area);
        }
        LoadingState::Loading => {
            let text = Paragraph::new("⏳ Loading file...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(text, area);
        }
        LoadingState::Error(e) => {
            let text = Paragraph::new(format!("❌ {}", e))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(text, area);
        }
        LoadingState::Loaded(content) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(1)])
                .split(block.inner(area));
            frame.render_widget(block, area);

            frame.render_widget(meta_caption(app.browser.meta_for(path)), chunks[0]);

            let lines = if format::is_markdown(path) {
                markdown_lines(content)
            } else {
                content.lines().map(Line::raw).collect()
            };
            let body = Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((app.content_scroll, 0));
            frame.render_widget(body, chunks[1]);
        }
    }
}

/// One-line caption with last-modified time and short commit hash.
fn meta_caption(meta: Option<&FileMeta>) -> Paragraph<'static> {
    let text = match meta {
        Some(meta) => {
            let modified = match &meta.last_modified {
                Some(raw) => raw
                    .parse::<DateTime<Local>>()
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|_| raw.clone()),
                None => "Not available".to_string(),
            };
            match &meta.commit_sha {
                Some(sha) => format!(
                    "Last modified: {}  commit {}",
                    modified,
                    format::short_sha(sha)
                ),
                None => format!("Last modified: {}", modified),
            }
        }
        None => String::new(),
    };
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}

/// Minimal line-level markdown styling: headings, bullets, and fenced
/// code blocks. Enough to make READMEs scannable in a terminal.
fn markdown_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut in_code = false;
    for raw in text.lines() {
        let trimmed = raw.trim_start();
        if trimmed.starts_with("```") {
            in_code = !in_code;
            lines.push(Line::styled(raw, Style::default().fg(Color::DarkGray)));
        } else if in_code {
            lines.push(Line::styled(raw, Style::default().fg(Color::Green)));
        } else if trimmed.starts_with('#') {
            lines.push(Line::styled(
                raw,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
            lines.push(Line::styled(raw, Style::default().fg(Color::White)));
        } else {
            lines.push(Line::raw(raw));
        }
    }
    lines
}
