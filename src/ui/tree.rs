// Tree pane rendering.
// Windowed list over the flattened visible rows; the ListState selection
// keeps the focused row scrolled into view.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, InputMode};
use crate::browser::LoadingState;
use crate::format::{self, FileIcon};
use crate::tree::VisibleRow;

pub fn draw_tree_pane(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    draw_filter(frame, app, chunks[0]);
    draw_rows(frame, app, chunks[1]);
}

fn draw_filter(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.input_mode == InputMode::Filter;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(" Filter ");

    let mut spans = vec![Span::raw(app.browser.filter.clone())];
    if active {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    } else if app.browser.filter.is_empty() {
        spans = vec![Span::styled(
            "press / to filter",
            Style::default().fg(Color::DarkGray),
        )];
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_rows(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Files ");

    match &app.tree_load {
        LoadingState::Loading | LoadingState::Idle => {
            let text = Paragraph::new("⏳ Loading tree...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(text, area);
            return;
        }
        LoadingState::Error(e) => {
            let text = Paragraph::new(format!("❌ {}", e))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(text, area);
            return;
        }
        LoadingState::Loaded(_) => {}
    }

    if app.browser.rows().is_empty() {
        let text = Paragraph::new("No files match")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let selected_path = app.browser.selected_path.clone();
    let items: Vec<ListItem> = app
        .browser
        .rows()
        .iter()
        .map(|row| row_item(row, selected_path.as_deref()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.browser.list_state);
}

fn row_item(row: &VisibleRow, selected_path: Option<&str>) -> ListItem<'static> {
    let indent = "  ".repeat(row.depth);
    let line = if row.is_file {
        let icon = FileIcon::for_name(&row.name).glyph();
        let mut spans = vec![
            Span::raw(indent),
            Span::raw(format!("{} ", icon)),
            Span::raw(row.name.clone()),
        ];
        let size = format::human_size(row.size);
        if !size.is_empty() {
            spans.push(Span::styled(
                format!("  {}", size),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(sha) = &row.sha {
            spans.push(Span::styled(
                format!("  {}", format::short_sha(sha)),
                Style::default().fg(Color::DarkGray),
            ));
        }
        let mut line = Line::from(spans);
        if selected_path == Some(row.path.as_str()) {
            line = line.style(Style::default().fg(Color::Cyan));
        }
        line
    } else {
        let marker = if row.expanded { "▾" } else { "▸" };
        Line::from(vec![
            Span::raw(indent),
            Span::styled(
                format!("{} {}", marker, row.name),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    };
    ListItem::new(line)
}
