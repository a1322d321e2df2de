// UI module for rendering the TUI.
// Draws the loading and error screens, the search bar, and the results grid.

mod cards;
mod search_bar;

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::state::{NoticeLevel, SearchView, ViewState};

/// Heading shown above the search bar.
const HEADING: &str = "Suno Songs Search";

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    draw_view(frame, &mut app.view);
}

/// Draw whichever screen the view state calls for. Loading and failure
/// replace the whole screen.
fn draw_view(frame: &mut Frame, view: &mut SearchView) {
    let area = frame.area();
    match view.state.clone() {
        ViewState::Loading => render_loading(frame, area, "Loading"),
        ViewState::Failed(e) => render_error(frame, area, &format!("An error occurred: {}", e)),
        ViewState::Ready => draw_ready(frame, view, area),
    }
}

/// Draw the search screen once the feed has loaded.
fn draw_ready(frame: &mut Frame, view: &mut SearchView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Heading
            Constraint::Length(3), // Search bar
            Constraint::Min(1),    // Results grid
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let heading = Paragraph::new(Span::styled(
        HEADING,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(heading, chunks[0]);

    search_bar::draw_search_bar(frame, view, chunks[1]);
    cards::draw_results(frame, view, chunks[2]);
    draw_status_bar(frame, view, chunks[3]);
}

/// Draw the status bar with keybinding hints and the latest notice.
fn draw_status_bar(frame: &mut Frame, view: &SearchView, area: Rect) {
    let mut spans = vec![
        Span::raw(" ↵ "),
        Span::styled("Search", Style::default().fg(Color::DarkGray)),
        Span::raw("  ↑↓ PgUp/Dn "),
        Span::styled("Scroll", Style::default().fg(Color::DarkGray)),
        Span::raw("  Esc "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    if !view.term.is_empty() {
        spans.push(Span::styled(
            format!("  {} results", view.results.len()),
            Style::default().fg(Color::Cyan),
        ));
    }

    if let Some(notice) = &view.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::DarkGray,
            NoticeLevel::Warn => Color::Yellow,
        };
        spans.push(Span::styled(
            format!(
                "  {} ({})",
                notice.message,
                format_relative_time(&notice.timestamp)
            ),
            Style::default().fg(color),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Render a loading indicator.
fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error message.
fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red));
    frame.render_widget(text, area);
}

/// Render an empty state message.
fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}
