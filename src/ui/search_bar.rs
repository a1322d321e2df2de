// Search input rendering.
// Draws the term input with its placeholder and the search trigger.

use ratatui::{prelude::*, widgets::*};

use crate::state::SearchView;

/// Shown in the input while the term is empty.
pub const PLACEHOLDER: &str = "Search songs...";

/// Label of the search trigger, activated with Enter.
pub const SEARCH_TRIGGER: &str = "[ Search ]";

/// Draw the search input and the search trigger side by side.
pub fn draw_search_bar(frame: &mut Frame, view: &SearchView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(area);

    let input_line = if view.term.is_empty() {
        Line::from(vec![
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::raw(&view.term),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ])
    };

    let input = Paragraph::new(input_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(input, chunks[0]);

    let button = Paragraph::new(Span::styled(
        SEARCH_TRIGGER,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, chunks[1]);
}
