// Result grid rendering.
// Lays matched songs out as cards in a grid whose width follows the terminal.

use ratatui::{prelude::*, widgets::*};

use crate::feed::Song;
use crate::state::SearchView;

use super::render_empty;

/// Height of one card including its border.
const CARD_HEIGHT: u16 = 5;

/// Number of card columns for a given width: one on narrow terminals, up to three.
pub fn grid_columns(width: u16) -> usize {
    match width {
        0..80 => 1,
        80..120 => 2,
        _ => 3,
    }
}

/// Draw the matched songs, or the no-results indicator.
pub fn draw_results(frame: &mut Frame, view: &mut SearchView, area: Rect) {
    view.grid_columns = grid_columns(area.width);
    view.scroll = view.scroll.min(view.total_rows().saturating_sub(1));

    if view.show_no_results() {
        render_empty(frame, area, "No results found.");
        return;
    }

    let columns = view.grid_columns;
    let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (row_area, songs) in rows
        .iter()
        .zip(view.results.chunks(columns).skip(view.scroll))
    {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (cell, song) in cells.iter().zip(songs) {
            draw_card(frame, song, *cell);
        }
    }
}

/// Draw a single song card.
fn draw_card(frame: &mut Frame, song: &Song, area: Rect) {
    let label = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(vec![
        Span::styled("Artist: ", label),
        Span::raw(&song.artist),
    ])];
    if let Some(album) = &song.album {
        lines.push(Line::from(vec![
            Span::styled("Album: ", label),
            Span::raw(album),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Release Date: ", label),
        Span::raw(song.release_date()),
    ]));

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", song.title))
            .title_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
    );
    frame.render_widget(card, area);
}
