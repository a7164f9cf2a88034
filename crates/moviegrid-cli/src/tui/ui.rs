//! TUI rendering logic for the movie grid.

use std::time::Instant;

use moviegrid_api::tmdb::LocalTmdbApi;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::InputMode;
use crate::app::{App, SearchState};
use crate::browser::Browser;
use crate::view::{MovieCard, Poster, View};

/// Card width in cells, borders included.
const CARD_WIDTH: u16 = 32;
/// Card height in cells, borders included.
const CARD_HEIGHT: u16 = 7;

/// Draws the browser UI. Returns the number of cards per grid row.
#[allow(clippy::indexing_slicing)]
pub fn draw<A: LocalTmdbApi, B: Browser>(
    frame: &mut Frame,
    app: &App<A, B>,
    mode: InputMode,
    now: Instant,
) -> usize {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box
            Constraint::Length(1), // status line
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_search_box(frame, chunks[0], app, mode);
    draw_status(frame, chunks[1], app, now);
    let columns = draw_grid(frame, chunks[2], app.view());
    draw_footer(frame, chunks[3], mode);

    columns
}

/// Draws the search input.
fn draw_search_box<A: LocalTmdbApi, B: Browser>(
    frame: &mut Frame,
    area: Rect,
    app: &App<A, B>,
    mode: InputMode,
) {
    let style = if mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let title = if app.live_search_pending() {
        " Search: / (typing...) "
    } else {
        " Search: / "
    };

    let search = Paragraph::new(app.input())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(search, area);
}

/// Draws loading state, the current notice, or result counts.
fn draw_status<A: LocalTmdbApi, B: Browser>(
    frame: &mut Frame,
    area: Rect,
    app: &App<A, B>,
    now: Instant,
) {
    let view = app.view();
    let line = if view.is_loading() || app.state() == SearchState::Searching {
        Line::from(Span::styled(
            " Loading...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(message) = view.notice(now) {
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else {
        let mut text = format!(" {} movies", view.cards().len());
        if !app.cache().is_empty() {
            text.push_str(&format!("  {} cached queries", app.cache().len()));
        }
        if let Some(id) = app.genre_filter() {
            text.push_str(&format!("  genre: {id}"));
        }
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Draws the card grid, scrolled so the selected card is visible.
/// Returns the number of columns.
#[allow(clippy::arithmetic_side_effects)]
fn draw_grid(frame: &mut Frame, area: Rect, view: &View) -> usize {
    let block = Block::default().borders(Borders::ALL).title(" Movies ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = usize::from((inner.width / CARD_WIDTH).max(1));
    let visible_rows = usize::from((inner.height / CARD_HEIGHT).max(1));
    let selected_row = view.selected_index() / columns;
    let first_row = (selected_row + 1).saturating_sub(visible_rows);

    for (index, card) in view.cards().iter().enumerate() {
        let row = index / columns;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = u16::try_from(index % columns).unwrap_or(u16::MAX);
        let row = u16::try_from(row - first_row).unwrap_or(u16::MAX);
        let rect = Rect::new(
            inner.x.saturating_add(col.saturating_mul(CARD_WIDTH)),
            inner.y.saturating_add(row.saturating_mul(CARD_HEIGHT)),
            CARD_WIDTH,
            CARD_HEIGHT,
        )
        .intersection(inner);
        if rect.is_empty() {
            continue;
        }
        draw_card(frame, rect, card, index == view.selected_index());
    }

    columns
}

/// Draws one movie card.
fn draw_card(frame: &mut Frame, area: Rect, card: &MovieCard, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let title_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let poster = match &card.poster {
        Poster::Remote(_) => Span::raw(card.poster.url()),
        Poster::Placeholder => Span::styled("No Poster", Style::default().fg(Color::DarkGray)),
    };

    let lines = vec![
        Line::from(Span::styled(card.title.as_str(), title_style)),
        Line::from(Span::styled(
            card.genres.as_str(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled("\u{2605} ", Style::default().fg(Color::Yellow)),
            Span::raw(card.rating.as_str()),
        ]),
        Line::from(poster),
        Line::from(Span::styled(
            "[t] Trailer  [d] Details",
            Style::default().fg(Color::Green),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, mode: InputMode) {
    let help_text = if mode == InputMode::Search {
        "Type to search (live) | Enter: search now | Esc: back to grid"
    } else {
        "\u{2190}\u{2191}\u{2193}\u{2192}/hjkl: move  t: trailer  d/Enter: details  p: poster  /: search  q: quit"
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
