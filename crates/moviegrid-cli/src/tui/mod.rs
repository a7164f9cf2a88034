//! Movie browser TUI main loop.
//!
//! Uses `ratatui` + `crossterm` for rendering. The loop polls the terminal
//! every 100ms, so the debounce timer and notice expiry advance on the same
//! tick; searches and card actions are awaited inline between frames.
#![allow(clippy::future_not_send)]

mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviegrid_api::tmdb::LocalTmdbApi;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::{App, SearchRequest};
use crate::browser::Browser;
use crate::view::{CardAction, MovieCard};

/// Terminal poll interval; also the timer resolution.
const TICK: Duration = Duration::from_millis(100);

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Grid navigation.
    Normal,
    /// Typing into the search box.
    Search,
}

/// Work the loop awaits before reading the next key.
#[derive(Debug)]
enum Pending {
    Search(SearchRequest),
    Action(CardAction),
}

/// What a key press asks the loop to do.
#[derive(Debug)]
enum Outcome {
    Continue,
    Run(Pending),
    Quit,
}

/// Runs the movie browser until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A: LocalTmdbApi, B: Browser>(app: &mut App<A, B>) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;

    let result = run_on_alternate_screen(app).await;

    // Both steps run even if the session or the other step failed.
    let restored = restore_terminal();
    result.and(restored)
}

/// Enters the alternate screen and runs the event loop on it.
async fn run_on_alternate_screen<A: LocalTmdbApi, B: Browser>(app: &mut App<A, B>) -> Result<()> {
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    run_event_loop(&mut terminal, app).await
}

/// Leaves raw mode and the alternate screen.
///
/// # Errors
///
/// Returns the first failure after attempting both steps.
fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode().context("failed to disable raw mode");
    let screen = crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen");
    raw.and(screen)
}

/// Main event loop.
async fn run_event_loop<A: LocalTmdbApi, B: Browser>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<A, B>,
) -> Result<()> {
    let mut mode = InputMode::Normal;
    let mut columns: usize = 1;
    let mut pending = app.startup().map(Pending::Search);

    loop {
        terminal
            .draw(|frame| {
                columns = ui::draw(frame, app, mode, Instant::now());
            })
            .context("failed to draw TUI")?;

        // Drawn with the loading indicator on; now do the work.
        if let Some(work) = pending.take() {
            match work {
                Pending::Search(request) => app.finish_search(request).await,
                Pending::Action(action) => app.activate(action).await,
            }
            continue;
        }

        if event::poll(TICK).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let outcome = match mode {
                InputMode::Search => handle_search_input(app, &mut mode, key.code),
                InputMode::Normal => {
                    handle_normal_input(app, &mut mode, key.code, key.modifiers, columns)
                }
            };
            match outcome {
                Outcome::Quit => return Ok(()),
                Outcome::Run(work) => pending = Some(work),
                Outcome::Continue => {}
            }
        }

        if pending.is_none()
            && let Some(request) = app.tick(Instant::now())
        {
            tracing::debug!(key = %request.key(), "live search");
            pending = Some(Pending::Search(request));
        }
    }
}

/// Handles key input while typing a query.
fn handle_search_input<A: LocalTmdbApi, B: Browser>(
    app: &mut App<A, B>,
    mode: &mut InputMode,
    key: KeyCode,
) -> Outcome {
    match key {
        KeyCode::Esc => {
            *mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            *mode = InputMode::Normal;
            let input = String::from(app.input());
            if let Some(request) = app.begin_search(&input) {
                return Outcome::Run(Pending::Search(request));
            }
        }
        KeyCode::Backspace => {
            let mut text = String::from(app.input());
            if text.pop().is_some() {
                app.input_changed(&text, Instant::now());
            }
        }
        KeyCode::Char(c) => {
            let mut text = String::from(app.input());
            text.push(c);
            app.input_changed(&text, Instant::now());
        }
        _ => {}
    }
    Outcome::Continue
}

/// Handles key input while navigating the grid.
fn handle_normal_input<A: LocalTmdbApi, B: Browser>(
    app: &mut App<A, B>,
    mode: &mut InputMode,
    key: KeyCode,
    modifiers: KeyModifiers,
    columns: usize,
) -> Outcome {
    match key {
        KeyCode::Char('q') => return Outcome::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Outcome::Quit,
        KeyCode::Char('/' | 'i') => *mode = InputMode::Search,
        KeyCode::Left | KeyCode::Char('h') => app.view_mut().move_left(),
        KeyCode::Right | KeyCode::Char('l') => app.view_mut().move_right(),
        KeyCode::Up | KeyCode::Char('k') => app.view_mut().move_up(columns),
        KeyCode::Down | KeyCode::Char('j') => app.view_mut().move_down(columns),
        KeyCode::Char('t') => return card_action(app, |card| card.trailer_action()),
        KeyCode::Char('d') | KeyCode::Enter => {
            return card_action(app, |card| card.details_action());
        }
        KeyCode::Char('p') => return card_action(app, |card| card.poster_action()),
        _ => {}
    }
    Outcome::Continue
}

/// Runs `pick` on the selected card, if any.
fn card_action<A: LocalTmdbApi, B: Browser>(
    app: &App<A, B>,
    pick: impl FnOnce(&MovieCard) -> CardAction,
) -> Outcome {
    app.view()
        .selected()
        .map_or(Outcome::Continue, |card| Outcome::Run(Pending::Action(pick(card))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_terminal_without_setup() {
        // Arrange: raw mode was never enabled (setup failed early)

        // Act
        let result = restore_terminal();

        // Assert
        assert!(result.is_ok());
    }
}
