use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, FetchOutcome, Fetcher, InputMode};
use crate::ui;

/// Whether the event loop keeps going after a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    fetcher: &Fetcher,
    outcomes: &mut UnboundedReceiver<FetchOutcome>,
) -> Result<()> {
    info!(limit = app.query.limit, "event loop started");
    loop {
        if let Some(request) = app.take_fetch_request() {
            fetcher.spawn(request);
        }
        drain_outcomes(app, outcomes);

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key) == Flow::Quit {
                    break;
                }
            }
        }
    }
    info!("event loop stopped");
    Ok(())
}

/// Apply every outcome that has arrived since the last tick.
pub fn drain_outcomes(app: &mut AppState, outcomes: &mut UnboundedReceiver<FetchOutcome>) {
    loop {
        match outcomes.try_recv() {
            Ok(outcome) => {
                app.apply_outcome(outcome);
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                debug!("fetch channel closed");
                break;
            }
        }
    }
}

/// Translate one key press into state changes.
///
/// Prev/Next are ignored unless the pager is on screen and the move stays
/// within `1..=total_pages`; the state itself does not enforce bounds.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    if let InputMode::Editing(field) = app.input_mode {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit;
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => app.input_mode = InputMode::Normal,
            KeyCode::Backspace => app.pop_filter_char(field),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.push_filter_char(field, c)
            }
            _ => {}
        }
        return Flow::Continue;
    }

    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::EditName => app.input_mode = InputMode::Editing(crate::app::FilterField::Name),
        KeyAction::EditAge => app.input_mode = InputMode::Editing(crate::app::FilterField::Age),
        KeyAction::PrevPage => {
            let info = app.page_info();
            if app.pager_visible() && info.has_prev {
                app.set_page(info.current - 1);
            }
        }
        KeyAction::NextPage => {
            let info = app.page_info();
            if app.pager_visible() && info.has_next {
                app.set_page(info.current + 1);
            }
        }
        KeyAction::NextPageSize => app.cycle_page_size(true),
        KeyAction::PrevPageSize => app.cycle_page_size(false),
        KeyAction::Refresh => app.request_refresh(),
        KeyAction::Ignore => {}
    }
    Flow::Continue
}
