//! userlist-tui binary entry point.
//!
//! Parses configuration, starts the async runtime that runs fetch cycles,
//! puts the terminal in raw mode, runs the TUI event loop, and restores the
//! terminal state on exit.
//!
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_subscriber::EnvFilter;

use userlist_tui::app::{self, AppState, Fetcher, Keymap, Theme};
use userlist_tui::config::Cli;
use userlist_tui::error::{Context, Result};

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> std::io::Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Send logs to `path`; the terminal itself belongs to the TUI.
fn init_logging(path: &Path) {
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let settings = Cli::parse().into_settings()?;
    init_logging(&settings.log_file);
    info!(backend = ?settings.backend, page_size = settings.page_size, "starting userlist-tui");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .with_ctx(|| "start async runtime".to_string())?;
    let api = settings.build_api()?;
    let (fetcher, mut outcomes) = Fetcher::new(api, runtime.handle().clone());

    let mut state = AppState::new(
        settings.page_size,
        Theme::load_or_init(&settings.theme_path),
        Keymap::load_or_init(&settings.keybinds_path),
    );

    let mut terminal = init_terminal().with_ctx(|| "init terminal".to_string())?;

    let res = app::run(&mut terminal, &mut state, &fetcher, &mut outcomes);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    // in-flight fetches are abandoned, not awaited
    runtime.shutdown_background();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
