//! useradmin binary entry point.
//!
//! Parses options, sets up file logging and the tokio runtime, initializes
//! the terminal in raw mode, runs the TUI event loop, and restores the
//! terminal state on exit.
//!
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

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

use useradmin::api::RestClient;
use useradmin::app::keymap::Keymap;
use useradmin::app::store::UserStore;
use useradmin::app::theme::Theme;
use useradmin::app::view::ViewState;
use useradmin::app::{AppState, update};
use useradmin::config::Cli;
use useradmin::error::{Context, Result};

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> std::io::Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Route tracing output to `path`; the terminal belongs to the TUI.
fn init_logging(path: &std::path::Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("useradmin=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_path())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_ctx(|| "start async runtime".to_string())?;

    let client = RestClient::new(cli.api_url.clone());
    info!(api_url = client.base_url(), "starting useradmin");
    let (store, mut outcomes) = UserStore::new(Arc::new(client), runtime.handle().clone());
    let theme = Theme::load_or_init(&cli.theme_path().to_string_lossy());
    let keymap = Keymap::load_or_init(&cli.keybinds_path().to_string_lossy());
    let mut app = AppState::new(store, ViewState::new(), theme, keymap);

    let mut terminal = init_terminal().with_ctx(|| "init terminal".to_string())?;

    let res = update::run_app(&mut terminal, &mut app, &mut outcomes);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "event loop failed");
        eprintln!("application error: {err}");
    }
    runtime.shutdown_background();
    Ok(())
}
