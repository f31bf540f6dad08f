//! Splitcache - a terminal viewer for speedrun leaderboards.
//!
//! Fetches a flat list of run records, groups them into a
//! game → section → category → run hierarchy, and renders drill-down
//! navigation with a cached offline fallback.

mod api;
mod app;
mod cache;
mod config;
mod gateway;
mod models;
mod ui;
mod utils;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    // CLI utility mode: pre-populate the offline cache and exit
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--precache" {
        return precache(args.get(2).map(String::as_str)).await;
    }

    info!("Splitcache starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new()?;

    // Show cached data immediately, then refresh in the background if
    // the cache is stale
    if let Err(e) = app.load_from_cache() {
        warn!(error = %e, "Failed to load cached runs");
    }
    if app.is_cache_stale() {
        app.refresh();
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Splitcache shutting down");
    Ok(())
}

/// Run the offline gateway install step: fetch every listed site resource
/// from the origin and store it in the named cache. A failed install is
/// logged and leaves nothing cached; the viewer keeps working online.
async fn precache(origin_arg: Option<&str>) -> Result<()> {
    let config = config::Config::load().unwrap_or_default();

    let origin = match origin_arg.or(config.site_origin.as_deref()) {
        Some(o) => o.to_string(),
        None => {
            eprintln!("Usage: splitcache --precache <origin>");
            eprintln!("(or set site_origin in the config file)");
            return Ok(());
        }
    };

    let base_dir = config
        .cache_dir()
        .unwrap_or_else(|_| PathBuf::from("./cache"));
    let gateway = gateway::OfflineGateway::new(&origin, base_dir, api::ApiClient::new()?)?;

    // Pre-population is a one-time step per cache generation
    if gateway::PRECACHE_PATHS.iter().all(|p| gateway.is_cached(p)) {
        eprintln!("Offline cache already populated for {}", origin);
        return Ok(());
    }

    match gateway.install().await {
        Ok(()) => eprintln!("Offline cache installed for {}", origin),
        Err(e) => warn!(origin = %origin, error = %e, "Offline cache install failed"),
    }
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
