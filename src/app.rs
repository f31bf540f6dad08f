//! Application state management for Splitcache.
//!
//! This module contains the core `App` struct that owns the fetched
//! leaderboard tree, the navigation cursor, cache/config handles, and
//! background refresh coordination. All state is explicit: the hierarchy
//! builder is a pure function and render code receives `&App`, there are
//! no module-level globals.

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::cache::CacheManager;
use crate::config::Config;
use crate::models::{Category, Game, Leaderboard, RunRecord, Section};

/// Buffer size for the background task message channel.
/// A refresh produces a single message; 8 leaves headroom for rapid
/// manual refreshes.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Drill-down position in the leaderboard tree.
///
/// Each level captures typed indices into the tree rather than node ids,
/// so going back pops a level without re-deriving ancestors from slugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Games,
    Sections {
        game: usize,
    },
    Categories {
        game: usize,
        section: usize,
    },
    Runs {
        game: usize,
        section: usize,
        category: usize,
    },
}

/// Result types from background refresh tasks.
enum RefreshResult {
    /// Runs document fetched successfully
    Runs(Vec<RunRecord>),
    /// An error occurred during refresh
    Error(String),
}

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    pub cache: CacheManager,

    // Data
    pub leaderboard: Leaderboard,

    // Navigation
    pub view: View,
    pub selection: usize,

    // UI state
    pub state: AppState,
    pub status_message: Option<String>,
    pub offline_mode: bool,
    pub refreshing: bool,
    pub cache_age: Option<String>,

    // Background task channel
    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config
            .cache_dir()
            .unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");
        let cache = CacheManager::new(cache_dir)?;

        let api = ApiClient::new()?;
        Ok(Self::with_services(config, api, cache))
    }

    /// Assemble an `App` from already-constructed services.
    pub fn with_services(config: Config, api: ApiClient, cache: CacheManager) -> Self {
        let offline_mode = config.offline;
        let (refresh_tx, refresh_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            api,
            cache,
            leaderboard: Leaderboard::default(),
            view: View::Games,
            selection: 0,
            state: AppState::Normal,
            status_message: None,
            offline_mode,
            refreshing: false,
            cache_age: None,
            refresh_rx,
            refresh_tx,
        }
    }

    /// Load cached runs data, if any, and build the tree from it.
    pub fn load_from_cache(&mut self) -> Result<()> {
        if let Some(cached) = self.cache.load_runs()? {
            info!(count = cached.data.len(), "Loaded runs from cache");
            self.leaderboard = Leaderboard::build(&cached.data);
            self.cache_age = Some(cached.age_display());
        }
        Ok(())
    }

    pub fn is_cache_stale(&self) -> bool {
        self.cache.runs_stale()
    }

    /// Replace the tree with a fresh build from `records` and persist them.
    fn apply_records(&mut self, records: &[RunRecord]) {
        self.leaderboard = Leaderboard::build(records);
        debug!(
            games = self.leaderboard.games.len(),
            runs = self.leaderboard.run_count(),
            "Leaderboard rebuilt"
        );
        self.reset_navigation();
        if let Err(e) = self.cache.save_runs(records) {
            warn!(error = %e, "Failed to save runs cache");
        }
        self.cache_age = self.cache.runs_age();
    }

    /// Navigation indices are only valid against the tree they were taken
    /// from, so a rebuild sends the cursor back to the top.
    fn reset_navigation(&mut self) {
        self.view = View::Games;
        self.selection = 0;
    }

    // ========================================================================
    // Background refresh
    // ========================================================================

    /// Kick off a background fetch of the runs document.
    pub fn refresh(&mut self) {
        if self.offline_mode {
            self.status_message = Some("Offline mode - not refreshing".to_string());
            return;
        }
        if self.refreshing {
            return;
        }
        self.refreshing = true;
        self.status_message = Some("Refreshing...".to_string());

        let api = self.api.clone();
        let url = self.config.runs_url().to_string();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let result = match api.fetch_runs(&url).await {
                Ok(runs) => RefreshResult::Runs(runs),
                Err(e) => RefreshResult::Error(format!("{:#}", e)),
            };
            // Receiver only drops on shutdown
            let _ = tx.send(result).await;
        });
    }

    /// Drain completed background work. Called from the main loop each tick.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.refresh_rx.try_recv() {
            self.refreshing = false;
            match result {
                RefreshResult::Runs(records) => {
                    info!(count = records.len(), "Refresh complete");
                    self.apply_records(&records);
                    self.status_message = None;
                }
                RefreshResult::Error(e) => {
                    warn!(error = %e, "Refresh failed");
                    self.status_message = if self.leaderboard.games.is_empty() {
                        Some("Failed to load leaderboard data.".to_string())
                    } else {
                        Some(format!("Refresh failed: {}", e))
                    };
                }
            }
        }
    }

    pub fn toggle_offline(&mut self) {
        self.offline_mode = !self.offline_mode;
        self.config.offline = self.offline_mode;
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to persist offline preference");
        }
        self.status_message = Some(if self.offline_mode {
            "Offline mode enabled".to_string()
        } else {
            "Online mode enabled".to_string()
        });
    }

    // ========================================================================
    // Tree accessors for the current cursor
    // ========================================================================

    pub fn current_game(&self) -> Option<&Game> {
        match self.view {
            View::Games => None,
            View::Sections { game }
            | View::Categories { game, .. }
            | View::Runs { game, .. } => self.leaderboard.games.get(game),
        }
    }

    pub fn current_section(&self) -> Option<&Section> {
        match self.view {
            View::Categories { section, .. } | View::Runs { section, .. } => {
                self.current_game()?.sections.get(section)
            }
            _ => None,
        }
    }

    pub fn current_category(&self) -> Option<&Category> {
        match self.view {
            View::Runs { category, .. } => self.current_section()?.categories.get(category),
            _ => None,
        }
    }

    /// Number of rows in the currently visible list.
    pub fn visible_len(&self) -> usize {
        match self.view {
            View::Games => self.leaderboard.games.len(),
            View::Sections { .. } => self.current_game().map_or(0, |g| g.sections.len()),
            View::Categories { .. } => self.current_section().map_or(0, |s| s.categories.len()),
            View::Runs { .. } => self.current_category().map_or(0, |c| c.runs.len()),
        }
    }

    /// Breadcrumb of selected ancestor names for the header line.
    pub fn breadcrumb(&self) -> String {
        let mut parts = vec!["Games".to_string()];
        if let Some(game) = self.current_game() {
            parts.push(game.name.clone());
        }
        if let Some(section) = self.current_section() {
            parts.push(section.name.clone());
        }
        if let Some(category) = self.current_category() {
            parts.push(category.name.clone());
        }
        parts.join(" → ")
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn select_previous(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    pub fn select_next(&mut self, step: usize) {
        let len = self.visible_len();
        if len == 0 {
            self.selection = 0;
        } else {
            self.selection = (self.selection + step).min(len - 1);
        }
    }

    /// Descend into the selected node. No-op on an empty list or at the
    /// runs table (the deepest level).
    pub fn drill_down(&mut self) {
        if self.selection >= self.visible_len() {
            return;
        }
        let selected = self.selection;
        self.view = match self.view {
            View::Games => View::Sections { game: selected },
            View::Sections { game } => View::Categories {
                game,
                section: selected,
            },
            View::Categories { game, section } => View::Runs {
                game,
                section,
                category: selected,
            },
            View::Runs { .. } => return,
        };
        self.selection = 0;
    }

    /// Ascend one level, restoring the selection to the node being left.
    pub fn go_back(&mut self) {
        let (view, selection) = match self.view {
            View::Games => return,
            View::Sections { game } => (View::Games, game),
            View::Categories { game, section } => (View::Sections { game }, section),
            View::Runs {
                game,
                section,
                category,
            } => (View::Categories { game, section }, category),
        };
        self.view = view;
        self.selection = selection;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game: &str, section: &str, category: &str, runner: &str) -> RunRecord {
        RunRecord {
            game: game.to_string(),
            section: section.to_string(),
            category: category.to_string(),
            runner: runner.to_string(),
            time: "1:00".to_string(),
            video: None,
        }
    }

    fn test_app() -> App {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        let mut app = App::with_services(Config::default(), ApiClient::new().unwrap(), cache);
        app.leaderboard = Leaderboard::build(&[
            record("Zelda", "Any%", "Main", "p1"),
            record("Zelda", "Any%", "Glitchless", "p2"),
            record("Zelda", "100%", "Main", "p3"),
            record("Mario", "Any%", "Main", "p4"),
        ]);
        // tempdir is dropped here; cache writes in these tests fail
        // quietly, which is the degraded path under test anyway
        app
    }

    #[test]
    fn test_drill_down_and_back_restores_selection() {
        let mut app = test_app();

        app.selection = 1; // Mario
        app.drill_down();
        assert_eq!(app.view, View::Sections { game: 1 });
        assert_eq!(app.selection, 0);
        assert_eq!(app.current_game().unwrap().name, "Mario");

        app.go_back();
        assert_eq!(app.view, View::Games);
        assert_eq!(app.selection, 1);
    }

    #[test]
    fn test_drill_down_to_runs_is_deepest() {
        let mut app = test_app();
        app.drill_down(); // Zelda
        app.drill_down(); // Any%
        app.drill_down(); // Main
        assert!(matches!(app.view, View::Runs { .. }));
        assert_eq!(app.visible_len(), 1);

        let before = app.view;
        app.drill_down();
        assert_eq!(app.view, before);
    }

    #[test]
    fn test_drill_down_on_empty_list_is_noop() {
        let mut app = test_app();
        app.leaderboard = Leaderboard::default();
        app.drill_down();
        assert_eq!(app.view, View::Games);
    }

    #[test]
    fn test_selection_clamps_to_list_bounds() {
        let mut app = test_app();
        app.select_next(PAGE_SCROLL_SIZE);
        assert_eq!(app.selection, 1); // two games
        app.select_previous(PAGE_SCROLL_SIZE);
        assert_eq!(app.selection, 0);
    }

    #[test]
    fn test_breadcrumb_tracks_cursor() {
        let mut app = test_app();
        assert_eq!(app.breadcrumb(), "Games");
        app.drill_down();
        assert_eq!(app.breadcrumb(), "Games → Zelda");
        app.drill_down();
        assert_eq!(app.breadcrumb(), "Games → Zelda → Any%");
        app.drill_down();
        assert_eq!(app.breadcrumb(), "Games → Zelda → Any% → Main");
    }

    #[test]
    fn test_apply_records_rebuilds_and_resets_cursor() {
        let mut app = test_app();
        app.drill_down();
        app.drill_down();

        app.apply_records(&[record("Metroid", "Any%", "Main", "p9")]);
        assert_eq!(app.view, View::Games);
        assert_eq!(app.leaderboard.games.len(), 1);
        assert_eq!(app.leaderboard.games[0].name, "Metroid");
    }

    #[test]
    fn test_offline_mode_blocks_refresh() {
        let mut app = test_app();
        app.offline_mode = true;
        app.refresh();
        assert!(!app.refreshing);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Offline mode - not refreshing")
        );
    }
}
