//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('u') => {
            app.refresh();
        }
        KeyCode::Char('o') => {
            app.toggle_offline();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next(1);
        }
        KeyCode::PageUp => {
            app.select_previous(PAGE_SCROLL_SIZE);
        }
        KeyCode::PageDown => {
            app.select_next(PAGE_SCROLL_SIZE);
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.drill_down();
        }
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
            app.go_back();
        }
        _ => {}
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, key(code)).unwrap()
    }

    fn test_app() -> App {
        let dir = tempfile::tempdir().unwrap();
        let cache = crate::cache::CacheManager::new(dir.path().to_path_buf()).unwrap();
        let mut app = App::with_services(
            crate::config::Config::default(),
            crate::api::ApiClient::new().unwrap(),
            cache,
        );
        app.leaderboard = crate::models::Leaderboard::build(&[crate::models::RunRecord {
            game: "Zelda".to_string(),
            section: "Any%".to_string(),
            category: "Main".to_string(),
            runner: "p1".to_string(),
            time: "1:00".to_string(),
            video: None,
        }]);
        app
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let mut app = test_app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_enter_drills_and_esc_backs_out() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        assert!(app.current_game().is_some());
        press(&mut app, KeyCode::Esc);
        assert!(app.current_game().is_none());
    }

    #[test]
    fn test_help_overlay_toggles() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::ShowingHelp);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }
}
