mod confirm;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use confirm::handle_confirm;
use navigate::handle_navigate;
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.request_quit();
        return;
    }

    // Help overlay swallows the next key
    if app.show_help {
        app.show_help = false;
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

/// Normalize key events from terminals using the kitty keyboard protocol.
///
/// Kitty sends `Char(lowercase) + SHIFT` instead of `Char(UPPERCASE)`, and
/// `Char('/') + SHIFT` instead of `Char('?')`. Traditional terminals already
/// send the shifted character, so this is a no-op for them.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if c == '/' {
            key.code = KeyCode::Char('?');
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DebtStatus;
    use crate::tui::app::View;
    use crate::tui::render::test_helpers::{app_with_items, sample_items};

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn kitty_shift_is_normalized() {
        let key = normalize_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('L'));
        let key = normalize_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('?'));
        assert_eq!(key.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn tab_cycles_views() {
        let mut app = app_with_items(sample_items());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view, View::Kanban);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view, View::Analytics);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.view, View::Kanban);
    }

    #[test]
    fn number_keys_set_status() {
        let mut app = app_with_items(sample_items());
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.tracker.item("UX-001").unwrap().status, DebtStatus::Fixed);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.tracker.item("UX-001").unwrap().status, DebtStatus::Open);
    }

    #[test]
    fn search_filters_live_and_esc_restores() {
        let mut app = app_with_items(sample_items());
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_str(&mut app, "PASSWORD");
        assert_eq!(app.visible().len(), 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.filter.search, "");
        assert_eq!(app.visible().len(), 3);
    }

    #[test]
    fn search_enter_keeps_query() {
        let mut app = app_with_items(sample_items());
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "heade");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.filter.search, "heaad");
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.visible().is_empty());
    }

    #[test]
    fn filter_keys_cycle_and_clear() {
        let mut app = app_with_items(sample_items());
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.visible().len(), 1);
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Char('f'));
        assert!(!app.filter.is_empty());
        press(&mut app, KeyCode::Char('c'));
        assert!(app.filter.is_empty());
    }

    #[test]
    fn delete_asks_then_removes() {
        let mut app = app_with_items(sample_items());
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.tracker.items().len(), 3);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.tracker.items().len(), 2);
    }

    #[test]
    fn help_swallows_next_key() {
        let mut app = app_with_items(sample_items());
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
