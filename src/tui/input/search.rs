use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Search input. The filter follows the text as it is typed; Enter keeps
/// it and Esc puts back what was there before.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.filter.search = std::mem::take(&mut app.search_before);
            finish(app);
        }
        (_, KeyCode::Enter) => {
            app.search_before.clear();
            finish(app);
        }

        (_, KeyCode::Left) => {
            if let Some(pos) = unicode::prev_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_cursor = pos;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(pos) = unicode::next_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_cursor = pos;
            }
        }
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => app.search_cursor = 0,
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            app.search_cursor = app.search_input.len()
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            app.search_input.drain(..app.search_cursor);
            app.search_cursor = 0;
            update(app);
        }

        (_, KeyCode::Backspace) => {
            if let Some(pos) = unicode::prev_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_input.drain(pos..app.search_cursor);
                app.search_cursor = pos;
                update(app);
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(end) = unicode::next_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_input.drain(app.search_cursor..end);
                update(app);
            }
        }

        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.search_input.insert(app.search_cursor, c);
            app.search_cursor += c.len_utf8();
            update(app);
        }

        _ => {}
    }
}

fn update(app: &mut App) {
    app.filter.search = app.search_input.clone();
    app.filter_changed();
}

fn finish(app: &mut App) {
    app.search_input.clear();
    app.search_cursor = 0;
    app.mode = Mode::Navigate;
    app.clamp_cursors();
}
