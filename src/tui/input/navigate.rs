use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::DebtStatus;
use crate::tui::app::{App, Mode, View};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Any key clears a refused-quit warning except another q
    if key.code != KeyCode::Char('q') {
        app.quit_armed = false;
    }

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => app.request_quit(),
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Views
        (_, KeyCode::Tab) => app.view = app.view.next(),
        (_, KeyCode::BackTab) => app.view = app.view.prev(),

        // Cursor
        (_, KeyCode::Char('j') | KeyCode::Down) => app.move_cursor(1),
        (_, KeyCode::Char('k') | KeyCode::Up) => app.move_cursor(-1),
        (_, KeyCode::Char('g') | KeyCode::Home) => app.jump_cursor(false),
        (_, KeyCode::Char('G') | KeyCode::End) => app.jump_cursor(true),
        (_, KeyCode::Char('h') | KeyCode::Left) if app.view == View::Kanban => {
            app.move_column(-1)
        }
        (_, KeyCode::Char('l') | KeyCode::Right) if app.view == View::Kanban => {
            app.move_column(1)
        }

        // Status changes
        (_, KeyCode::Enter) => app.advance_selected(),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c @ '1'..='4')) => {
            let idx = c as usize - '1' as usize;
            app.set_selected_status(DebtStatus::ALL[idx]);
        }
        (_, KeyCode::Char('H')) if app.view == View::Kanban => app.move_selected_card(false),
        (_, KeyCode::Char('L')) if app.view == View::Kanban => app.move_selected_card(true),
        (_, KeyCode::Char('d')) => app.request_delete(),

        // Filters
        (_, KeyCode::Char('/')) => {
            app.search_before = app.filter.search.clone();
            app.search_input = app.filter.search.clone();
            app.search_cursor = app.search_input.len();
            app.mode = Mode::Search;
        }
        (_, KeyCode::Char('s')) => app.cycle_severity(),
        (_, KeyCode::Char('t')) => app.cycle_type(),
        (_, KeyCode::Char('f')) => app.cycle_status(),
        (_, KeyCode::Char('p')) => app.cycle_project(),
        (_, KeyCode::Char('c')) => app.clear_filters(),
        (_, KeyCode::Char('r')) if app.view == View::Analytics => app.cycle_range(),

        (_, KeyCode::Char('R')) => app.reload(),
        (_, KeyCode::Esc) => app.status_message = None,
        _ => {}
    }
}
