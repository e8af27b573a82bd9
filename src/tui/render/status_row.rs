use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ConfirmAction, Mode, View};

use super::helpers::spans_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Navigate => {
            let left = match &app.status_message {
                Some(msg) => {
                    let fg = if app.status_is_error {
                        app.theme.red
                    } else {
                        app.theme.text
                    };
                    vec![Span::styled(format!(" {}", msg), Style::default().fg(fg).bg(bg))]
                }
                None if app.show_key_hints => vec![Span::styled(
                    format!(" {}", key_hints(app.view)),
                    Style::default().fg(app.theme.dim).bg(bg),
                )],
                None => Vec::new(),
            };
            (left, identity_hint(app))
        }
        Mode::Search => {
            // Search prompt: /pattern with a block cursor at the edit point
            let (before, after) = app.search_input.split_at(app.search_cursor);
            let text = Style::default().fg(app.theme.text_bright).bg(bg);
            let spans = vec![
                Span::styled(format!(" /{}", before), text),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
                Span::styled(after.to_string(), text),
            ];
            (spans, "Enter keep  Esc cancel".to_string())
        }
        Mode::Confirm => {
            let question = match &app.confirm {
                Some(ConfirmAction::DeleteItem { id }) => format!(" Delete {}?", id),
                None => String::new(),
            };
            let spans = vec![Span::styled(
                question,
                Style::default()
                    .fg(app.theme.red)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )];
            (spans, "y delete  n cancel".to_string())
        }
    };

    // Right-align the hint when there is room
    let content_width = spans_width(&spans);
    let hint_width = crate::util::unicode::display_width(&hint) + 1;
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// `SC Hello, sarah.chen` plus an unsaved marker
fn identity_hint(app: &App) -> String {
    let unsaved = if app.tracker.has_unsaved() {
        "[unsaved] "
    } else {
        ""
    };
    format!("{}{} {}", unsaved, app.user.initials(), app.user.greeting())
}

fn key_hints(view: View) -> &'static str {
    match view {
        View::Table => "Enter advance  1-4 status  / search  ? help",
        View::Kanban => "h/l column  H/L move card  Enter advance  ? help",
        View::Analytics => "r range  p project  Tab view  ? help",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn navigate_shows_identity_on_the_right() {
        let app = app_with_items(sample_items());
        let output = render(&app);
        assert!(output.ends_with("SC Hello, sarah.chen"));
    }

    #[test]
    fn message_on_the_left() {
        let mut app = app_with_items(sample_items());
        app.set_error("could not write debts: disk full");
        let output = render(&app);
        assert!(output.starts_with(" could not write debts: disk full"));
        assert!(output.ends_with("Hello, sarah.chen"));
    }

    #[test]
    fn search_prompt_with_cursor() {
        let mut app = app_with_items(sample_items());
        app.mode = Mode::Search;
        app.search_input = "contrast".into();
        app.search_cursor = 3;
        let output = render(&app);
        assert!(output.starts_with(" /con\u{258C}trast"));
        assert!(output.ends_with("Enter keep  Esc cancel"));
    }

    #[test]
    fn confirm_prompt() {
        let mut app = app_with_items(sample_items());
        app.request_delete();
        assert!(render(&app).starts_with(" Delete UX-001?"));
    }

    #[test]
    fn unsaved_marker() {
        let (mut app, store) = app_with_store(sample_items());
        store.set_fail_writes(true);
        app.advance_selected();
        assert!(app.status_is_error);
        app.status_message = None;
        assert!(render(&app).ends_with("[unsaved] SC Hello, sarah.chen"));
    }
}
