use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::project_name;
use crate::tui::app::App;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

use super::helpers::pad_spans;
use super::push_highlighted_spans;

const SEVERITY_W: usize = 6;
const STATUS_W: usize = 11;
const TYPE_W: usize = 13;
const PROJECT_MAX: usize = 16;

/// Render the table view: one row per visible item, cursor row highlighted
pub fn render_table_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let items = app.visible();

    if items.is_empty() {
        let msg = if app.tracker.items().is_empty() {
            " No debt items yet. Log one with `ux add`."
        } else {
            " No items match the current filters (c to clear)"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let projects = app.tracker.projects();
    let id_w = items.iter().map(|i| display_width(&i.id)).max().unwrap_or(2).max(2);
    let project_w = items
        .iter()
        .map(|i| display_width(project_name(projects, &i.project_id)))
        .max()
        .unwrap_or(0)
        .clamp(7, PROJECT_MAX);
    let fixed = 1 + id_w + 2 + SEVERITY_W + 2 + STATUS_W + 2 + TYPE_W + 2 + project_w + 2;
    let title_w = width.saturating_sub(fixed);

    // Keep the cursor row in view
    let visible_rows = (area.height as usize).saturating_sub(1);
    let cursor = app.table_cursor.min(items.len() - 1);
    let mut scroll = app.table_scroll;
    if cursor < scroll {
        scroll = cursor;
    } else if visible_rows > 0 && cursor >= scroll + visible_rows {
        scroll = cursor + 1 - visible_rows;
    }

    let matcher = app.search_matcher();
    let header_style = Style::default()
        .fg(app.theme.dim)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let header = format!(
        " {}  {}  {}  {}  {}  {}",
        pad_to_width("ID", id_w),
        pad_to_width("SEV", SEVERITY_W),
        pad_to_width("STATUS", STATUS_W),
        pad_to_width("TYPE", TYPE_W),
        pad_to_width("PROJECT", project_w),
        "TITLE"
    );
    let mut lines = vec![Line::from(Span::styled(header, header_style))];

    for (i, item) in items.iter().enumerate().skip(scroll).take(visible_rows) {
        let is_cursor = i == cursor;
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let cell = |fg| Style::default().fg(fg).bg(row_bg);

        let mut spans = vec![
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(
                pad_to_width(&item.id, id_w),
                cell(if is_cursor { app.theme.text_bright } else { app.theme.dim }),
            ),
            Span::styled("  ", Style::default().bg(row_bg)),
            Span::styled(
                pad_to_width(item.severity.label(), SEVERITY_W),
                cell(app.theme.severity_color(item.severity)),
            ),
            Span::styled("  ", Style::default().bg(row_bg)),
            Span::styled(
                pad_to_width(item.status.label(), STATUS_W),
                cell(app.theme.status_color(item.status)),
            ),
            Span::styled("  ", Style::default().bg(row_bg)),
            Span::styled(
                pad_to_width(item.kind.label(), TYPE_W),
                cell(app.theme.type_color(item.kind)),
            ),
            Span::styled("  ", Style::default().bg(row_bg)),
            Span::styled(
                pad_to_width(
                    &truncate_to_width(project_name(projects, &item.project_id), project_w),
                    project_w,
                ),
                cell(app.theme.text),
            ),
            Span::styled("  ", Style::default().bg(row_bg)),
        ];

        let mut title_style = cell(app.theme.text_bright);
        if is_cursor {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }
        let highlight = Style::default()
            .fg(app.theme.search_match_fg)
            .bg(app.theme.search_match_bg);
        push_highlighted_spans(
            &mut spans,
            &truncate_to_width(&item.title, title_w),
            title_style,
            highlight,
            matcher.as_ref(),
        );

        if is_cursor {
            pad_spans(&mut spans, width, Style::default().bg(row_bg));
        }
        lines.push(Line::from(spans));
    }

    app.table_scroll = scroll;
    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DebtItem;
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;

    fn render(app: &mut App, h: u16) -> String {
        render_to_string(TERM_W, h, |frame, area| render_table_view(frame, app, area))
    }

    #[test]
    fn rows_in_collection_order() {
        let mut app = app_with_items(sample_items());
        assert_snapshot!(render(&mut app, 6), @r"
         ID      SEV     STATUS       TYPE           PROJECT       TITLE
         UX-001  High    Open         Accessibility  Main Website  Navigation links mis…
         UX-002  Medium  In Progress  Usability      Mobile App    Unclear password err…
         UX-003  Low     Resolved     Visual         Main Website  Table headers misali…
        ");
    }

    #[test]
    fn empty_states() {
        let mut app = app_with_items(Vec::new());
        assert!(render(&mut app, 4).contains("No debt items yet"));

        let mut app = app_with_items(sample_items());
        app.filter.search = "nothing like this".into();
        assert!(render(&mut app, 4).contains("No items match the current filters"));
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let items: Vec<DebtItem> = (1..=10)
            .map(|n| DebtItem {
                id: format!("UX-{:03}", n),
                ..sample_items().remove(0)
            })
            .collect();
        let mut app = app_with_items(items);
        app.table_cursor = 8;
        let output = render(&mut app, 4);
        assert_eq!(app.table_scroll, 6);
        assert!(output.contains("UX-009"));
        assert!(!output.contains("UX-006"));
    }
}
