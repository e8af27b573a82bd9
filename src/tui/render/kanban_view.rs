use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::{DebtItem, project_name};
use crate::ops::board::Column;
use crate::ops::filter::SearchMatcher;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

use super::helpers::{pad_spans, severity_abbrev};
use super::push_highlighted_spans;

/// Rows per card, including the spacer below it
const CARD_H: usize = 4;

/// Render the kanban board: one column per status in lifecycle order
pub fn render_kanban_view(frame: &mut Frame, app: &App, area: Rect) {
    let board = app.board();
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let matcher = app.search_matcher();
    for (idx, (column, col_area)) in board.columns.iter().zip(areas.iter()).enumerate() {
        let focused = idx == app.kanban_column;
        render_column(
            frame,
            app,
            column,
            *col_area,
            focused.then_some(app.kanban_cursors[idx]),
            matcher.as_ref(),
        );
    }
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    column: &Column,
    area: Rect,
    cursor: Option<usize>,
    matcher: Option<&SearchMatcher>,
) {
    let bg = app.theme.background;
    let border_color = if cursor.is_some() {
        app.theme.selection_border
    } else {
        app.theme.dim
    };
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", column.status),
            Style::default()
                .fg(app.theme.status_color(column.status))
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("({}) ", column.items.len()),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(title)
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if column.is_empty() {
        let empty = Paragraph::new(column.empty_message())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, inner);
        return;
    }

    // Scroll so the cursor card is fully visible
    let fits = (inner.height as usize / CARD_H).max(1);
    let first = cursor.map_or(0, |c| c.saturating_sub(fits - 1));

    let mut lines: Vec<Line> = Vec::new();
    for (i, item) in column.items.iter().enumerate().skip(first).take(fits + 1) {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        let selected = cursor == Some(i);
        lines.extend(card_lines(app, item, inner.width as usize, selected, matcher));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, inner);
}

/// The three rows of a card: id and severity, title, project
fn card_lines<'a>(
    app: &App,
    item: &DebtItem,
    width: usize,
    selected: bool,
    matcher: Option<&SearchMatcher>,
) -> Vec<Line<'a>> {
    let card_bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let fill = Style::default().bg(card_bg);

    let sev = severity_abbrev(item.severity);
    let kind_w = width.saturating_sub(display_width(&item.id) + 2 + sev.len());
    let mut head = vec![
        Span::styled(
            item.id.clone(),
            Style::default()
                .fg(if selected { app.theme.text_bright } else { app.theme.dim })
                .bg(card_bg),
        ),
        Span::styled(" ", fill),
        Span::styled(
            sev,
            Style::default()
                .fg(app.theme.severity_color(item.severity))
                .bg(card_bg),
        ),
        Span::styled(" ", fill),
        Span::styled(
            truncate_to_width(item.kind.label(), kind_w),
            Style::default().fg(app.theme.type_color(item.kind)).bg(card_bg),
        ),
    ];

    let mut title_style = Style::default().fg(app.theme.text_bright).bg(card_bg);
    if selected {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    let mut title = Vec::new();
    push_highlighted_spans(
        &mut title,
        &truncate_to_width(&item.title, width),
        title_style,
        Style::default()
            .fg(app.theme.search_match_fg)
            .bg(app.theme.search_match_bg),
        matcher,
    );

    let mut project = vec![Span::styled(
        truncate_to_width(project_name(app.tracker.projects(), &item.project_id), width),
        Style::default().fg(app.theme.dim).bg(card_bg),
    )];

    if selected {
        pad_spans(&mut head, width, fill);
        pad_spans(&mut title, width, fill);
        pad_spans(&mut project, width, fill);
    }
    vec![Line::from(head), Line::from(title), Line::from(project)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;

    fn render(app: &App, h: u16) -> String {
        render_to_string(TERM_W, h, |frame, area| render_kanban_view(frame, app, area))
    }

    #[test]
    fn four_columns_with_empty_state() {
        let app = app_with_items(sample_items());
        assert_snapshot!(render(&app, 8), @r"
        ┌ Open (1) ────────┐┌ In Progress (1) ─┐┌ Fixed (0) ───────┐┌ Resolved (1) ────┐
        │UX-001 HIGH Acces…││UX-002 MED Usabil…││No items in fixed ││UX-003 LOW Visual │
        │Navigation links …││Unclear password …││                  ││Table headers mis…│
        │Main Website      ││Mobile App        ││                  ││Main Website      │
        │                  ││                  ││                  ││                  │
        │                  ││                  ││                  ││                  │
        │                  ││                  ││                  ││                  │
        └──────────────────┘└──────────────────┘└──────────────────┘└──────────────────┘
        ");
    }

    #[test]
    fn focused_column_scrolls_to_cursor() {
        let items: Vec<DebtItem> = (1..=6)
            .map(|n| DebtItem {
                id: format!("UX-{:03}", n),
                ..sample_items().remove(0)
            })
            .collect();
        let mut app = app_with_items(items);
        app.kanban_cursors[0] = 5;
        let output = render(&app, 10);
        assert!(output.contains("UX-006"));
        assert!(!output.contains("UX-001"));
    }
}
