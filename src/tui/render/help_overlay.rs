use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, View};

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let section = |lines: &mut Vec<Line<'static>>, title: &str, bindings: &[(&'static str, &'static str)]| {
        push_section(lines, title, bindings, header_style, key_style, desc_style);
    };

    match app.view {
        View::Table => section(
            &mut lines,
            "Table",
            &[
                (" \u{2191}\u{2193}/jk", "Move cursor up/down"),
                (" g/G", "Jump to top/bottom"),
                (" Enter", "Advance status"),
                (" 1-4", "Set status directly"),
                (" d", "Delete item"),
            ],
        ),
        View::Kanban => section(
            &mut lines,
            "Kanban",
            &[
                (" \u{2191}\u{2193}/jk", "Move within column"),
                (" \u{2190}\u{2192}/hl", "Switch column"),
                (" H/L", "Move card back/forward"),
                (" Enter", "Advance status"),
                (" d", "Delete item"),
            ],
        ),
        View::Analytics => section(
            &mut lines,
            "Analytics",
            &[
                (" r", "Cycle time range"),
                (" p", "Cycle project"),
            ],
        ),
    }

    section(
        &mut lines,
        "Filters",
        &[
            (" /", "Search title and description"),
            (" s/t/p", "Cycle severity/type/project"),
            (" f", "Cycle status"),
            (" c", "Clear all filters"),
        ],
    );
    section(
        &mut lines,
        "General",
        &[
            (" Tab/S-Tab", "Next/previous view"),
            (" R", "Reload from disk"),
            (" q", "Quit"),
        ],
    );

    let block = Block::default()
        .title(Span::styled(" Key Bindings ", header_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, overlay_area);
}

fn push_section(
    lines: &mut Vec<Line<'static>>,
    title: &str,
    bindings: &[(&'static str, &'static str)],
    header_style: Style,
    key_style: Style,
    desc_style: Style,
) {
    if !lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(format!(" {}", title), header_style)));
    for &(key, desc) in bindings {
        add_binding(lines, key, desc, key_style, desc_style);
    }
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let padded_key = format!("{:<width$}", key, width = 14);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
