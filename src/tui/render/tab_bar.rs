use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};

use super::helpers::spans_width;

/// Render the tab bar: one tab per view, with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    // Leading icon
    spans.push(Span::styled(" ", Style::default().bg(bg)));
    spans.push(Span::styled(
        "\u{25B6}",
        Style::default().fg(app.theme.purple).bg(bg),
    ));
    spans.push(Span::styled(" ", Style::default().bg(bg)));

    let shown = app.visible().len();
    for view in View::ALL {
        let label = match view {
            View::Table => format!(" {} ({}) ", view.label(), shown),
            _ => format!(" {} ", view.label()),
        };
        spans.push(Span::styled(label, tab_style(app, app.view == view)));
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    let tabs = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim = app.theme.dim;

    let indicator = indicator_text(app);
    let indicator_width = indicator
        .as_ref()
        .map_or(0, |text| crate::util::unicode::display_width(text) + "filter: ".len());
    // +2: one space before the indicator, one after
    let separator_end = if indicator.is_some() {
        width.saturating_sub(indicator_width + 2)
    } else {
        width
    };

    let mut sep_text = String::with_capacity(separator_end * 3);
    for col in 0..separator_end {
        if sep_cols.contains(&col) {
            sep_text.push('\u{2534}');
        } else {
            sep_text.push('\u{2500}');
        }
    }
    let mut spans = vec![Span::styled(sep_text, Style::default().fg(dim).bg(bg))];

    if let Some(text) = indicator {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.push(Span::styled(
            "filter: ",
            Style::default().fg(app.theme.purple).bg(bg),
        ));
        spans.push(Span::styled(
            text,
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }

    let sep_widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(sep_widget, area);
}

/// What the separator line reports on the right: the active filter, plus
/// the time range on the analytics tab
fn indicator_text(app: &App) -> Option<String> {
    let mut parts = Vec::new();
    if !app.filter.is_empty() {
        parts.push(app.filter.describe());
    }
    if app.view == View::Analytics {
        parts.push(format!("range={}", app.analytics_range.key()));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 2, |frame, area| render_tab_bar(frame, app, area))
    }

    #[test]
    fn tabs_with_plain_separator() {
        let app = app_with_items(sample_items());
        assert_snapshot!(render(&app), @r"
         ▶  Table (3) │ Kanban │ Analytics │
        ──────────────┴────────┴───────────┴────────────────────────────────────────────
        ");
    }

    #[test]
    fn filter_indicator_on_separator() {
        let mut app = app_with_items(sample_items());
        app.filter.severity = Some(Severity::High);
        let output = render(&app);
        assert!(output.contains("Table (1)"));
        assert!(output.lines().nth(1).unwrap().ends_with("filter: severity=High"));
    }

    #[test]
    fn analytics_tab_shows_range() {
        let mut app = app_with_items(sample_items());
        app.view = View::Analytics;
        app.cycle_range();
        let output = render(&app);
        assert!(output.lines().nth(1).unwrap().ends_with("filter: range=30d"));
    }
}
