use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::pad_to_width;

const LABEL_W: usize = 14;
const COUNT_W: usize = 4;

/// One bar chart row: label, count, bar color
type Tally = (String, usize, Color);

/// Render the analytics dashboard for the current time range and project
pub fn render_analytics_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let scope = app.analytics_scope();
    let analytics = app.tracker.analytics(&scope, app.window_months);

    let project_label = match &scope.project_id {
        Some(id) => app.tracker.project_name(id).to_string(),
        None => "All projects".to_string(),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let value_style = Style::default().fg(app.theme.text_bright).bg(bg);

    let stat = |label: &str, value: String| {
        vec![
            Span::styled(format!("{} ", label), label_style),
            Span::styled(value, value_style),
            Span::styled("   ", label_style),
        ]
    };
    let mut summary = vec![Span::styled(" ", label_style)];
    summary.extend(stat("Total", analytics.total.to_string()));
    summary.extend(stat(
        "Resolved",
        format!("{} ({:.1}%)", analytics.resolved, analytics.resolved_percent),
    ));
    summary.extend(stat("High severity", analytics.high_severity.to_string()));
    summary.extend(stat("Accessibility", analytics.accessibility.to_string()));

    let header = vec![
        Line::from(Span::styled(
            format!(" {} \u{00B7} {}", scope.range.label(), project_label),
            header_style,
        )),
        Line::from(""),
        Line::from(summary),
    ];
    frame.render_widget(
        Paragraph::new(header).style(Style::default().bg(bg)),
        chunks[0],
    );

    if analytics.total == 0 {
        let empty = Paragraph::new(" No debt items in this range")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2); 2])
        .split(chunks[1]);
    let bar_w = (halves[0].width as usize).saturating_sub(1 + LABEL_W + COUNT_W + 2);

    let by_type: Vec<Tally> = analytics
        .by_type
        .iter()
        .map(|(k, v)| (k.to_string(), *v, app.theme.type_color(*k)))
        .collect();
    let by_severity: Vec<Tally> = analytics
        .by_severity
        .iter()
        .map(|(k, v)| (k.to_string(), *v, app.theme.severity_color(*k)))
        .collect();
    let by_status: Vec<Tally> = analytics
        .by_status
        .iter()
        .map(|(k, v)| (k.to_string(), *v, app.theme.status_color(*k)))
        .collect();
    let by_month: Vec<Tally> = analytics
        .by_month
        .iter()
        .map(|m| (format!("{} {}", m.short_label(), m.year), m.count, app.theme.purple))
        .collect();

    let mut left = tally_lines(app, "By type", &by_type, bar_w);
    left.push(Line::from(""));
    left.extend(tally_lines(app, "By severity", &by_severity, bar_w));

    let mut right = tally_lines(app, "By status", &by_status, bar_w);
    right.push(Line::from(""));
    right.extend(tally_lines(app, "Created per month", &by_month, bar_w));

    frame.render_widget(Paragraph::new(left).style(Style::default().bg(bg)), halves[0]);
    frame.render_widget(Paragraph::new(right).style(Style::default().bg(bg)), halves[1]);
}

/// A titled bar chart, bars scaled to the largest count
fn tally_lines<'a>(app: &App, title: &'a str, rows: &[Tally], bar_w: usize) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let max = rows.iter().map(|(_, count, _)| *count).max().unwrap_or(0);

    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", title),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ))];
    for (label, count, color) in rows {
        let len = if max == 0 || *count == 0 {
            0
        } else {
            (count * bar_w).div_ceil(max)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {}", pad_to_width(label, LABEL_W)),
                Style::default().fg(app.theme.text).bg(bg),
            ),
            Span::styled(
                format!("{:>width$}  ", count, width = COUNT_W),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
            Span::styled("\u{2588}".repeat(len), Style::default().fg(*color).bg(bg)),
        ]));
    }
    lines
}
