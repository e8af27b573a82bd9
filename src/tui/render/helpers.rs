use ratatui::text::Span;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad a line of spans out to `width` cells with a styled filler
pub(super) fn pad_spans<'a>(spans: &mut Vec<Span<'a>>, width: usize, style: ratatui::style::Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

/// Short severity label for narrow cells
pub(super) fn severity_abbrev(severity: crate::model::Severity) -> &'static str {
    match severity {
        crate::model::Severity::High => "HIGH",
        crate::model::Severity::Medium => "MED",
        crate::model::Severity::Low => "LOW",
    }
}
