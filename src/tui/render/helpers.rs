use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad a line of spans with `style` out to `width` cells
pub(super) fn pad_spans(spans: &mut Vec<Span<'static>>, width: usize, style: Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

/// Put `right` at the right edge after `left`, if both fit
pub(super) fn push_right_aligned(
    spans: &mut Vec<Span<'static>>,
    right: Span<'static>,
    width: usize,
    fill: Style,
) {
    let used = spans_width(spans);
    let right_w = unicode::display_width(&right.content);
    if used + right_w < width {
        spans.push(Span::styled(" ".repeat(width - used - right_w), fill));
        spans.push(right);
    }
}

/// Text progress bar drawn with block characters
pub(super) fn progress_bar(progress: u8, width: usize) -> (String, String) {
    let filled = ((progress as usize * width + 50) / 100).min(width);
    ("█".repeat(filled), "░".repeat(width - filled))
}
