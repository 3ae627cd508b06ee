use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Collapse all whitespace runs (newlines included) to single spaces and
/// truncate to `max_cells`. Used for one-line previews of multi-line text.
pub fn excerpt(s: &str, max_cells: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_to_width(&flat, max_cells)
}

/// Next grapheme boundary after `byte_offset`. Returns None if at end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset >= s.len() {
        return None;
    }
    match s[byte_offset..].grapheme_indices(true).nth(1) {
        Some((i, _)) => Some(byte_offset + i),
        None => Some(s.len()),
    }
}

/// Previous grapheme boundary before `byte_offset`. Returns None if at start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset].grapheme_indices(true).last().map(|(i, _)| i)
}

/// Convert byte offset to display column (terminal cells).
pub fn byte_offset_to_display_col(s: &str, byte_offset: usize) -> usize {
    display_width(&s[..byte_offset.min(s.len())])
}

/// Start of the word before `byte_offset` (whitespace-delimited), for ctrl-w.
pub fn word_boundary_left(s: &str, byte_offset: usize) -> usize {
    let prefix = &s[..byte_offset.min(s.len())];
    let trimmed = prefix.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(i) => i + trimmed[i..].chars().next().map_or(1, char::len_utf8),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_cells() {
        assert_eq!(display_width("Plato"), 5);
        assert_eq!(display_width("論語"), 4);
        assert_eq!(display_width("cafe\u{0301}"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Dune", 10), "Dune");
        assert_eq!(truncate_to_width("Dune", 4), "Dune");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("The Republic", 8), "The Rep\u{2026}");
        assert_eq!(truncate_to_width("論語論語", 5), "論語\u{2026}");
        assert_eq!(truncate_to_width("anything", 1), "\u{2026}");
        assert_eq!(truncate_to_width("anything", 0), "");
    }

    #[test]
    fn excerpt_flattens_lines() {
        assert_eq!(excerpt("# Evil\n\nThe  problem", 40), "# Evil The problem");
        assert_eq!(excerpt("one two three", 8), "one two\u{2026}");
    }

    #[test]
    fn grapheme_steps() {
        let s = "a🎉b";
        assert_eq!(next_grapheme_boundary(s, 0), Some(1));
        assert_eq!(next_grapheme_boundary(s, 1), Some(5));
        assert_eq!(next_grapheme_boundary(s, 6), None);
        assert_eq!(prev_grapheme_boundary(s, 5), Some(1));
        assert_eq!(prev_grapheme_boundary(s, 0), None);

        let accented = "e\u{0301}x";
        assert_eq!(next_grapheme_boundary(accented, 0), Some(3));
    }

    #[test]
    fn cursor_column() {
        assert_eq!(byte_offset_to_display_col("論語", 3), 2);
        assert_eq!(byte_offset_to_display_col("abc", 99), 3);
    }

    #[test]
    fn word_left() {
        let s = "mere christianity  ";
        assert_eq!(word_boundary_left(s, s.len()), 5);
        assert_eq!(word_boundary_left(s, 5), 0);
        assert_eq!(word_boundary_left("x", 0), 0);
    }
}
