use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::{byte_offset_to_display_col, display_width, truncate_to_width};

const LABEL_W: usize = 10;

/// Render the add/edit form as a centered popup. The validation message, if
/// any, sits under the fields and the typed values stay as they were.
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.form else {
        return;
    };
    let theme = &app.theme;
    let bg = theme.background;

    // Sizing: 80% width, min 40, max 90
    let target_w = (area.width as f32 * 0.8) as u16;
    let popup_w = target_w.clamp(40, 90).min(area.width);
    let inner_w = popup_w.saturating_sub(2) as usize;
    let value_w = inner_w.saturating_sub(LABEL_W + 4);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let row_bg = if focused { theme.selection_bg } else { bg };
        let label_style = if focused {
            Style::default().fg(theme.highlight).bg(row_bg)
        } else {
            Style::default().fg(theme.dim).bg(row_bg)
        };
        let value_style = Style::default().fg(theme.text_bright).bg(row_bg);

        let mut spans = vec![Span::styled(
            format!(" {:<width$} ", field.kind.label(), width = LABEL_W),
            label_style,
        )];
        if field.kind.is_choice() {
            let arrow = Style::default().fg(theme.dim).bg(row_bg);
            spans.push(Span::styled("\u{2039} ", arrow));
            spans.push(Span::styled(truncate_to_width(&field.value, value_w), value_style));
            spans.push(Span::styled(" \u{203A}", arrow));
        } else if focused {
            // Split at the cursor so the caret sits where typing goes
            let col = byte_offset_to_display_col(&field.value, field.cursor);
            let shown = truncate_to_width(&field.value, value_w);
            let split = col.min(display_width(&shown));
            let (before, after) = split_at_col(&shown, split);
            spans.push(Span::styled(before, value_style));
            spans.push(Span::styled(
                "\u{258C}",
                Style::default().fg(theme.highlight).bg(row_bg),
            ));
            spans.push(Span::styled(after, value_style));
        } else {
            spans.push(Span::styled(truncate_to_width(&field.value, value_w), value_style));
        }
        let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        if used < inner_w {
            spans.push(Span::styled(" ".repeat(inner_w - used), Style::default().bg(row_bg)));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(theme.red).bg(bg),
        )));
    }

    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(popup_w) / 2;
    let y = area.y + area.height.saturating_sub(popup_h) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", form.title()),
            Style::default()
                .fg(theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

/// Split `s` at a display column
fn split_at_col(s: &str, col: usize) -> (String, String) {
    let mut width = 0;
    for (i, c) in s.char_indices() {
        if width >= col {
            return (s[..i].to_string(), s[i..].to_string());
        }
        width += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
    }
    (s.to_string(), String::new())
}
