use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::Status;
use crate::tui::app::App;

const POPUP_W: u16 = 24;

/// Render the status dropdown for the selected card
pub fn render_status_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(pick) = &app.status_pick else {
        return;
    };
    let theme = &app.theme;
    let bg = theme.background;
    let current = app
        .library
        .materials
        .iter()
        .find(|m| m.id == pick.id)
        .map(|m| m.status);

    let inner_w = POPUP_W.saturating_sub(2) as usize;
    let lines: Vec<Line> = Status::all()
        .iter()
        .enumerate()
        .map(|(i, status)| {
            let is_cursor = i == pick.cursor;
            let row_bg = if is_cursor { theme.selection_bg } else { bg };
            let marker = if current == Some(*status) { "\u{2022}" } else { " " };
            let text = format!(" {} {} {}", i + 1, marker, status.label());
            let mut style = Style::default().fg(theme.status_color(*status)).bg(row_bg);
            if is_cursor {
                style = style.add_modifier(Modifier::BOLD);
            }
            let pad = inner_w.saturating_sub(text.chars().count());
            Line::from(vec![
                Span::styled(text, style),
                Span::styled(" ".repeat(pad), Style::default().bg(row_bg)),
            ])
        })
        .collect();

    let popup_w = POPUP_W.min(area.width);
    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(popup_w) / 2;
    let y = area.y + area.height.saturating_sub(popup_h) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .title(Span::styled(
            " Status ",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::StatusPickState;
    use crate::tui::render::test_helpers::{app_with_materials, render_to_string, sample_material};

    #[test]
    fn popup_lists_statuses_and_marks_current() {
        let m = sample_material("Orthodoxy");
        let id = m.id.clone();
        let mut app = app_with_materials(vec![m]);
        app.status_pick = Some(StatusPickState { id, cursor: 2 });
        let output = render_to_string(24, 6, |frame, area| {
            render_status_popup(frame, &app, area);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("Status"));
        assert!(lines[1].contains("1 \u{2022} To Read"));
        assert!(lines[3].contains("3   Completed"));
        assert!(lines[4].contains("4   Paused"));
    }
}
