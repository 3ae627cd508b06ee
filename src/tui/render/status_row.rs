use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

use super::helpers::push_right_aligned;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let fill = Style::default().bg(bg);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let line = match app.mode {
        Mode::Navigate => {
            let help = app.actions.help_line(app.tab);
            if let Some(message) = &app.status_message {
                let color = if message.is_warning {
                    app.theme.red
                } else {
                    app.theme.green
                };
                Line::from(Span::styled(
                    message.text.clone(),
                    Style::default().fg(color).bg(bg),
                ))
            } else if !app.query.search.is_empty() {
                // Active search dimmed, hints to the right
                let mut spans = vec![Span::styled(format!("/{}", app.query.search), dim)];
                push_right_aligned(&mut spans, Span::styled(help, dim), width, fill);
                Line::from(spans)
            } else {
                Line::from(Span::styled(help, dim))
            }
        }
        Mode::Search => {
            // Search prompt: /pattern▌
            let mut spans = vec![
                Span::styled(
                    format!("/{}", app.search_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ];
            push_right_aligned(
                &mut spans,
                Span::styled("Enter search  Esc cancel", dim),
                width,
                fill,
            );
            Line::from(spans)
        }
        Mode::Confirm => {
            let prompt = app
                .confirm_state
                .as_ref()
                .map(|c| c.prompt.clone())
                .unwrap_or_default();
            let mut spans = vec![Span::styled(
                prompt,
                Style::default().fg(app.theme.yellow).bg(bg),
            )];
            push_right_aligned(&mut spans, Span::styled("y delete  n/Esc keep", dim), width, fill);
            Line::from(spans)
        }
        Mode::StatusPick => Line::from(Span::styled(
            "j/k choose  1-4 pick  Enter apply  Esc cancel",
            dim,
        )),
        Mode::Form => Line::from(Span::styled(
            "Tab next field  \u{2190}/\u{2192} change  Enter save  Esc cancel",
            dim,
        )),
    };

    let paragraph = Paragraph::new(line).style(fill);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{ConfirmAction, ConfirmState};
    use crate::tui::render::test_helpers::{TERM_W, app_with_materials, render_to_string};

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, app, area);
        })
    }

    #[test]
    fn navigate_shows_help_from_action_table() {
        let app = app_with_materials(vec![]);
        let help = app.actions.help_line(app.tab);
        let output = render(&app);
        assert!(output.starts_with("j/k move  h/l page  \u{23CE} quick"));
        assert!(help.starts_with(&output));
    }

    #[test]
    fn message_replaces_hints() {
        let mut app = app_with_materials(vec![]);
        app.warn("Could not save");
        assert_eq!(render(&app), "Could not save");
    }

    #[test]
    fn search_prompt_and_active_search() {
        let mut app = app_with_materials(vec![]);
        app.mode = Mode::Search;
        app.search_input = "lew".into();
        let output = render(&app);
        assert!(output.starts_with("/lew\u{258C}"));
        assert!(output.ends_with("Enter search  Esc cancel"));

        app.mode = Mode::Navigate;
        app.query.search = "lewis".into();
        assert!(render(&app).starts_with("/lewis"));
    }

    #[test]
    fn confirm_prompt() {
        let mut app = app_with_materials(vec![]);
        app.mode = Mode::Confirm;
        app.confirm_state = Some(ConfirmState {
            prompt: "Delete \"Orthodoxy\"?".into(),
            action: ConfirmAction::DeleteMaterial { id: "x".into() },
        });
        let output = render(&app);
        assert!(output.starts_with("Delete \"Orthodoxy\"?"));
        assert!(output.ends_with("y delete  n/Esc keep"));
    }
}
