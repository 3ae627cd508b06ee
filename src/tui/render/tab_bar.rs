use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Tab};

use super::helpers::push_right_aligned;

/// Render the tab bar: library name, tabs, and the active filter summary,
/// with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);

    let sep = Paragraph::new("\u{2500}".repeat(area.width as usize))
        .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep, chunks[1]);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans: Vec<Span<'static>> = vec![
        Span::styled(" ", bg_style),
        Span::styled("\u{25B6}", Style::default().fg(app.theme.purple).bg(bg)),
        Span::styled(
            format!(" {} ", app.library_name()),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        sep.clone(),
    ];

    for (tab, label) in [(Tab::Library, "Library"), (Tab::Dashboard, "Dashboard")] {
        spans.push(Span::styled(format!(" {} ", label), tab_style(app, app.tab == tab)));
        spans.push(sep.clone());
    }

    if app.tab == Tab::Library && app.query.is_narrowed() {
        let mut parts = Vec::new();
        if let crate::ops::view::StatusFilter::Only(status) = app.query.status {
            parts.push(status.label().to_string());
        }
        if let Some(subject) = &app.query.subject {
            parts.push(subject.clone());
        }
        if !app.query.search.is_empty() {
            parts.push(format!("/{}", app.query.search));
        }
        let summary = Span::styled(
            format!("{} ", parts.join(" \u{00B7} ")),
            Style::default().fg(app.theme.cyan).bg(bg),
        );
        push_right_aligned(&mut spans, summary, area.width as usize, bg_style);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}
