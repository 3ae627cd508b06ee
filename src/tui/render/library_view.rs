use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regex::Regex;

use crate::model::Material;
use crate::ops::material_ops::QuickAction;
use crate::ops::view::{PageSlot, ViewPage, page_window, showing_range};
use crate::tui::app::App;
use crate::util::unicode::{display_width, excerpt, truncate_to_width};

use super::helpers::{pad_spans, progress_bar, push_right_aligned, spans_width};
use super::push_highlighted_spans;

/// Width of the card gutter: selection bar plus indent
const GUTTER: usize = 2;
const BAR_WIDTH: usize = 20;

/// Render the library view: query line, cards for the current page, and the
/// pagination bar
pub fn render_library_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // query line
            Constraint::Min(1),    // cards
            Constraint::Length(1), // pagination
        ])
        .split(area);

    let page = app.page();
    render_query_line(frame, app, chunks[0]);

    if page.total_matching == 0 {
        let message = if app.query.is_narrowed() {
            " No materials match the current search or filters. Press x to clear them."
        } else {
            " No materials yet. Press a to add one."
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, chunks[1]);
        return;
    }

    render_cards(frame, app, &page, chunks[1]);
    render_pagination(frame, app, &page, chunks[2]);
}

fn render_query_line(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text).bg(bg);
    let subject = app.query.subject.as_deref().unwrap_or("all");
    let spans = vec![
        Span::styled(" filter ", dim),
        Span::styled(app.query.status.label().to_string(), value),
        Span::styled("  subject ", dim),
        Span::styled(subject.to_string(), value),
        Span::styled("  sort ", dim),
        Span::styled(app.query.sort.as_str().to_string(), value),
    ];
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

fn render_cards(frame: &mut Frame, app: &App, page: &ViewPage<'_>, area: Rect) {
    let width = area.width as usize;
    let search_re = app.search_regex();

    // (card index, line) so the cursor card can be scrolled into view
    let mut lines: Vec<(usize, Line)> = Vec::new();
    for (i, material) in page.items.iter().enumerate() {
        if i > 0 {
            lines.push((i, Line::from("")));
        }
        for line in card_lines(app, material, i == app.cursor, width, search_re.as_ref()) {
            lines.push((i, line));
        }
    }

    let visible = area.height as usize;
    let first = lines.iter().position(|(i, _)| *i == app.cursor).unwrap_or(0);
    let last = lines
        .iter()
        .rposition(|(i, _)| *i == app.cursor)
        .unwrap_or(0);
    let scroll = if last + 1 > visible {
        (last + 1 - visible).min(first)
    } else {
        0
    };

    let lines: Vec<Line> = lines
        .into_iter()
        .skip(scroll)
        .take(visible)
        .map(|(_, line)| line)
        .collect();
    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

/// Lines for one card: title row with status and quick action, a details
/// row, a progress row, and a notes excerpt when there are notes
fn card_lines(
    app: &App,
    m: &Material,
    selected: bool,
    width: usize,
    search_re: Option<&Regex>,
) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let fill = Style::default().bg(bg);
    let dim = Style::default().fg(theme.dim).bg(bg);
    let hl = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);
    let gutter = || {
        if selected {
            Span::styled(
                "\u{258C} ",
                Style::default().fg(theme.selection_border).bg(bg),
            )
        } else {
            Span::styled(" ".repeat(GUTTER), fill)
        }
    };
    let status_style = Style::default().fg(theme.status_color(m.status)).bg(bg);
    let mut out = Vec::new();

    // Title row
    let action = QuickAction::for_status(m.status);
    let action_text = format!("[{}] ", action.label());
    let mut spans = vec![
        gutter(),
        Span::styled(format!("{} ", m.status.icon()), status_style),
    ];
    let title_room = width
        .saturating_sub(spans_width(&spans) + display_width(&action_text) + 1)
        .max(1);
    let title_style = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    push_highlighted_spans(
        &mut spans,
        &truncate_to_width(&m.title, title_room),
        title_style,
        hl,
        search_re,
    );
    let action_style = if selected {
        Style::default().fg(theme.highlight).bg(bg)
    } else {
        dim
    };
    push_right_aligned(&mut spans, Span::styled(action_text, action_style), width, fill);
    pad_spans(&mut spans, width, fill);
    out.push(Line::from(spans));

    // Details row: author, type, subject, link marker
    let text = Style::default().fg(theme.text).bg(bg);
    let mut spans = vec![gutter(), Span::styled("    ", fill)];
    push_highlighted_spans(&mut spans, &m.author, text, hl, search_re);
    spans.push(Span::styled("  \u{00B7}  ", dim));
    push_highlighted_spans(&mut spans, &m.material_type, text, hl, search_re);
    spans.push(Span::styled("  \u{00B7}  ", dim));
    let subject_style = Style::default()
        .fg(theme.subject_color(&m.category))
        .bg(bg);
    push_highlighted_spans(&mut spans, &m.category, subject_style, hl, search_re);
    if m.material_link.is_some() {
        spans.push(Span::styled("  \u{2197} link", Style::default().fg(theme.blue).bg(bg)));
    }
    pad_spans(&mut spans, width, fill);
    out.push(Line::from(spans));

    // Progress row: bar, percentage, status label, dates
    let (filled, empty) = progress_bar(m.progress, BAR_WIDTH);
    let mut spans = vec![
        gutter(),
        Span::styled("    ", fill),
        Span::styled(filled, status_style),
        Span::styled(empty, dim),
        Span::styled(format!(" {:>3}%  ", m.progress), text),
        Span::styled(m.status.label().to_string(), status_style),
        Span::styled(format!("  added {}", m.date_added.format("%Y-%m-%d")), dim),
    ];
    if let Some(read) = m.last_read {
        spans.push(Span::styled(format!("  read {}", read.format("%Y-%m-%d")), dim));
    }
    pad_spans(&mut spans, width, fill);
    out.push(Line::from(spans));

    // Notes excerpt
    if let Some(notes) = &m.notes {
        let room = width.saturating_sub(GUTTER + 4);
        let mut spans = vec![gutter(), Span::styled("    ", fill)];
        push_highlighted_spans(&mut spans, &excerpt(notes, room), dim, hl, search_re);
        pad_spans(&mut spans, width, fill);
        out.push(Line::from(spans));
    }

    out
}

fn render_pagination(frame: &mut Frame, app: &App, page: &ViewPage<'_>, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let showing = match showing_range(page.page, app.query.page_size, page.total_matching) {
        Some((from, to)) => format!(" Showing {}-{} of {}", from, to, page.total_matching),
        None => format!(" Showing 0 of {}", page.total_matching),
    };
    let mut spans: Vec<Span<'static>> = vec![Span::styled(showing, dim)];

    if page.total_pages > 1 {
        spans.push(Span::styled("   ", dim));
        for (i, slot) in page_window(page.page, page.total_pages).into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", dim));
            }
            match slot {
                PageSlot::Page(p) if p == page.page => spans.push(Span::styled(
                    format!("[{}]", p),
                    Style::default()
                        .fg(app.theme.highlight)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                )),
                PageSlot::Page(p) => {
                    spans.push(Span::styled(p.to_string(), Style::default().fg(app.theme.text).bg(bg)))
                }
                PageSlot::Ellipsis => spans.push(Span::styled("\u{2026}", dim)),
            }
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}
