use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Status;
use crate::ops::stats::{currently_reading, library_stats, subject_counts};
use crate::ops::task_ops;
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::helpers::progress_bar;

const READING_LIMIT: usize = 3;
const TASK_LIMIT: usize = 5;

/// Render the dashboard: totals per status, what is being read, the next
/// pending tasks and per-subject counts
pub fn render_dashboard_view(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let width = area.width as usize;
    let heading = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(theme.text).bg(bg);
    let dim = Style::default().fg(theme.dim).bg(bg);

    let materials = &app.library.materials;
    let stats = library_stats(materials);
    let mut lines: Vec<Line> = Vec::new();

    // Totals
    let mut spans = vec![Span::styled(format!(" Total {}", stats.total), heading)];
    for status in Status::all() {
        spans.push(Span::styled("   ", dim));
        spans.push(Span::styled(
            format!("{} {}", status.label(), stats.count(status)),
            Style::default().fg(theme.status_color(status)).bg(bg),
        ));
    }
    lines.push(Line::from(spans));
    lines.push(Line::from(""));

    // Currently reading
    lines.push(Line::from(Span::styled(" Currently reading", heading)));
    let reading = currently_reading(materials, READING_LIMIT);
    if reading.is_empty() {
        lines.push(Line::from(Span::styled("   Nothing in progress", dim)));
    }
    for m in reading {
        let (filled, empty) = progress_bar(m.progress, 10);
        let title = truncate_to_width(&m.title, width.saturating_sub(24).max(1));
        lines.push(Line::from(vec![
            Span::styled("   ", dim),
            Span::styled(filled, Style::default().fg(theme.highlight).bg(bg)),
            Span::styled(empty, dim),
            Span::styled(format!(" {:>3}%  ", m.progress), text),
            Span::styled(title, text),
        ]));
    }
    lines.push(Line::from(""));

    // Pending tasks
    lines.push(Line::from(Span::styled(" Pending tasks", heading)));
    let tasks = task_ops::pending(&app.library.tasks, Some(TASK_LIMIT));
    if tasks.is_empty() {
        lines.push(Line::from(Span::styled("   No pending tasks", dim)));
    }
    for task in tasks {
        let mut spans = vec![
            Span::styled("   [ ] ", dim),
            Span::styled(task.title.clone(), text),
        ];
        if let Some(subject) = &task.subject {
            spans.push(Span::styled(
                format!("  {}", subject),
                Style::default().fg(theme.subject_color(subject)).bg(bg),
            ));
        }
        if let Some(due) = task.due_date {
            spans.push(Span::styled(format!("  due {}", due.format("%Y-%m-%d")), dim));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    // Subjects
    lines.push(Line::from(Span::styled(" Subjects", heading)));
    for (subject, count) in subject_counts(materials, &app.library.config) {
        let style = if count == 0 {
            dim
        } else {
            Style::default().fg(theme.subject_color(&subject)).bg(bg)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("   {:>3}  ", count), text),
            Span::styled(subject, style),
        ]));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudyTask;
    use crate::tui::render::test_helpers::{
        TERM_H, TERM_W, app_with_materials, render_to_string, sample_material,
    };
    use chrono::{DateTime, NaiveDate, Utc};

    fn task(title: &str, due: Option<NaiveDate>, completed: bool) -> StudyTask {
        StudyTask {
            id: title.to_lowercase(),
            title: title.into(),
            description: None,
            subject: Some("Physics".into()),
            due_date: due,
            completed,
            created_at: DateTime::<Utc>::default(),
        }
    }

    #[test]
    fn dashboard_sections() {
        let mut reading = sample_material("Cosmos");
        reading.status = Status::Reading;
        reading.progress = 40;
        reading.category = "Cosmology".into();
        let mut app = app_with_materials(vec![reading, sample_material("Orthodoxy")]);
        app.library.tasks = vec![
            task("Problem set", NaiveDate::from_ymd_opt(2024, 3, 1), false),
            task("Old reading", None, true),
        ];

        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_dashboard_view(frame, &app, area);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            " Total 2   To Read 1   Reading 1   Completed 0   Paused 0"
        );
        assert!(output.contains("  40%  Cosmos"));
        assert!(output.contains("   [ ] Problem set  Physics  due 2024-03-01"));
        assert!(!output.contains("Old reading"));
        assert!(output.contains("     1  Cosmology"));
        assert!(output.contains("     0  Mathematics"));
    }

    #[test]
    fn empty_library_dashboard() {
        let app = app_with_materials(vec![]);
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_dashboard_view(frame, &app, area);
        });
        assert!(output.contains("Nothing in progress"));
        assert!(output.contains("No pending tasks"));
    }
}
