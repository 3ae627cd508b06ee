use indexmap::IndexMap;
use serde::Serialize;

use crate::model::material::{Material, Status};
use crate::model::note::Note;
use crate::model::study_task::StudyTask;
use crate::ops::material_ops::{QuickAction, short_id};
use crate::ops::normalize::canonical_status;
use crate::ops::stats::LibraryStats;
use crate::ops::view::{PageSlot, ViewPage, page_window, showing_range};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialListJson<'a> {
    pub page: usize,
    pub total_pages: usize,
    pub total_matching: usize,
    pub items: Vec<&'a Material>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsJson {
    pub total: usize,
    pub to_read: usize,
    pub reading: usize,
    pub completed: usize,
    pub paused: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardJson<'a> {
    pub stats: StatsJson,
    pub currently_reading: Vec<&'a Material>,
    pub pending_tasks: Vec<&'a StudyTask>,
}

#[derive(Serialize)]
pub struct SubjectCountJson {
    pub subject: String,
    pub count: usize,
    pub configured: bool,
}

#[derive(Serialize)]
pub struct ActionResultJson {
    pub id: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn stats_to_json(stats: &LibraryStats) -> StatsJson {
    StatsJson {
        total: stats.total,
        to_read: stats.to_read,
        reading: stats.reading,
        completed: stats.completed,
        paused: stats.paused,
    }
}

pub fn subject_counts_to_json(counts: &IndexMap<String, usize>, configured: &[String]) -> Vec<SubjectCountJson> {
    counts
        .iter()
        .map(|(subject, count)| SubjectCountJson {
            subject: subject.clone(),
            count: *count,
            configured: configured.iter().any(|s| s == subject),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Fixed-width textual progress bar, e.g. `[####------]`
pub fn format_progress_bar(progress: u8, width: usize) -> String {
    let filled = (progress as usize * width + 50) / 100;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// One-line summary of a material
pub fn format_material_line(m: &Material) -> String {
    format!(
        "{} {}  {} by {}  ({}, {}, {}%)",
        m.status.icon(),
        short_id(&m.id),
        m.title,
        m.author,
        m.material_type,
        m.category,
        m.progress
    )
}

/// Full detail view of a material
pub fn format_material_detail(m: &Material) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", m.status.icon(), m.title),
        format!("id: {}", m.id),
        format!("author: {}", m.author),
        format!("type: {}", m.material_type),
        format!("subject: {}", m.category),
        format!("status: {}", m.status),
        format!("progress: {} {}%", format_progress_bar(m.progress, 20), m.progress),
    ];
    if let Some(link) = &m.material_link {
        lines.push(format!("link: {}", link));
    }
    lines.push(format!("added: {}", m.date_added.format("%Y-%m-%d")));
    if let Some(read) = m.last_read {
        lines.push(format!("last read: {}", read.format("%Y-%m-%d %H:%M")));
    }
    lines.push(format!("quick action: {}", QuickAction::for_status(m.status).label()));
    if let Some(notes) = &m.notes {
        lines.push("notes:".to_string());
        for line in notes.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

/// Listing for one view-model page, with the showing/pagination footer
pub fn format_material_page(page: &ViewPage<'_>, page_size: usize, narrowed: bool) -> Vec<String> {
    let mut lines: Vec<String> = page.items.iter().map(|m| format_material_line(m)).collect();

    if page.total_matching == 0 {
        lines.push(empty_state_message(narrowed).to_string());
        return lines;
    }
    if page.items.is_empty() {
        lines.push(format!("page {} is past the end", page.page));
    }

    lines.push(String::new());
    let showing = match showing_range(page.page, page_size, page.total_matching) {
        Some((from, to)) => format!("Showing {}-{} of {}", from, to, page.total_matching),
        None => format!("Showing 0 of {}", page.total_matching),
    };
    if page.total_pages > 1 {
        lines.push(format!("{}  {}", showing, format_page_window(page.page, page.total_pages)));
    } else {
        lines.push(showing);
    }
    lines
}

/// Pagination bar such as `1 ... 4 [5] 6 ... 9`
pub fn format_page_window(current: usize, total: usize) -> String {
    page_window(current, total)
        .into_iter()
        .map(|slot| match slot {
            PageSlot::Page(p) if p == current => format!("[{}]", p),
            PageSlot::Page(p) => p.to_string(),
            PageSlot::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Message shown when nothing matches the current view
pub fn empty_state_message(narrowed: bool) -> &'static str {
    if narrowed {
        "No materials match the current search or filters."
    } else {
        "No materials yet. Add one with `lec add`."
    }
}

pub fn format_stats(stats: &LibraryStats) -> Vec<String> {
    let mut lines = vec![format!("Total: {}", stats.total)];
    for status in Status::all() {
        lines.push(format!("  {} {:<10} {}", status.icon(), status.label(), stats.count(status)));
    }
    lines
}

pub fn format_note_line(n: &Note) -> String {
    let tags = if n.tags.is_empty() {
        String::new()
    } else {
        format!(
            " {}",
            n.tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ")
        )
    };
    format!("{}  {} ({}){}", short_id(&n.id), n.title, n.subject, tags)
}

pub fn format_note_detail(n: &Note) -> Vec<String> {
    let mut lines = vec![
        n.title.clone(),
        format!("id: {}", n.id),
        format!("subject: {}", n.subject),
    ];
    if !n.tags.is_empty() {
        lines.push(format!("tags: {}", n.tags.join(", ")));
    }
    lines.push(format!("created: {}", n.created_at.format("%Y-%m-%d %H:%M")));
    lines.push(format!("updated: {}", n.updated_at.format("%Y-%m-%d %H:%M")));
    if !n.content.is_empty() {
        lines.push(String::new());
        lines.extend(n.content.lines().map(str::to_string));
    }
    lines
}

pub fn format_task_line(t: &StudyTask) -> String {
    let check = if t.completed { "[x]" } else { "[ ]" };
    let mut line = format!("{} {}  {}", check, short_id(&t.id), t.title);
    if let Some(subject) = &t.subject {
        line.push_str(&format!(" ({})", subject));
    }
    if let Some(due) = t.due_date {
        line.push_str(&format!(" due {}", due.format("%Y-%m-%d")));
    }
    line
}

/// Parse a user-supplied status. Unlike load-time coercion, unknown labels are rejected.
pub fn parse_status(s: &str) -> Result<Status, String> {
    canonical_status(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: to-read, reading, completed, paused)",
            s
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn material() -> Material {
        Material {
            id: "0123456789abcdef".into(),
            title: "The Republic".into(),
            author: "Plato".into(),
            material_type: "Book".into(),
            material_link: None,
            category: "Philosophy".into(),
            status: Status::Reading,
            progress: 30,
            notes: Some("book I\nbook II".into()),
            date_added: DateTime::<Utc>::default(),
            last_read: None,
        }
    }

    #[test]
    fn progress_bar_rounds() {
        assert_eq!(format_progress_bar(0, 10), "[----------]");
        assert_eq!(format_progress_bar(45, 10), "[#####-----]");
        assert_eq!(format_progress_bar(100, 4), "[####]");
    }

    #[test]
    fn material_line() {
        assert_eq!(
            format_material_line(&material()),
            "[>] 01234567  The Republic by Plato  (Book, Philosophy, 30%)"
        );
    }

    #[test]
    fn material_detail_lists_notes_and_action() {
        let lines = format_material_detail(&material());
        assert!(lines.contains(&"quick action: Continue".to_string()));
        assert!(lines.contains(&"  book II".to_string()));
        assert!(lines.contains(&"added: 1970-01-01".to_string()));
    }

    #[test]
    fn page_window_marks_current() {
        assert_eq!(format_page_window(1, 2), "[1] 2");
    }

    #[test]
    fn status_parsing_rejects_unknown() {
        assert_eq!(parse_status("Currently Reading"), Ok(Status::Reading));
        assert_eq!(parse_status("done"), Ok(Status::Completed));
        assert!(parse_status("Archived").is_err());
    }

    #[test]
    fn empty_state_depends_on_filters() {
        assert!(empty_state_message(true).contains("match"));
        assert!(empty_state_message(false).contains("lec add"));
    }
}
