use chrono::{NaiveDate, Utc};

use crate::model::config::LibraryConfig;
use crate::model::study_task::StudyTask;
use crate::ops::material_ops::ValidationError;
use crate::ops::normalize::new_id;

/// Create a study task. Only the title is required; a subject, if given,
/// must be configured.
pub fn add_task(
    tasks: &mut Vec<StudyTask>,
    config: &LibraryConfig,
    title: &str,
    description: Option<&str>,
    subject: Option<&str>,
    due_date: Option<NaiveDate>,
) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingField("title"));
    }
    let subject = match subject.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) if config.subjects.is_empty() => Some(s.to_string()),
        Some(s) => Some(
            config
                .find_subject(s)
                .ok_or_else(|| ValidationError::UnknownSubject(s.to_string()))?
                .to_string(),
        ),
        None => None,
    };

    let task = StudyTask {
        id: new_id(),
        title: title.to_string(),
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        subject,
        due_date,
        completed: false,
        created_at: Utc::now(),
    };
    let id = task.id.clone();
    tracing::info!(id = %id, "task added");
    tasks.push(task);
    Ok(id)
}

/// Mark a task done or not done. Returns false if the id is unknown.
pub fn set_completed(tasks: &mut [StudyTask], id: &str, completed: bool) -> bool {
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.completed = completed;
            true
        }
        None => false,
    }
}

pub fn delete_task(tasks: &mut Vec<StudyTask>, id: &str) -> Option<(usize, StudyTask)> {
    let index = tasks.iter().position(|t| t.id == id)?;
    Some((index, tasks.remove(index)))
}

/// Open tasks, earliest due date first (undated last), then oldest first
pub fn pending(tasks: &[StudyTask], limit: Option<usize>) -> Vec<&StudyTask> {
    let mut open: Vec<&StudyTask> = tasks.iter().filter(|t| !t.completed).collect();
    open.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.created_at.cmp(&b.created_at)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.created_at.cmp(&b.created_at),
    });
    if let Some(n) = limit {
        open.truncate(n);
    }
    open
}

/// Parse a due date given as `YYYY-MM-DD`
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
