use chrono::Utc;

use crate::model::config::LibraryConfig;
use crate::model::material::{Material, MaterialDraft, Status, default_material_type};
use crate::ops::normalize::new_id;
use crate::ops::reconcile::{PROGRESS_STEP, on_progress_change, on_status_change};

/// A form submission that cannot be accepted. The caller keeps the draft so
/// the user can correct it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("unknown subject \"{0}\" (see `lec subjects`)")]
    UnknownSubject(String),
    #[error("progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(i64),
}

/// Error type for id lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaterialError {
    #[error("id prefix \"{prefix}\" matches {count} records, use more characters")]
    Ambiguous { prefix: String, count: usize },
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn required(value: Option<&str>, field: &'static str) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn check_subject(config: &LibraryConfig, subject: &str) -> Result<String, ValidationError> {
    if config.subjects.is_empty() {
        return Ok(subject.to_string());
    }
    config
        .find_subject(subject)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::UnknownSubject(subject.to_string()))
}

fn check_progress(progress: i64) -> Result<u8, ValidationError> {
    if (0..=100).contains(&progress) {
        Ok(progress as u8)
    } else {
        Err(ValidationError::ProgressOutOfRange(progress))
    }
}

/// Validate a draft for creation and build the record it describes.
///
/// The status's implied progress is applied here so a new record satisfies the
/// same invariants the reconciler maintains afterwards.
pub fn validate_draft(draft: &MaterialDraft, config: &LibraryConfig) -> Result<Material, ValidationError> {
    let title = required(draft.title.as_deref(), "title")?;
    let author = required(draft.author.as_deref(), "author")?;
    let subject = required(draft.category.as_deref(), "subject")?;
    let category = check_subject(config, &subject)?;
    let status = draft.status.unwrap_or(Status::ToRead);
    let mut progress = check_progress(draft.progress.unwrap_or(0))?;

    match status {
        Status::Completed => progress = 100,
        Status::ToRead => progress = 0,
        _ => {}
    }

    Ok(Material {
        id: new_id(),
        title,
        author,
        material_type: optional(draft.material_type.as_deref()).unwrap_or_else(default_material_type),
        material_link: optional(draft.material_link.as_deref()),
        category,
        status,
        progress,
        notes: optional(draft.notes.as_deref()),
        date_added: Utc::now(),
        last_read: None,
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Validate and append a new material. Returns its id.
pub fn create_material(
    materials: &mut Vec<Material>,
    draft: &MaterialDraft,
    config: &LibraryConfig,
) -> Result<String, ValidationError> {
    let material = validate_draft(draft, config)?;
    let id = material.id.clone();
    tracing::info!(id = %id, title = %material.title, "material added");
    materials.push(material);
    Ok(id)
}

/// Apply an edit. Fields absent from the draft keep their value; status and
/// progress go through the reconciler (status first). Returns false if no
/// material has that id.
pub fn edit_material(
    materials: &mut [Material],
    id: &str,
    draft: &MaterialDraft,
    config: &LibraryConfig,
) -> Result<bool, ValidationError> {
    let Some(material) = find_material_mut(materials, id) else {
        return Ok(false);
    };

    // Validate everything before touching the record
    let title = draft
        .title
        .as_deref()
        .map(|t| required(Some(t), "title"))
        .transpose()?;
    let author = draft
        .author
        .as_deref()
        .map(|a| required(Some(a), "author"))
        .transpose()?;
    let category = draft
        .category
        .as_deref()
        .map(|c| required(Some(c), "subject").and_then(|c| check_subject(config, &c)))
        .transpose()?;
    if let Some(p) = draft.progress {
        check_progress(p)?;
    }

    if let Some(title) = title {
        material.title = title;
    }
    if let Some(author) = author {
        material.author = author;
    }
    if let Some(category) = category {
        material.category = category;
    }
    if let Some(t) = &draft.material_type {
        material.material_type = optional(Some(t)).unwrap_or_else(default_material_type);
    }
    if let Some(link) = &draft.material_link {
        material.material_link = optional(Some(link));
    }
    if let Some(notes) = &draft.notes {
        material.notes = optional(Some(notes));
    }
    if let Some(status) = draft.status
        && status != material.status
    {
        on_status_change(material, status);
    }
    if let Some(p) = draft.progress
        && p != i64::from(material.progress)
    {
        on_progress_change(material, p);
    }
    Ok(true)
}

/// Remove a material, returning it with the index it held so a failed save
/// can put it back in place. `None` when the id is unknown.
pub fn delete_material(materials: &mut Vec<Material>, id: &str) -> Option<(usize, Material)> {
    let index = materials.iter().position(|m| m.id == id)?;
    let removed = materials.remove(index);
    tracing::info!(id = %removed.id, title = %removed.title, "material deleted");
    Some((index, removed))
}

pub fn find_material<'a>(materials: &'a [Material], id: &str) -> Option<&'a Material> {
    materials.iter().find(|m| m.id == id)
}

pub fn find_material_mut<'a>(materials: &'a mut [Material], id: &str) -> Option<&'a mut Material> {
    materials.iter_mut().find(|m| m.id == id)
}

/// Resolve user input to a full material id. See `resolve_prefix`.
pub fn resolve_id(materials: &[Material], input: &str) -> Result<Option<String>, MaterialError> {
    resolve_prefix(materials.iter().map(|m| m.id.as_str()), input)
}

/// Resolve user input against a set of ids: an exact id, or a prefix shared
/// by exactly one of them. `Ok(None)` means nothing matched.
pub fn resolve_prefix<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    input: &str,
) -> Result<Option<String>, MaterialError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let hits: Vec<&str> = ids.into_iter().filter(|id| id.starts_with(input)).collect();
    if hits.contains(&input) {
        return Ok(Some(input.to_string()));
    }
    match hits.len() {
        0 => Ok(None),
        1 => Ok(Some(hits[0].to_string())),
        count => Err(MaterialError::Ambiguous {
            prefix: input.to_string(),
            count,
        }),
    }
}

/// Short form of an id for display
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((i, _)) => &id[..i],
        None => id,
    }
}

// ---------------------------------------------------------------------------
// Quick action
// ---------------------------------------------------------------------------

/// The one-key action offered on every card, chosen by status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    /// ToRead → Reading
    Start,
    /// Reading: progress +10
    Continue,
    /// Completed: notification only
    Review,
    /// Paused → Reading
    Resume,
}

impl QuickAction {
    pub fn for_status(status: Status) -> QuickAction {
        match status {
            Status::ToRead => QuickAction::Start,
            Status::Reading => QuickAction::Continue,
            Status::Completed => QuickAction::Review,
            Status::Paused => QuickAction::Resume,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuickAction::Start => "Start",
            QuickAction::Continue => "Continue",
            QuickAction::Review => "Review",
            QuickAction::Resume => "Resume",
        }
    }

    /// Whether running it changes the record
    pub fn mutates(self) -> bool {
        self != QuickAction::Review
    }
}

/// Run the quick action for a material's current status and return the
/// notification text. `None` when the id is unknown.
pub fn apply_quick_action(materials: &mut [Material], id: &str) -> Option<String> {
    let material = find_material_mut(materials, id)?;
    let action = QuickAction::for_status(material.status);
    let message = match action {
        QuickAction::Start => {
            on_status_change(material, Status::Reading);
            format!("Started reading \"{}\"", material.title)
        }
        QuickAction::Continue => {
            let target = (i64::from(material.progress) + PROGRESS_STEP).min(100);
            on_progress_change(material, target);
            format!("Progress updated: {}%", material.progress)
        }
        QuickAction::Review => format!("\"{}\" is already completed!", material.title),
        QuickAction::Resume => {
            on_status_change(material, Status::Reading);
            format!("Resumed \"{}\"", material.title)
        }
    };
    Some(message)
}
