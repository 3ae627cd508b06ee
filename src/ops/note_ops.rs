use chrono::Utc;

use crate::model::config::LibraryConfig;
use crate::model::note::Note;
use crate::ops::material_ops::ValidationError;
use crate::ops::normalize::new_id;

/// Split a comma-separated tag list, dropping blanks and duplicates
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Create a note. Title and a configured subject are required.
pub fn add_note(
    notes: &mut Vec<Note>,
    config: &LibraryConfig,
    title: &str,
    subject: &str,
    content: &str,
    tags: Vec<String>,
) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingField("title"));
    }
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(ValidationError::MissingField("subject"));
    }
    let subject = if config.subjects.is_empty() {
        subject.to_string()
    } else {
        config
            .find_subject(subject)
            .ok_or_else(|| ValidationError::UnknownSubject(subject.to_string()))?
            .to_string()
    };

    let now = Utc::now();
    let note = Note {
        id: new_id(),
        title: title.to_string(),
        content: content.to_string(),
        subject,
        tags,
        created_at: now,
        updated_at: now,
    };
    let id = note.id.clone();
    tracing::info!(id = %id, "note added");
    notes.push(note);
    Ok(id)
}

/// Fields a note edit may change
#[derive(Debug, Clone, Default)]
pub struct NoteEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Apply an edit and bump `updated_at`. Returns false if the id is unknown.
pub fn update_note(notes: &mut [Note], id: &str, edit: NoteEdit) -> Result<bool, ValidationError> {
    let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
        return Ok(false);
    };
    if let Some(title) = &edit.title
        && title.trim().is_empty()
    {
        return Err(ValidationError::MissingField("title"));
    }
    if let Some(title) = edit.title {
        note.title = title.trim().to_string();
    }
    if let Some(content) = edit.content {
        note.content = content;
    }
    if let Some(tags) = edit.tags {
        note.tags = tags;
    }
    note.updated_at = Utc::now();
    Ok(true)
}

/// Remove a note, returning its former index with it
pub fn delete_note(notes: &mut Vec<Note>, id: &str) -> Option<(usize, Note)> {
    let index = notes.iter().position(|n| n.id == id)?;
    Some((index, notes.remove(index)))
}

/// Case-insensitive match over title, content and tags. Empty query matches all.
pub fn search_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let needle = query.trim().to_lowercase();
    notes
        .iter()
        .filter(|n| {
            needle.is_empty()
                || n.title.to_lowercase().contains(&needle)
                || n.content.to_lowercase().contains(&needle)
                || n.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .collect()
}
