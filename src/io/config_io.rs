use std::fs;
use std::path::Path;

use crate::io::library_io::{CONFIG_FILE, LibraryError};
use crate::model::config::LibraryConfig;

/// Read the library config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing.
pub fn read_config(lectern_dir: &Path) -> Result<(LibraryConfig, toml_edit::DocumentMut), LibraryError> {
    let config_path = lectern_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| LibraryError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: LibraryConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(lectern_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), LibraryError> {
    let config_path = lectern_dir.join(CONFIG_FILE);
    crate::io::recovery::atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| {
        LibraryError::WriteError {
            path: config_path,
            source: e,
        }
    })
}

/// Current subject list from the document, or the defaults if the key is absent
fn subjects_in(doc: &toml_edit::DocumentMut) -> Vec<String> {
    match doc.get("subjects").and_then(|v| v.as_array()) {
        Some(arr) => arr
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        None => crate::model::config::default_subjects(),
    }
}

/// Append a subject. Returns false if a subject with that name (ignoring
/// case) already exists.
pub fn add_subject(doc: &mut toml_edit::DocumentMut, name: &str) -> bool {
    let name = name.trim();
    let mut subjects = subjects_in(doc);
    if name.is_empty() || subjects.iter().any(|s| s.eq_ignore_ascii_case(name)) {
        return false;
    }
    subjects.push(name.to_string());
    set_subjects(doc, &subjects);
    true
}

/// Remove a subject (case-insensitive). Returns false if it was not configured.
pub fn remove_subject(doc: &mut toml_edit::DocumentMut, name: &str) -> bool {
    let mut subjects = subjects_in(doc);
    let before = subjects.len();
    subjects.retain(|s| !s.eq_ignore_ascii_case(name.trim()));
    if subjects.len() == before {
        return false;
    }
    set_subjects(doc, &subjects);
    true
}

fn set_subjects(doc: &mut toml_edit::DocumentMut, subjects: &[String]) {
    if let Some(arr) = doc.get_mut("subjects").and_then(|v| v.as_array_mut()) {
        arr.clear();
        for s in subjects {
            arr.push(s.as_str());
        }
        return;
    }
    let mut arr = toml_edit::Array::new();
    for s in subjects {
        arr.push(s.as_str());
    }
    doc["subjects"] = toml_edit::value(arr);
}

/// Update `[view] page_size`
pub fn set_page_size(doc: &mut toml_edit::DocumentMut, size: usize) {
    if !doc.contains_key("view") {
        doc["view"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["view"]["page_size"] = toml_edit::value(size as i64);
}
