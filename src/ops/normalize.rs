use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::material::{Material, RawMaterial, Status, default_material_type};

/// Subject assigned to legacy records that never had one
pub const DEFAULT_CATEGORY: &str = "Personal Development";

/// Result of normalizing a loaded list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub materials: Vec<Material>,
    /// Number of records that were rewritten
    pub fixed: usize,
}

/// Map a status label or one of its synonyms onto the canonical enumeration.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn canonical_status(label: &str) -> Option<Status> {
    match label.trim().to_lowercase().as_str() {
        "to read" | "to-read" | "toread" | "read later" | "read-later" => Some(Status::ToRead),
        "reading" | "currently reading" | "currently-reading" => Some(Status::Reading),
        "completed" | "finished" | "done" => Some(Status::Completed),
        "paused" | "on hold" | "on-hold" | "stopped" => Some(Status::Paused),
        _ => None,
    }
}

/// Coerce a persisted status value; anything unrecognised becomes ToRead.
pub fn normalize_status(raw: Option<&str>) -> Status {
    raw.and_then(canonical_status).unwrap_or(Status::ToRead)
}

/// Normalize a freshly loaded list into canonical records.
///
/// Applying this to its own (serialized) output changes nothing.
pub fn normalize(raw: Vec<RawMaterial>) -> Normalized {
    let mut seen_ids = HashSet::new();
    let mut fixed = 0;
    let materials = raw
        .into_iter()
        .map(|r| {
            let (material, changed) = normalize_one(r, &mut seen_ids);
            if changed {
                fixed += 1;
            }
            material
        })
        .collect();
    Normalized { materials, fixed }
}

fn normalize_one(raw: RawMaterial, seen_ids: &mut HashSet<String>) -> (Material, bool) {
    let mut changed = false;

    // A non-text status reads as missing
    let status = normalize_status(raw.status.as_str());
    if raw.status.as_str() != Some(status.label()) {
        changed = true;
    }

    let title = required_text(raw.title, &mut changed);
    let author = required_text(raw.author, &mut changed);

    let id = match &raw.id {
        serde_json::Value::String(s) if !s.trim().is_empty() => s.clone(),
        serde_json::Value::Number(n) => {
            changed = true;
            n.to_string()
        }
        _ => {
            changed = true;
            new_id()
        }
    };
    let id = if seen_ids.contains(&id) {
        changed = true;
        new_id()
    } else {
        id
    };
    seen_ids.insert(id.clone());

    let (progress, progress_ok) = coerce_progress(&raw.progress);
    changed |= !progress_ok;

    let material_type = match text(raw.material_type, &mut changed) {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            changed = true;
            default_material_type()
        }
    };

    let category = match text(raw.category, &mut changed) {
        Some(c) if !c.trim().is_empty() => c,
        _ => {
            changed = true;
            DEFAULT_CATEGORY.to_string()
        }
    };

    let date_added = match text(raw.date_added, &mut changed).as_deref().map(parse_timestamp) {
        Some((Some(ts), exact)) => {
            changed |= !exact;
            ts
        }
        _ => {
            changed = true;
            DateTime::<Utc>::default()
        }
    };

    let last_read = match text(raw.last_read, &mut changed).as_deref().map(parse_timestamp) {
        Some((Some(ts), exact)) => {
            changed |= !exact;
            Some(ts)
        }
        Some((None, _)) => {
            changed = true;
            None
        }
        None => None,
    };

    let material_link = text(raw.material_link, &mut changed);
    let material_link = non_blank(material_link, &mut changed);
    let notes = text(raw.notes, &mut changed);
    let notes = non_blank(notes, &mut changed);

    let material = Material {
        id,
        title,
        author,
        material_type,
        material_link,
        category,
        status,
        progress,
        notes,
        date_added,
        last_read,
    };
    (material, changed)
}

/// Fresh opaque identifier for a new record
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Read a progress value that may be a number, a numeric string or missing.
/// Returns the clamped value and whether the input was already canonical.
fn coerce_progress(value: &serde_json::Value) -> (u8, bool) {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    };
    match parsed {
        Some(p) => {
            let clamped = p.clamp(0, 100);
            let canonical = value.is_u64() && p == clamped;
            (clamped as u8, canonical)
        }
        None => (0, false),
    }
}

/// Parse a stored timestamp. The flag is false when the input was not RFC 3339.
fn parse_timestamp(s: &str) -> (Option<DateTime<Utc>>, bool) {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return (Some(dt.with_timezone(&Utc)), true);
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            let ts = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
            return (ts, false);
        }
    }
    (None, false)
}

/// Read an optional text field. Numbers and booleans are stringified; any
/// other non-text value is discarded. Both count as a fix.
fn text(value: serde_json::Value, changed: &mut bool) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        serde_json::Value::Number(n) => {
            *changed = true;
            Some(n.to_string())
        }
        serde_json::Value::Bool(b) => {
            *changed = true;
            Some(b.to_string())
        }
        _ => {
            *changed = true;
            None
        }
    }
}

/// Like `text`, for fields every record has. Missing becomes empty.
fn required_text(value: serde_json::Value, changed: &mut bool) -> String {
    if value.is_null() {
        *changed = true;
    }
    text(value, changed).unwrap_or_default()
}

fn non_blank(value: Option<String>, changed: &mut bool) -> Option<String> {
    match value {
        Some(v) if v.trim().is_empty() => {
            *changed = true;
            None
        }
        other => other,
    }
}
