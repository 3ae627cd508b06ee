use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reading status of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "To Read")]
    ToRead,
    #[serde(rename = "Reading")]
    Reading,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Paused")]
    Paused,
}

impl Status {
    /// All statuses in display order
    pub fn all() -> [Status; 4] {
        [
            Status::ToRead,
            Status::Reading,
            Status::Completed,
            Status::Paused,
        ]
    }

    /// Canonical label, identical to the persisted form
    pub fn label(self) -> &'static str {
        match self {
            Status::ToRead => "To Read",
            Status::Reading => "Reading",
            Status::Completed => "Completed",
            Status::Paused => "Paused",
        }
    }

    /// Short marker shown next to the label
    pub fn icon(self) -> &'static str {
        match self {
            Status::ToRead => "[ ]",
            Status::Reading => "[>]",
            Status::Completed => "[x]",
            Status::Paused => "[~]",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked reading or study item (book, article, course, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Opaque identifier, assigned at creation
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default = "default_material_type")]
    pub material_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_link: Option<String>,
    /// Subject area label
    #[serde(alias = "subject")]
    pub category: String,
    pub status: Status,
    /// Percent complete, always within 0..=100
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date_added: DateTime<Utc>,
    /// Last time status or progress changed
    #[serde(default, alias = "dateModified", skip_serializing_if = "Option::is_none")]
    pub last_read: Option<DateTime<Utc>>,
}

pub fn default_material_type() -> String {
    "Book".to_string()
}

/// On-disk shape accepted by the normalizer.
///
/// Older data stored numeric ids, free-form status labels, progress as a
/// string and locale-formatted dates, and some records carry nulls or numbers
/// where text belongs. Every field is kept as raw JSON until
/// `ops::normalize` coerces it, so any JSON object deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub title: serde_json::Value,
    #[serde(default)]
    pub author: serde_json::Value,
    #[serde(default)]
    pub material_type: serde_json::Value,
    #[serde(default)]
    pub material_link: serde_json::Value,
    #[serde(default, alias = "subject")]
    pub category: serde_json::Value,
    #[serde(default)]
    pub status: serde_json::Value,
    #[serde(default)]
    pub progress: serde_json::Value,
    #[serde(default)]
    pub notes: serde_json::Value,
    #[serde(default)]
    pub date_added: serde_json::Value,
    #[serde(default, alias = "dateModified")]
    pub last_read: serde_json::Value,
}

/// Form payload for creating or editing a material.
///
/// Every field is optional so the same type serves both paths: on create the
/// required fields must be present, on edit absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialDraft {
    pub title: Option<String>,
    pub author: Option<String>,
    pub material_type: Option<String>,
    pub material_link: Option<String>,
    pub category: Option<String>,
    pub status: Option<Status>,
    pub progress: Option<i64>,
    pub notes: Option<String>,
}
