use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from lectern.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub library: LibraryInfo,
    #[serde(default)]
    pub view: ViewConfig,
    /// Subject areas a material may be filed under, in display order
    #[serde(default = "default_subjects")]
    pub subjects: Vec<String>,
    /// Suggested material types (free text is still accepted)
    #[serde(default = "default_material_types")]
    pub material_types: Vec<String>,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Default: 6
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Default sort key (title, author, progress, dateAdded)
    #[serde(default = "default_sort")]
    pub sort: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            page_size: default_page_size(),
            sort: default_sort(),
        }
    }
}

fn default_page_size() -> usize {
    6
}

fn default_sort() -> String {
    "dateAdded".to_string()
}

pub fn default_subjects() -> Vec<String> {
    [
        "Christianity",
        "Philosophy",
        "Mathematics",
        "Physics",
        "Cosmology",
        "Personal Development",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_material_types() -> Vec<String> {
    ["Book", "Article", "Video", "Course", "Paper", "Podcast"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-subject accent colors as hex strings
    #[serde(default)]
    pub subject_colors: HashMap<String, String>,
}

impl LibraryConfig {
    pub fn new(name: &str) -> Self {
        LibraryConfig {
            library: LibraryInfo {
                name: name.to_string(),
            },
            view: ViewConfig::default(),
            subjects: default_subjects(),
            material_types: default_material_types(),
            ui: UiConfig::default(),
        }
    }

    /// Case-insensitive lookup of a configured subject, returning its canonical spelling
    pub fn find_subject(&self, name: &str) -> Option<&str> {
        let needle = name.trim();
        self.subjects
            .iter()
            .find(|s| s.eq_ignore_ascii_case(needle))
            .map(|s| s.as_str())
    }
}
