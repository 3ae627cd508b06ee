use indexmap::IndexMap;

use crate::model::config::LibraryConfig;
use crate::model::material::{Material, Status};

/// Counts by status across the whole library
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub total: usize,
    pub to_read: usize,
    pub reading: usize,
    pub completed: usize,
    pub paused: usize,
}

impl LibraryStats {
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::ToRead => self.to_read,
            Status::Reading => self.reading,
            Status::Completed => self.completed,
            Status::Paused => self.paused,
        }
    }
}

pub fn library_stats(materials: &[Material]) -> LibraryStats {
    let mut stats = LibraryStats {
        total: materials.len(),
        ..Default::default()
    };
    for m in materials {
        match m.status {
            Status::ToRead => stats.to_read += 1,
            Status::Reading => stats.reading += 1,
            Status::Completed => stats.completed += 1,
            Status::Paused => stats.paused += 1,
        }
    }
    stats
}

/// Materials per subject: configured subjects first (including empty ones),
/// then any other subject found in the data, in order of appearance.
pub fn subject_counts(materials: &[Material], config: &LibraryConfig) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> =
        config.subjects.iter().map(|s| (s.clone(), 0)).collect();
    for m in materials {
        let key = config
            .find_subject(&m.category)
            .map(str::to_string)
            .unwrap_or_else(|| m.category.clone());
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// In-progress materials, most recently read first
pub fn currently_reading(materials: &[Material], limit: usize) -> Vec<&Material> {
    let mut reading: Vec<&Material> = materials
        .iter()
        .filter(|m| m.status == Status::Reading)
        .collect();
    reading.sort_by(|a, b| b.last_read.cmp(&a.last_read));
    reading.truncate(limit);
    reading
}
