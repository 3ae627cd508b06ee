use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::recovery::{RecoveryCategory, RecoveryEntry, atomic_write, log_recovery};
use crate::model::material::{Material, RawMaterial};
use crate::ops::normalize::normalize;

/// Error type for slot persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not serialize {slot}: {source}")]
    Serialize {
        slot: Slot,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
}

/// One persisted collection. Each slot is a JSON array in its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Books,
    Notes,
    Tasks,
}

impl Slot {
    pub fn file_name(self) -> &'static str {
        match self {
            Slot::Books => "books.json",
            Slot::Notes => "notes.json",
            Slot::Tasks => "tasks.json",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Whole-list persistence for the library's collections.
///
/// Every save rewrites the full slot; there are no partial updates. Loads
/// never fail: a missing slot is empty and a malformed one is moved into the
/// recovery log and treated as empty.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Store { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    // -----------------------------------------------------------------------
    // Materials
    // -----------------------------------------------------------------------

    /// Load and normalize the books slot. If normalization changed anything,
    /// the healed list is written back straight away.
    pub fn load_materials(&self) -> Vec<Material> {
        let Some(items) = self.read_items(Slot::Books) else {
            return Vec::new();
        };

        let mut raw = Vec::with_capacity(items.len());
        let mut dropped = Vec::new();
        for item in items {
            match serde_json::from_value::<RawMaterial>(item.clone()) {
                Ok(r) => raw.push(r),
                Err(_) => dropped.push(item.to_string()),
            }
        }
        if !dropped.is_empty() {
            tracing::warn!(count = dropped.len(), "dropped unreadable book records");
            self.log_load_failure(Slot::Books, "unreadable records dropped", dropped.join("\n"));
        }

        let normalized = normalize(raw);
        let fixed = normalized.fixed + dropped.len();
        if fixed > 0 {
            tracing::info!(fixed, "normalized book records, saving healed list");
            if let Err(e) = self.save_materials(&normalized.materials) {
                tracing::warn!(error = %e, "could not save normalized books");
            }
        }
        normalized.materials
    }

    pub fn save_materials(&self, materials: &[Material]) -> Result<(), StoreError> {
        self.save_slot(Slot::Books, materials)
    }

    // -----------------------------------------------------------------------
    // Generic slots
    // -----------------------------------------------------------------------

    /// Load a slot without normalization. Records that fail to deserialize
    /// are dropped into the recovery log.
    pub fn load_slot<T: DeserializeOwned>(&self, slot: Slot) -> Vec<T> {
        let Some(items) = self.read_items(slot) else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(items.len());
        let mut dropped = Vec::new();
        for item in items {
            match serde_json::from_value::<T>(item.clone()) {
                Ok(v) => out.push(v),
                Err(_) => dropped.push(item.to_string()),
            }
        }
        if !dropped.is_empty() {
            tracing::warn!(%slot, count = dropped.len(), "dropped unreadable records");
            self.log_load_failure(slot, "unreadable records dropped", dropped.join("\n"));
        }
        out
    }

    /// Persist a whole slot. On failure the payload goes to the recovery log
    /// and the error is returned; the caller keeps its in-memory list.
    pub fn save_slot<T: Serialize>(&self, slot: Slot, items: &[T]) -> Result<(), StoreError> {
        let mut content = serde_json::to_string_pretty(items)
            .map_err(|source| StoreError::Serialize { slot, source })?;
        content.push('\n');

        let path = self.path(slot);
        if let Err(e) = atomic_write(&path, content.as_bytes()) {
            tracing::warn!(%slot, error = %e, "slot write failed");
            log_recovery(
                &self.dir,
                RecoveryEntry {
                    timestamp: chrono::Utc::now(),
                    category: RecoveryCategory::Write,
                    description: format!("{} write failed", slot),
                    fields: vec![
                        ("Target".to_string(), slot.file_name().to_string()),
                        ("Error".to_string(), e.to_string()),
                    ],
                    body: content,
                },
            );
            return Err(StoreError::WriteError { path, source: e });
        }
        tracing::debug!(%slot, count = items.len(), "slot saved");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Read a slot as a list of JSON values. `None` means "treat as empty".
    fn read_items(&self, slot: Slot) -> Option<Vec<serde_json::Value>> {
        let path = self.path(slot);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(%slot, error = %e, "could not read slot");
                return None;
            }
        };
        if text.trim().is_empty() {
            return None;
        }

        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(serde_json::Value::Array(items)) => Some(items),
            Ok(_) => {
                tracing::warn!(%slot, "slot is not a JSON array, starting empty");
                self.log_load_failure(slot, "slot is not a list", text);
                None
            }
            Err(e) => {
                tracing::warn!(%slot, error = %e, "malformed slot, starting empty");
                self.log_load_failure(slot, "malformed slot", text);
                None
            }
        }
    }

    fn log_load_failure(&self, slot: Slot, description: &str, body: String) {
        log_recovery(
            &self.dir,
            RecoveryEntry {
                timestamp: chrono::Utc::now(),
                category: RecoveryCategory::Load,
                description: description.to_string(),
                fields: vec![("Source".to_string(), slot.file_name().to_string())],
                body,
            },
        );
    }
}
