use std::path::PathBuf;

use super::{LibraryConfig, Material, Note, StudyTask};
use crate::io::store::{Slot, Store, StoreError};

/// A loaded library: configuration, the store it came from, and every collection
#[derive(Debug)]
pub struct Library {
    /// Directory containing the `lectern/` folder
    pub root: PathBuf,
    /// The `lectern/` folder itself
    pub lectern_dir: PathBuf,
    pub config: LibraryConfig,
    pub store: Store,
    pub materials: Vec<Material>,
    pub notes: Vec<Note>,
    pub tasks: Vec<StudyTask>,
}

impl Library {
    pub fn save_materials(&self) -> Result<(), StoreError> {
        self.store.save_materials(&self.materials)
    }

    pub fn save_notes(&self) -> Result<(), StoreError> {
        self.store.save_slot(Slot::Notes, &self.notes)
    }

    pub fn save_tasks(&self) -> Result<(), StoreError> {
        self.store.save_slot(Slot::Tasks, &self.tasks)
    }
}
