use std::fs;
use std::path::{Path, PathBuf};

use crate::io::store::{Slot, Store, StoreError};
use crate::model::config::LibraryConfig;
use crate::model::library::Library;
use crate::model::material::{MaterialDraft, Status};
use crate::ops::material_ops::{ValidationError, create_material};
use crate::ops::{note_ops, task_ops};

pub const LECTERN_DIR: &str = "lectern";
pub const CONFIG_FILE: &str = "lectern.toml";

/// Error type for library I/O operations
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("not a lectern library: no lectern/ directory found (run `lec init`)")]
    NotALibrary,
    #[error("library already exists at {0} (use --force to overwrite the config)")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse lectern.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit lectern.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid sample data: {0}")]
    Sample(#[from] ValidationError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

const CONFIG_TEMPLATE: &str = r##"[library]
name = "{name}"

# Subject areas a material can be filed under, in display order.
# Edit here or use: lec subject add <name> / lec subject rm <name>
subjects = ["Christianity", "Philosophy", "Mathematics", "Physics", "Cosmology", "Personal Development"]

# Suggested material types (any text is accepted)
material_types = ["Book", "Article", "Video", "Course", "Paper", "Podcast"]

[view]
page_size = 6
sort = "dateAdded"              # title, author, progress, dateAdded

# --- UI Customization ---
# Uncomment and edit to override defaults.
#
# [ui.colors]
# background = "#101418"
# text = "#C8D0D8"
# text_bright = "#FFFFFF"
# highlight = "#E8A33D"
# dim = "#5C6670"
# red = "#E05555"
# yellow = "#E8C547"
# green = "#6CC47A"
# cyan = "#56B6C2"
#
# [ui.subject_colors]
# Christianity = "#C792EA"
# Physics = "#56B6C2"
"##;

/// Discover the library by walking up from the given directory, looking for
/// a `lectern/` subdirectory with a config file.
pub fn discover_library(start: &Path) -> Result<PathBuf, LibraryError> {
    let mut current = start.to_path_buf();
    loop {
        let lectern_dir = current.join(LECTERN_DIR);
        if lectern_dir.is_dir() && lectern_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(LibraryError::NotALibrary);
        }
    }
}

/// Load config and every slot for the library rooted at `root`.
pub fn load_library(root: &Path) -> Result<Library, LibraryError> {
    let lectern_dir = root.join(LECTERN_DIR);
    if !lectern_dir.is_dir() {
        return Err(LibraryError::NotALibrary);
    }

    let config_path = lectern_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| LibraryError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: LibraryConfig = toml::from_str(&config_text)?;

    let store = Store::new(&lectern_dir);
    let materials = store.load_materials();
    let notes = store.load_slot(Slot::Notes);
    let tasks = store.load_slot(Slot::Tasks);
    tracing::debug!(
        root = %root.display(),
        materials = materials.len(),
        notes = notes.len(),
        tasks = tasks.len(),
        "library loaded"
    );

    Ok(Library {
        root: root.to_path_buf(),
        lectern_dir,
        config,
        store,
        materials,
        notes,
        tasks,
    })
}

/// Render lectern.toml for a new library
pub fn render_config(name: &str) -> String {
    CONFIG_TEMPLATE.replace("{name}", &name.replace('"', "\\\""))
}

/// Create `lectern/` under `root`. Existing slots are never overwritten;
/// `force` only rewrites the config. With `sample`, empty slots are seeded.
pub fn init_library(root: &Path, name: &str, force: bool, sample: bool) -> Result<PathBuf, LibraryError> {
    let lectern_dir = root.join(LECTERN_DIR);
    let config_path = lectern_dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        return Err(LibraryError::AlreadyExists(lectern_dir));
    }

    fs::create_dir_all(&lectern_dir)?;
    crate::io::recovery::atomic_write(&config_path, render_config(name).as_bytes()).map_err(
        |e| LibraryError::WriteError {
            path: config_path.clone(),
            source: e,
        },
    )?;

    let store = Store::new(&lectern_dir);
    for slot in [Slot::Books, Slot::Notes, Slot::Tasks] {
        if !store.path(slot).exists() {
            store.save_slot::<serde_json::Value>(slot, &[])?;
        }
    }

    if sample {
        let mut library = load_library(root)?;
        seed_sample_data(&mut library)?;
    }

    tracing::info!(dir = %lectern_dir.display(), "library initialized");
    Ok(lectern_dir)
}

/// Fill empty collections with a few starter records
pub fn seed_sample_data(library: &mut Library) -> Result<(), LibraryError> {
    if library.materials.is_empty() {
        let books = [
            ("Mere Christianity", "C.S. Lewis", "Christianity", Status::Reading, 45),
            ("The Republic", "Plato", "Philosophy", Status::ToRead, 0),
            ("Introduction to Electrodynamics", "David J. Griffiths", "Physics", Status::Reading, 20),
        ];
        for (title, author, subject, status, progress) in books {
            let draft = MaterialDraft {
                title: Some(title.to_string()),
                author: Some(author.to_string()),
                category: Some(subject.to_string()),
                status: Some(status),
                progress: Some(progress),
                ..Default::default()
            };
            create_material(&mut library.materials, &draft, &library.config)?;
        }
        library.save_materials()?;
    }

    if library.notes.is_empty() {
        note_ops::add_note(
            &mut library.notes,
            &library.config,
            "The Problem of Evil",
            "Philosophy",
            "# The Problem of Evil\n\nThe problem of evil is one of the most challenging philosophical questions...",
            note_ops::parse_tags("theodicy, theology, ethics"),
        )?;
        note_ops::add_note(
            &mut library.notes,
            &library.config,
            "Maxwell's Equations",
            "Physics",
            "# Maxwell's Equations\n\nThe four fundamental equations of electromagnetism.",
            note_ops::parse_tags("electromagnetism, equations"),
        )?;
        library.save_notes()?;
    }

    if library.tasks.is_empty() {
        task_ops::add_task(
            &mut library.tasks,
            &library.config,
            "Read Chapter 3 of Mere Christianity",
            None,
            Some("Christianity"),
            None,
        )?;
        task_ops::add_task(
            &mut library.tasks,
            &library.config,
            "Complete problem set on Maxwell equations",
            None,
            Some("Physics"),
            None,
        )?;
        library.save_tasks()?;
    }
    Ok(())
}
