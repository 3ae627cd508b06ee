use std::path::PathBuf;

use chrono::{DateTime, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::Store;
use crate::model::{Library, LibraryConfig, Material, Status};
use crate::ops::normalize::new_id;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A to-read book with a fresh id
pub fn sample_material(title: &str) -> Material {
    Material {
        id: new_id(),
        title: title.to_string(),
        author: "Anon".into(),
        material_type: "Book".into(),
        material_link: None,
        category: "Christianity".into(),
        status: Status::ToRead,
        progress: 0,
        notes: None,
        date_added: DateTime::<Utc>::default(),
        last_read: None,
    }
}

/// An in-memory library. Its store points at a directory that does not
/// exist; tests that save swap in a temp dir.
pub fn library_with(materials: Vec<Material>) -> Library {
    let root = PathBuf::from("/tmp/lectern-test-missing");
    let lectern_dir = root.join("lectern");
    Library {
        store: Store::new(&lectern_dir),
        root,
        lectern_dir,
        config: LibraryConfig::new("Test Shelf"),
        materials,
        notes: Vec::new(),
        tasks: Vec::new(),
    }
}

pub fn app_with_materials(materials: Vec<Material>) -> App {
    App::new(library_with(materials))
}
