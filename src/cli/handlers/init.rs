use std::path::PathBuf;

use crate::cli::commands::InitArgs;
use crate::io::library_io;

/// Infer a library name from a directory name: hyphens and underscores
/// become spaces, words are title-cased.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn cmd_init(args: InitArgs, library_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match library_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };

    // Note an enclosing library so the user is not surprised by two of them
    if let Some(parent) = root.parent()
        && let Ok(parent_root) = library_io::discover_library(parent)
        && !root.join(library_io::LECTERN_DIR).is_dir()
    {
        eprintln!(
            "Note: parent library found at {}/",
            parent_root.join(library_io::LECTERN_DIR).display()
        );
        eprintln!("Creating new library in ./{}/", library_io::LECTERN_DIR);
    }

    let name = args.name.unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "My Library".to_string())
    });

    let lectern_dir: PathBuf = library_io::init_library(&root, &name, args.force, args.sample)?;

    println!("Initialized library: {}", name);
    println!("  {}", lectern_dir.display());
    if args.sample {
        println!("  seeded sample books, notes and tasks");
    }
    Ok(())
}
