mod init;
pub use init::cmd_init;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Global override for the library directory (set by -C flag)
static LIBRARY_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::library_io::{self, LibraryError};
use crate::io::recovery;
use crate::io::store::StoreError;
use crate::model::library::Library;
use crate::model::material::MaterialDraft;
use crate::ops::material_ops::{self, QuickAction, resolve_prefix, short_id};
use crate::ops::reconcile::{ProgressChange, apply_progress, on_status_change};
use crate::ops::view::{self, SortKey, StatusFilter, ViewQuery};
use crate::ops::{note_ops, stats, task_ops};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;

    // Store -C override for load_library_cwd()
    if let Some(ref dir) = cli.library_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        LIBRARY_DIR_OVERRIDE
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(abs);
    }

    match cli.command {
        None => {
            eprintln!("no subcommand given (try `lec --help`)");
            Ok(())
        }
        Some(cmd) => match cmd {
            // Init is handled in main.rs before library discovery
            Commands::Init(args) => cmd_init(args, cli.library_dir.as_deref()),

            // Read commands
            Commands::List(args) => cmd_list(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Stats => cmd_stats(json),
            Commands::Dashboard => cmd_dashboard(json),
            Commands::Subjects => cmd_subjects(json),

            // Write commands
            Commands::Add(args) => cmd_add(args, json),
            Commands::Edit(args) => cmd_edit(args),
            Commands::Status(args) => cmd_status(args),
            Commands::Progress(args) => cmd_progress(args),
            Commands::Quick(args) => cmd_quick(args, json),
            Commands::Delete(args) => cmd_delete(args),

            // Configuration
            Commands::Subject(args) => cmd_subject(args),
            Commands::PageSize(args) => cmd_page_size(args),

            // Notes and tasks
            Commands::Note(args) => cmd_note(args, json),
            Commands::Task(args) => cmd_task(args, json),

            // Maintenance
            Commands::Recovery(args) => cmd_recovery(args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start_dir() -> Result<PathBuf, LibraryError> {
    match LIBRARY_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .as_ref()
    {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(LibraryError::IoError),
    }
}

fn load_library_cwd() -> Result<Library, LibraryError> {
    let root = library_io::discover_library(&start_dir()?)?;
    library_io::load_library(&root)
}

/// Make a failed save say where the data went
fn save_failed(e: StoreError) -> Box<dyn std::error::Error> {
    format!("{} (the unsaved data was written to lectern/.recovery.log)", e).into()
}

/// Resolve a material id or prefix. Prints a note and returns `None` if
/// nothing matches; a stale id is a no-op, not an error.
fn resolve_material(library: &Library, input: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let id = material_ops::resolve_id(&library.materials, input)?;
    if id.is_none() {
        eprintln!("no material matches '{}', nothing to do", input);
    }
    Ok(id)
}

fn resolve_note(library: &Library, input: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let id = resolve_prefix(library.notes.iter().map(|n| n.id.as_str()), input)?;
    if id.is_none() {
        eprintln!("no note matches '{}', nothing to do", input);
    }
    Ok(id)
}

fn resolve_task(library: &Library, input: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let id = resolve_prefix(library.tasks.iter().map(|t| t.id.as_str()), input)?;
    if id.is_none() {
        eprintln!("no task matches '{}', nothing to do", input);
    }
    Ok(id)
}

/// Ask a yes/no question on stderr; anything but `y` declines.
fn confirm(prompt: &str) -> std::io::Result<bool> {
    eprint!("{} [y/n] ", prompt);
    std::io::stderr().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> CmdResult {
    let library = load_library_cwd()?;

    let status = match &args.status {
        Some(s) => StatusFilter::parse(s).ok_or_else(|| {
            format!(
                "unknown status '{}' (expected: all, to-read, reading, completed, paused)",
                s
            )
        })?,
        None => StatusFilter::All,
    };
    let sort = SortKey::parse(args.sort.as_deref().unwrap_or(&library.config.view.sort));
    let mut query = ViewQuery {
        status,
        subject: args.subject.clone(),
        search: args.search.clone().unwrap_or_default(),
        sort,
        page: args.page,
        page_size: args.page_size.unwrap_or(library.config.view.page_size),
    };
    if args.all {
        query.page = 1;
        query.page_size = library.materials.len().max(1);
    }

    let page = view::compute(&library.materials, &query);
    if json {
        return print_json(&MaterialListJson {
            page: page.page,
            total_pages: page.total_pages,
            total_matching: page.total_matching,
            items: page.items.clone(),
        });
    }
    for line in format_material_page(&page, query.page_size, query.is_narrowed()) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_show(args: IdArg, json: bool) -> CmdResult {
    let library = load_library_cwd()?;
    let Some(id) = resolve_material(&library, &args.id)? else {
        return Ok(());
    };
    if let Some(m) = material_ops::find_material(&library.materials, &id) {
        if json {
            return print_json(m);
        }
        for line in format_material_detail(m) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_stats(json: bool) -> CmdResult {
    let library = load_library_cwd()?;
    let s = stats::library_stats(&library.materials);
    if json {
        return print_json(&stats_to_json(&s));
    }
    for line in format_stats(&s) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_dashboard(json: bool) -> CmdResult {
    let library = load_library_cwd()?;
    let s = stats::library_stats(&library.materials);
    let reading = stats::currently_reading(&library.materials, 3);
    let pending = task_ops::pending(&library.tasks, Some(5));

    if json {
        return print_json(&DashboardJson {
            stats: stats_to_json(&s),
            currently_reading: reading,
            pending_tasks: pending,
        });
    }

    println!("== {} ==", library.config.library.name);
    println!();
    for line in format_stats(&s) {
        println!("{}", line);
    }
    println!();
    println!("Currently reading:");
    if reading.is_empty() {
        println!("  nothing in progress");
    }
    for m in reading {
        println!("  {} {:>3}%  {}", format_progress_bar(m.progress, 10), m.progress, m.title);
    }
    println!();
    println!("Pending tasks:");
    if pending.is_empty() {
        println!("  all caught up");
    }
    for t in pending {
        println!("  {}", format_task_line(t));
    }
    Ok(())
}

fn cmd_subjects(json: bool) -> CmdResult {
    let library = load_library_cwd()?;
    let counts = stats::subject_counts(&library.materials, &library.config);
    if json {
        return print_json(&subject_counts_to_json(&counts, &library.config.subjects));
    }
    for (subject, count) in &counts {
        let marker = if library.config.find_subject(subject).is_some() {
            ""
        } else {
            "  (not configured)"
        };
        println!("{:>4}  {}{}", count, subject, marker);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> CmdResult {
    let mut library = load_library_cwd()?;
    let status = args.status.as_deref().map(parse_status).transpose()?;
    let draft = MaterialDraft {
        title: Some(args.title),
        author: Some(args.author),
        material_type: args.material_type,
        material_link: args.link,
        category: Some(args.subject),
        status,
        progress: args.progress,
        notes: args.notes,
    };
    let id = material_ops::create_material(&mut library.materials, &draft, &library.config)?;
    library.save_materials().map_err(save_failed)?;

    if json {
        return print_json(&ActionResultJson {
            id: id.clone(),
            message: "added".to_string(),
        });
    }
    println!("{}", id);
    Ok(())
}

fn cmd_edit(args: EditArgs) -> CmdResult {
    let mut library = load_library_cwd()?;
    let Some(id) = resolve_material(&library, &args.id)? else {
        return Ok(());
    };
    let status = args.status.as_deref().map(parse_status).transpose()?;
    let draft = MaterialDraft {
        title: args.title,
        author: args.author,
        material_type: args.material_type,
        material_link: args.link,
        category: args.subject,
        status,
        progress: args.progress,
        notes: args.notes,
    };
    if draft == MaterialDraft::default() {
        return Err("nothing to change (pass at least one field flag)".into());
    }
    if material_ops::edit_material(&mut library.materials, &id, &draft, &library.config)? {
        library.save_materials().map_err(save_failed)?;
        println!("{} updated", short_id(&id));
    }
    Ok(())
}

fn cmd_status(args: StatusArgs) -> CmdResult {
    let mut library = load_library_cwd()?;
    let new_status = parse_status(&args.status)?;
    let Some(id) = resolve_material(&library, &args.id)? else {
        return Ok(());
    };
    if let Some(m) = material_ops::find_material_mut(&mut library.materials, &id) {
        on_status_change(m, new_status);
        let line = format!("{} -> {} ({}%)", short_id(&id), m.status, m.progress);
        library.save_materials().map_err(save_failed)?;
        println!("{}", line);
    }
    Ok(())
}

fn cmd_progress(args: ProgressArgs) -> CmdResult {
    let mut library = load_library_cwd()?;
    let change = ProgressChange::parse(&args.value).ok_or_else(|| {
        format!(
            "invalid progress '{}' (expected a number like 40, or a step like +10 / -5)",
            args.value
        )
    })?;
    let Some(id) = resolve_material(&library, &args.id)? else {
        return Ok(());
    };
    if let Some(m) = material_ops::find_material_mut(&mut library.materials, &id) {
        apply_progress(m, change);
        let line = format!("{} -> {}% ({})", short_id(&id), m.progress, m.status);
        library.save_materials().map_err(save_failed)?;
        println!("{}", line);
    }
    Ok(())
}

fn cmd_quick(args: IdArg, json: bool) -> CmdResult {
    let mut library = load_library_cwd()?;
    let Some(id) = resolve_material(&library, &args.id)? else {
        return Ok(());
    };
    let action = material_ops::find_material(&library.materials, &id)
        .map(|m| QuickAction::for_status(m.status));
    let Some(message) = material_ops::apply_quick_action(&mut library.materials, &id) else {
        return Ok(());
    };
    if action.is_some_and(QuickAction::mutates) {
        library.save_materials().map_err(save_failed)?;
    }
    if json {
        return print_json(&ActionResultJson { id, message });
    }
    println!("{}", message);
    Ok(())
}

fn cmd_delete(args: DeleteArgs) -> CmdResult {
    let mut library = load_library_cwd()?;
    let Some(id) = resolve_material(&library, &args.id)? else {
        return Ok(());
    };
    let title = material_ops::find_material(&library.materials, &id)
        .map(|m| m.title.clone())
        .unwrap_or_default();

    if !args.yes && !confirm(&format!("Delete \"{}\"?", title))? {
        println!("cancelled");
        return Ok(());
    }

    if let Some((index, removed)) = material_ops::delete_material(&mut library.materials, &id) {
        let body = serde_json::to_string_pretty(&removed)?;
        if let Err(e) = library.save_materials() {
            library.materials.insert(index, removed);
            return Err(save_failed(e));
        }
        recovery::log_deletion(&library.lectern_dir, "material", &removed.id, &removed.title, &body);
        println!("deleted \"{}\"", removed.title);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn cmd_subject(args: SubjectCmd) -> CmdResult {
    let root = library_io::discover_library(&start_dir()?)?;
    let lectern_dir = root.join(library_io::LECTERN_DIR);
    let (_config, mut doc) = config_io::read_config(&lectern_dir)?;

    match args.action {
        SubjectAction::Add(arg) => {
            if !config_io::add_subject(&mut doc, &arg.name) {
                return Err(format!("subject '{}' already exists", arg.name.trim()).into());
            }
            config_io::write_config(&lectern_dir, &doc)?;
            println!("added subject '{}'", arg.name.trim());
        }
        SubjectAction::Rm(arg) => {
            if !config_io::remove_subject(&mut doc, &arg.name) {
                return Err(format!("no subject named '{}'", arg.name.trim()).into());
            }
            config_io::write_config(&lectern_dir, &doc)?;
            println!("removed subject '{}'", arg.name.trim());
        }
    }
    Ok(())
}

fn cmd_page_size(args: PageSizeArgs) -> CmdResult {
    let root = library_io::discover_library(&start_dir()?)?;
    let lectern_dir = root.join(library_io::LECTERN_DIR);
    let (config, mut doc) = config_io::read_config(&lectern_dir)?;

    match args.size {
        None => println!("{}", config.view.page_size),
        Some(0) => return Err("page size must be at least 1".into()),
        Some(size) => {
            config_io::set_page_size(&mut doc, size);
            config_io::write_config(&lectern_dir, &doc)?;
            println!("page size set to {}", size);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

fn cmd_note(args: NoteCmd, json: bool) -> CmdResult {
    let mut library = load_library_cwd()?;

    match args.action {
        NoteAction::Add(a) => {
            let tags = a.tags.as_deref().map(note_ops::parse_tags).unwrap_or_default();
            let id = note_ops::add_note(
                &mut library.notes,
                &library.config,
                &a.title,
                &a.subject,
                &a.content,
                tags,
            )?;
            library.save_notes().map_err(save_failed)?;
            println!("{}", id);
        }
        NoteAction::List(a) => {
            let notes: Vec<_> = library
                .notes
                .iter()
                .filter(|n| {
                    a.subject
                        .as_deref()
                        .is_none_or(|s| n.subject.eq_ignore_ascii_case(s.trim()))
                })
                .collect();
            if json {
                return print_json(&notes);
            }
            if notes.is_empty() {
                println!("No notes yet. Add one with `lec note add`.");
            }
            for n in notes {
                println!("{}", format_note_line(n));
            }
        }
        NoteAction::Show(a) => {
            let Some(id) = resolve_note(&library, &a.id)? else {
                return Ok(());
            };
            if let Some(n) = library.notes.iter().find(|n| n.id == id) {
                if json {
                    return print_json(n);
                }
                for line in format_note_detail(n) {
                    println!("{}", line);
                }
            }
        }
        NoteAction::Edit(a) => {
            let Some(id) = resolve_note(&library, &a.id)? else {
                return Ok(());
            };
            let edit = note_ops::NoteEdit {
                title: a.title,
                content: a.content,
                tags: a.tags.as_deref().map(note_ops::parse_tags),
            };
            if note_ops::update_note(&mut library.notes, &id, edit)? {
                library.save_notes().map_err(save_failed)?;
                println!("{} updated", short_id(&id));
            }
        }
        NoteAction::Rm(a) => {
            let Some(id) = resolve_note(&library, &a.id)? else {
                return Ok(());
            };
            if let Some((index, removed)) = note_ops::delete_note(&mut library.notes, &id) {
                let body = serde_json::to_string_pretty(&removed)?;
                if let Err(e) = library.save_notes() {
                    library.notes.insert(index, removed);
                    return Err(save_failed(e));
                }
                recovery::log_deletion(&library.lectern_dir, "note", &removed.id, &removed.title, &body);
                println!("deleted note \"{}\"", removed.title);
            }
        }
        NoteAction::Search(a) => {
            let hits = note_ops::search_notes(&library.notes, &a.query);
            if json {
                return print_json(&hits);
            }
            if hits.is_empty() {
                println!("No notes match '{}'.", a.query);
            }
            for n in hits {
                println!("{}", format_note_line(n));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

fn cmd_task(args: TaskCmd, json: bool) -> CmdResult {
    let mut library = load_library_cwd()?;

    match args.action {
        TaskAction::Add(a) => {
            let due = match a.due.as_deref() {
                Some(d) => Some(
                    task_ops::parse_due_date(d)
                        .ok_or_else(|| format!("invalid due date '{}' (expected YYYY-MM-DD)", d))?,
                ),
                None => None,
            };
            let id = task_ops::add_task(
                &mut library.tasks,
                &library.config,
                &a.title,
                a.description.as_deref(),
                a.subject.as_deref(),
                due,
            )?;
            library.save_tasks().map_err(save_failed)?;
            println!("{}", id);
        }
        TaskAction::List(a) => {
            let tasks: Vec<_> = if a.all {
                library.tasks.iter().collect()
            } else {
                task_ops::pending(&library.tasks, None)
            };
            if json {
                return print_json(&tasks);
            }
            if tasks.is_empty() {
                println!("No pending tasks.");
            }
            for t in tasks {
                println!("{}", format_task_line(t));
            }
        }
        TaskAction::Done(a) => set_task_completed(&mut library, &a.id, true)?,
        TaskAction::Undo(a) => set_task_completed(&mut library, &a.id, false)?,
        TaskAction::Rm(a) => {
            let Some(id) = resolve_task(&library, &a.id)? else {
                return Ok(());
            };
            if let Some((index, removed)) = task_ops::delete_task(&mut library.tasks, &id) {
                let body = serde_json::to_string_pretty(&removed)?;
                if let Err(e) = library.save_tasks() {
                    library.tasks.insert(index, removed);
                    return Err(save_failed(e));
                }
                recovery::log_deletion(&library.lectern_dir, "task", &removed.id, &removed.title, &body);
                println!("deleted task \"{}\"", removed.title);
            }
        }
    }
    Ok(())
}

fn set_task_completed(library: &mut Library, input: &str, completed: bool) -> CmdResult {
    let Some(id) = resolve_task(library, input)? else {
        return Ok(());
    };
    if task_ops::set_completed(&mut library.tasks, &id, completed) {
        library.save_tasks().map_err(save_failed)?;
        let mark = if completed { "done" } else { "not done" };
        println!("{} -> {}", short_id(&id), mark);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(args: RecoveryCmd, json: bool) -> CmdResult {
    let root = library_io::discover_library(&start_dir()?)?;
    let lectern_dir = root.join(library_io::LECTERN_DIR);

    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(&lectern_dir).display());
        }
        Some(RecoveryAction::Prune(p)) => {
            let before = match p.before.as_deref() {
                Some(s) => Some(parse_timestamp_arg(s)?),
                None => None,
            };
            let removed = recovery::prune_recovery(&lectern_dir, before, p.all)?;
            println!("pruned {} entries", removed);
        }
        None => {
            let entries = recovery::read_recovery_entries(&lectern_dir, Some(args.limit.unwrap_or(10)));
            if json {
                let values: Vec<_> = entries.iter().map(|e| e.to_json()).collect();
                return print_json(&values);
            }
            if entries.is_empty() {
                println!("recovery log is empty");
            }
            for e in entries {
                print!("{}", e.to_markdown());
            }
        }
    }
    Ok(())
}

/// Accept RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC)
fn parse_timestamp_arg(s: &str) -> Result<chrono::DateTime<chrono::Utc>, String> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&chrono::Utc));
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{}' (expected RFC 3339 or YYYY-MM-DD)", s))
}
