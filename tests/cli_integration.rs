//! Integration tests for the `lec` CLI.
//!
//! Each test creates a temp library directory, runs `lec` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `lec` binary.
fn lec_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("lec");
    path
}

/// Run `lec` with the given args in the given directory, returning (stdout, stderr, success).
fn run_lec(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(lec_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("LECTERN_LOG")
        .output()
        .expect("failed to run lec");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `lec` expecting success, return stdout.
fn run_lec_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_lec(dir, args);
    if !success {
        panic!(
            "lec {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Initialize an empty library in `dir`.
fn init_library(dir: &Path) {
    run_lec_ok(dir, &["init", "--name", "Test Shelf"]);
}

/// Add a material and return its id.
fn add(dir: &Path, title: &str, extra: &[&str]) -> String {
    let mut args = vec!["add", title, "--author", "Anon", "--subject", "Philosophy"];
    args.extend_from_slice(extra);
    run_lec_ok(dir, &args).trim().to_string()
}

fn read_books(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("lectern/books.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_slots_and_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_lec_ok(tmp.path(), &["init", "--name", "Test Shelf"]);
    assert!(out.contains("Initialized library: Test Shelf"));

    let lectern = tmp.path().join("lectern");
    assert!(lectern.join("lectern.toml").exists());
    for slot in ["books.json", "notes.json", "tasks.json"] {
        assert_eq!(fs::read_to_string(lectern.join(slot)).unwrap().trim(), "[]");
    }

    // A second init refuses without --force
    let (_, stderr, success) = run_lec(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_init_sample_seeds_data() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_lec_ok(tmp.path(), &["init", "--sample"]);
    let books = read_books(tmp.path());
    assert_eq!(books.as_array().unwrap().len(), 3);

    let out = run_lec_ok(tmp.path(), &["dashboard"]);
    assert!(out.contains("Currently reading:"));
    assert!(out.contains("Mere Christianity"));
}

#[test]
fn test_commands_outside_library_fail() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_lec(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));
}

// ---------------------------------------------------------------------------
// add / list / show
// ---------------------------------------------------------------------------

#[test]
fn test_add_and_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    let id = add(tmp.path(), "The Republic", &["--type", "Book", "--notes", "books I-II"]);
    assert_eq!(id.len(), 32);

    let out = run_lec_ok(tmp.path(), &["show", &id[..6]]);
    assert!(out.contains("The Republic"));
    assert!(out.contains("status: To Read"));
    assert!(out.contains("quick action: Start"));
    assert!(out.contains("  books I-II"));
}

#[test]
fn test_add_validation_names_the_field() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());

    let (_, stderr, success) = run_lec(
        tmp.path(),
        &["add", "Q", "--author", " ", "--subject", "Philosophy"],
    );
    assert!(!success);
    assert!(stderr.contains("author is required"));

    let (_, stderr, success) = run_lec(
        tmp.path(),
        &["add", "Q", "--author", "A", "--subject", "Alchemy"],
    );
    assert!(!success);
    assert!(stderr.contains("unknown subject \"Alchemy\""));

    // Nothing was written
    assert_eq!(read_books(tmp.path()).as_array().unwrap().len(), 0);
}

#[test]
fn test_add_completed_forces_full_progress() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    add(tmp.path(), "Orthodoxy", &["--status", "completed", "--progress", "20"]);
    let books = read_books(tmp.path());
    assert_eq!(books[0]["status"], "Completed");
    assert_eq!(books[0]["progress"], 100);
}

#[test]
fn test_list_paginates() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    for i in 0..7 {
        add(tmp.path(), &format!("Book {}", i), &[]);
    }

    let out = run_lec_ok(tmp.path(), &["list"]);
    assert!(out.contains("Showing 1-6 of 7  [1] 2"));
    assert_eq!(out.lines().filter(|l| l.contains("Book ")).count(), 6);

    let out = run_lec_ok(tmp.path(), &["list", "--page", "2"]);
    assert!(out.contains("Showing 7-7 of 7  1 [2]"));

    let out = run_lec_ok(tmp.path(), &["list", "--json", "--page", "9"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["totalMatching"], 7);
    assert_eq!(parsed["totalPages"], 2);
    assert_eq!(parsed["items"].as_array().unwrap().len(), 0);

    let max = usize::MAX.to_string();
    let out = run_lec_ok(tmp.path(), &["list", "--json", "--page", &max]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["items"].as_array().unwrap().len(), 0);
    run_lec_ok(tmp.path(), &["list", "--page", &max]);
}

#[test]
fn test_list_search_and_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    add(tmp.path(), "The Republic", &[]);
    add(tmp.path(), "Meditations", &["--status", "reading", "--progress", "30"]);

    let out = run_lec_ok(tmp.path(), &["list", "--search", "REPUB"]);
    assert!(out.contains("The Republic"));
    assert!(!out.contains("Meditations"));

    let out = run_lec_ok(tmp.path(), &["list", "--status", "reading"]);
    assert!(out.contains("Meditations"));
    assert!(!out.contains("The Republic"));

    let out = run_lec_ok(tmp.path(), &["list", "--search", "nothing-like-this"]);
    assert!(out.contains("No materials match the current search or filters."));
}

#[test]
fn test_list_sort_by_progress() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    add(tmp.path(), "Low", &["--status", "reading", "--progress", "10"]);
    add(tmp.path(), "High", &["--status", "reading", "--progress", "90"]);

    let out = run_lec_ok(tmp.path(), &["list", "--sort", "progress"]);
    let high = out.find("High").unwrap();
    let low = out.find("Low").unwrap();
    assert!(high < low);
}

// ---------------------------------------------------------------------------
// status / progress / quick
// ---------------------------------------------------------------------------

#[test]
fn test_status_and_progress_reconcile() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    let id = add(tmp.path(), "Cosmos", &[]);

    let out = run_lec_ok(tmp.path(), &["status", &id, "reading"]);
    assert!(out.contains("-> Reading (5%)"));

    run_lec_ok(tmp.path(), &["progress", &id, "95"]);
    let out = run_lec_ok(tmp.path(), &["progress", &id, "+10"]);
    assert!(out.contains("-> 100% (Completed)"));

    // Lowering progress alone leaves a completed item completed
    let out = run_lec_ok(tmp.path(), &["progress", &id, "50"]);
    assert!(out.contains("-> 50% (Completed)"));

    run_lec_ok(tmp.path(), &["status", &id, "reading"]);
    let out = run_lec_ok(tmp.path(), &["progress", &id, "0"]);
    assert!(out.contains("-> 0% (To Read)"));

    let out = run_lec_ok(tmp.path(), &["status", &id, "paused"]);
    assert!(out.contains("-> Paused (0%)"));
}

#[test]
fn test_quick_action_cycle() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    let id = add(tmp.path(), "Orthodoxy", &[]);

    let out = run_lec_ok(tmp.path(), &["quick", &id]);
    assert_eq!(out.trim(), "Started reading \"Orthodoxy\"");
    let out = run_lec_ok(tmp.path(), &["quick", &id]);
    assert_eq!(out.trim(), "Progress updated: 15%");

    run_lec_ok(tmp.path(), &["status", &id, "completed"]);
    let out = run_lec_ok(tmp.path(), &["quick", &id]);
    assert_eq!(out.trim(), "\"Orthodoxy\" is already completed!");
}

#[test]
fn test_missing_id_is_a_noop() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    add(tmp.path(), "Orthodoxy", &[]);
    let before = fs::read_to_string(tmp.path().join("lectern/books.json")).unwrap();

    let (stdout, stderr, success) = run_lec(tmp.path(), &["status", "zzzz", "reading"]);
    assert!(success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("no material matches 'zzzz'"));

    let after = fs::read_to_string(tmp.path().join("lectern/books.json")).unwrap();
    assert_eq!(before, after);
}

// ---------------------------------------------------------------------------
// edit / delete
// ---------------------------------------------------------------------------

#[test]
fn test_edit_changes_fields() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    let id = add(tmp.path(), "Republic", &[]);

    run_lec_ok(tmp.path(), &["edit", &id, "--title", "The Republic", "--author", "Plato"]);
    let books = read_books(tmp.path());
    assert_eq!(books[0]["title"], "The Republic");
    assert_eq!(books[0]["author"], "Plato");

    let (_, stderr, success) = run_lec(tmp.path(), &["edit", &id]);
    assert!(!success);
    assert!(stderr.contains("nothing to change"));
}

#[test]
fn test_delete_with_yes_logs_recovery() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    let id = add(tmp.path(), "Orthodoxy", &[]);

    let out = run_lec_ok(tmp.path(), &["delete", &id, "--yes"]);
    assert!(out.contains("deleted \"Orthodoxy\""));
    assert_eq!(read_books(tmp.path()).as_array().unwrap().len(), 0);

    let out = run_lec_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("Orthodoxy"));
}

#[test]
fn test_delete_declined_keeps_record() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    let id = add(tmp.path(), "Orthodoxy", &[]);

    let mut child = Command::new(lec_bin())
        .args(["delete", &id])
        .current_dir(tmp.path())
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();
    {
        use std::io::Write;
        let stdin = child.stdin.as_mut().unwrap();
        stdin.write_all(b"n\n").unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("cancelled"));
    assert_eq!(read_books(tmp.path()).as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Legacy data
// ---------------------------------------------------------------------------

#[test]
fn test_legacy_statuses_are_normalized_and_healed() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    fs::write(
        tmp.path().join("lectern/books.json"),
        r#"[
  {"id": 1, "title": "A", "author": "X", "category": "Physics", "status": "Currently Reading", "progress": 40, "dateAdded": "2024-01-01T00:00:00Z"},
  {"id": 2, "title": "B", "author": "Y", "category": "Physics", "status": "done", "progress": 100, "dateAdded": "2024-01-02T00:00:00Z"},
  {"id": 3, "title": "C", "author": "Z", "category": "Physics", "status": "Archived", "progress": 0, "dateAdded": "2024-01-03T00:00:00Z"}
]"#,
    )
    .unwrap();

    let out = run_lec_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let statuses: Vec<&str> = parsed["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["To Read", "Completed", "Reading"]);

    // The slot on disk now holds canonical statuses
    let books = read_books(tmp.path());
    assert_eq!(books[0]["status"], "Reading");
    assert_eq!(books[2]["status"], "To Read");
}

#[test]
fn test_malformed_slot_loads_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    fs::write(tmp.path().join("lectern/books.json"), "{not json").unwrap();

    let out = run_lec_ok(tmp.path(), &["list"]);
    assert!(out.contains("No materials yet."));
    let out = run_lec_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("{not json"));
}

// ---------------------------------------------------------------------------
// stats / subjects / page-size
// ---------------------------------------------------------------------------

#[test]
fn test_stats_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    add(tmp.path(), "A", &[]);
    add(tmp.path(), "B", &["--status", "paused"]);

    let out = run_lec_ok(tmp.path(), &["stats", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["total"], 2);
    assert_eq!(parsed["toRead"], 1);
    assert_eq!(parsed["paused"], 1);
}

#[test]
fn test_subject_add_and_remove_keep_config_comments() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());

    run_lec_ok(tmp.path(), &["subject", "add", "Astronomy"]);
    let out = run_lec_ok(tmp.path(), &["subjects"]);
    assert!(out.contains("Astronomy"));
    add(tmp.path(), "Cosmos", &[]);

    run_lec_ok(tmp.path(), &["subject", "rm", "Astronomy"]);
    let (_, stderr, success) = run_lec(tmp.path(), &["subject", "rm", "Astronomy"]);
    assert!(!success);
    assert!(stderr.contains("no subject named"));

    let config = fs::read_to_string(tmp.path().join("lectern/lectern.toml")).unwrap();
    assert!(config.contains('#'));
}

#[test]
fn test_page_size() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    assert_eq!(run_lec_ok(tmp.path(), &["page-size"]).trim(), "6");
    run_lec_ok(tmp.path(), &["page-size", "2"]);
    assert_eq!(run_lec_ok(tmp.path(), &["page-size"]).trim(), "2");

    let (_, _, success) = run_lec(tmp.path(), &["page-size", "0"]);
    assert!(!success);
}

// ---------------------------------------------------------------------------
// notes / tasks
// ---------------------------------------------------------------------------

#[test]
fn test_notes_round_trip() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    let id = run_lec_ok(
        tmp.path(),
        &[
            "note", "add", "Forms", "--subject", "Philosophy", "--content",
            "The divided line", "--tags", "plato, forms",
        ],
    )
    .trim()
    .to_string();

    let out = run_lec_ok(tmp.path(), &["note", "list"]);
    assert!(out.contains("Forms (Philosophy) #plato #forms"));

    let out = run_lec_ok(tmp.path(), &["note", "search", "divided"]);
    assert!(out.contains("Forms"));

    run_lec_ok(tmp.path(), &["note", "rm", &id]);
    let out = run_lec_ok(tmp.path(), &["note", "list"]);
    assert!(out.contains("No notes yet."));
}

#[test]
fn test_tasks_pending_order_and_done() {
    let tmp = tempfile::TempDir::new().unwrap();
    init_library(tmp.path());
    run_lec_ok(tmp.path(), &["task", "add", "Later", "--due", "2030-01-01"]);
    let soon = run_lec_ok(tmp.path(), &["task", "add", "Soon", "--due", "2029-01-01"])
        .trim()
        .to_string();
    run_lec_ok(tmp.path(), &["task", "add", "Someday"]);

    let out = run_lec_ok(tmp.path(), &["task", "list"]);
    let titles: Vec<&str> = out
        .lines()
        .filter_map(|l| l.split("  ").nth(1))
        .map(|rest| rest.split(" due").next().unwrap_or(rest))
        .collect();
    assert_eq!(titles, vec!["Soon", "Later", "Someday"]);

    run_lec_ok(tmp.path(), &["task", "done", &soon]);
    let out = run_lec_ok(tmp.path(), &["task", "list"]);
    assert!(!out.contains("Soon"));
    let out = run_lec_ok(tmp.path(), &["task", "list", "--all"]);
    assert!(out.contains("[x]"));

    let (_, _, success) = run_lec(tmp.path(), &["task", "add", "Bad", "--due", "next week"]);
    assert!(!success);
}
