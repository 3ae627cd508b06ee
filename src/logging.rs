use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`tracing_subscriber` syntax)
pub const LOG_ENV: &str = "LECTERN_LOG";

/// Log file used while the TUI owns the terminal
pub const LOG_FILE: &str = ".lectern.log";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr. Used by every CLI command.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to `<lectern_dir>/.lectern.log` so output never lands on the
/// alternate screen. Falls back to stderr if the file cannot be opened.
pub fn init_file(lectern_dir: &Path) {
    let path = lectern_dir.join(LOG_FILE);
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(e) => {
            init_stderr();
            tracing::warn!(path = %path.display(), error = %e, "could not open log file");
        }
    }
}
