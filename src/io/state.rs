use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Which tab is showing ("library" or "dashboard")
    pub view: String,
    #[serde(default)]
    pub library: ViewUiState,
}

/// Filter, search and position in the library view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ViewUiState {
    /// Status filter label ("all" or a status)
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: Option<String>,
    /// 1-based page number
    #[serde(default)]
    pub page: usize,
    /// Card index within the page
    #[serde(default)]
    pub cursor: usize,
}

/// Read .state.json from the lectern directory
pub fn read_ui_state(lectern_dir: &Path) -> Option<UiState> {
    let path = lectern_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the lectern directory
pub fn write_ui_state(lectern_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = lectern_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    crate::io::recovery::atomic_write(&path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = UiState {
            view: "library".into(),
            library: ViewUiState {
                filter: Some("Reading".into()),
                subject: Some("Physics".into()),
                search: "maxwell".into(),
                sort: Some("title".into()),
                page: 2,
                cursor: 3,
            },
        };

        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_minimal_object() {
        let state: UiState = serde_json::from_str(r#"{"view":"dashboard"}"#).unwrap();
        assert_eq!(state.view, "dashboard");
        assert_eq!(state.library, ViewUiState::default());
    }
}
