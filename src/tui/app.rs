use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::library_io::{discover_library, load_library};
use crate::model::{Library, Material};
use crate::ops::view::{self, SortKey, StatusFilter, ViewPage, ViewQuery};

use super::actions::ActionTable;
use super::form::FormState;
use super::input;
use super::render;
use super::theme::Theme;

/// Which tab is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Library,
    Dashboard,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
    /// Waiting for y/n on `confirm_state`
    Confirm,
    /// Status dropdown open on `status_pick`
    StatusPick,
    /// Add/edit form open on `form`
    Form,
}

/// What a pending confirmation will do on `y`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteMaterial { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub prompt: String,
    pub action: ConfirmAction,
}

/// Open status dropdown for one material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPickState {
    pub id: String,
    /// Index into `Status::all()`
    pub cursor: usize,
}

/// One-line feedback shown in the status row until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_warning: bool,
}

/// Main application state
pub struct App {
    pub library: Library,
    pub tab: Tab,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub actions: ActionTable,
    pub query: ViewQuery,
    /// Card index within the current page
    pub cursor: usize,
    /// Text being typed in Search mode
    pub search_input: String,
    pub confirm_state: Option<ConfirmState>,
    pub status_pick: Option<StatusPickState>,
    pub form: Option<FormState>,
    pub status_message: Option<StatusMessage>,
}

impl App {
    pub fn new(library: Library) -> Self {
        let theme = Theme::from_config(&library.config.ui);
        let query = ViewQuery {
            sort: SortKey::parse(&library.config.view.sort),
            page_size: library.config.view.page_size.max(1),
            ..ViewQuery::default()
        };
        App {
            library,
            tab: Tab::Library,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            actions: ActionTable::new(),
            query,
            cursor: 0,
            search_input: String::new(),
            confirm_state: None,
            status_pick: None,
            form: None,
            status_message: None,
        }
    }

    /// The current page of the library view
    pub fn page(&self) -> ViewPage<'_> {
        view::compute(&self.library.materials, &self.query)
    }

    /// The material under the cursor, if the page has any
    pub fn selected(&self) -> Option<&Material> {
        self.page().items.get(self.cursor).copied()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected().map(|m| m.id.clone())
    }

    /// Keep page and cursor inside the current result set after the list or
    /// the query changed.
    pub fn clamp_position(&mut self) {
        let total_pages = self.page().total_pages;
        if total_pages > 0 && self.query.page > total_pages {
            self.query.page = total_pages;
        }
        self.query.page = self.query.page.max(1);
        let len = self.page().items.len();
        if len == 0 {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(len - 1);
        }
    }

    /// Case-insensitive regex for the active search, used for highlighting
    pub fn search_regex(&self) -> Option<Regex> {
        if self.query.search.is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(&self.query.search))).ok()
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_warning: false,
        });
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_warning: true,
        });
    }

    /// Persist the material list. A failed write leaves the in-memory list as
    /// it is and shows a warning; returns whether the save succeeded.
    pub fn save_materials(&mut self) -> bool {
        match self.library.save_materials() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "saving materials failed");
                self.warn(format!("Could not save: {} (changes kept in memory)", e));
                false
            }
        }
    }

    /// Library name for the tab bar
    pub fn library_name(&self) -> &str {
        &self.library.config.library.name
    }

    /// Subjects to cycle through: configured ones first, then any only
    /// present on records.
    pub fn subject_choices(&self) -> Vec<String> {
        let mut subjects = self.library.config.subjects.clone();
        for m in &self.library.materials {
            if !subjects.iter().any(|s| s == &m.category) {
                subjects.push(m.category.clone());
            }
        }
        subjects
    }
}

// ---------------------------------------------------------------------------
// UI state persistence
// ---------------------------------------------------------------------------

pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let ui_state = match read_ui_state(&app.library.lectern_dir) {
        Some(s) => s,
        None => return,
    };

    if ui_state.view == "dashboard" {
        app.tab = Tab::Dashboard;
    }

    let saved = ui_state.library;
    if let Some(filter) = saved.filter.as_deref().and_then(StatusFilter::parse) {
        app.query.status = filter;
    }
    app.query.subject = saved.subject;
    app.query.search = saved.search;
    if let Some(sort) = saved.sort.as_deref() {
        app.query.sort = SortKey::parse(sort);
    }
    app.query.page = saved.page.max(1);
    app.cursor = saved.cursor;
    app.clamp_position();
}

pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, ViewUiState, write_ui_state};

    let view = match app.tab {
        Tab::Library => "library",
        Tab::Dashboard => "dashboard",
    };
    let ui_state = UiState {
        view: view.to_string(),
        library: ViewUiState {
            filter: Some(app.query.status.label().to_string()),
            subject: app.query.subject.clone(),
            search: app.query.search.clone(),
            sort: Some(app.query.sort.as_str().to_string()),
            page: app.query.page,
            cursor: app.cursor,
        },
    };
    if let Err(e) = write_ui_state(&app.library.lectern_dir, &ui_state) {
        tracing::warn!(error = %e, "could not write UI state");
    }
}

// ---------------------------------------------------------------------------
// Terminal loop
// ---------------------------------------------------------------------------

/// Run the TUI application
pub fn run(library_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match library_dir {
        Some(dir) => std::path::PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let root = discover_library(&start)?;
    let lectern_dir = root.join(crate::io::library_io::LECTERN_DIR);
    crate::logging::init_file(&lectern_dir);

    let library = load_library(&root)?;
    tracing::info!(root = %root.display(), "tui started");

    let mut app = App::new(library);
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{app_with_materials, sample_material};

    #[test]
    fn new_app_uses_configured_view() {
        let app = app_with_materials(vec![]);
        assert_eq!(app.query.page_size, 6);
        assert_eq!(app.query.sort, SortKey::DateAdded);
        assert_eq!(app.tab, Tab::Library);
    }

    #[test]
    fn clamp_position_pulls_back_past_last_page() {
        let materials = (0..7).map(|i| sample_material(&format!("Book {}", i))).collect();
        let mut app = app_with_materials(materials);
        app.query.page = 5;
        app.cursor = 4;
        app.clamp_position();
        assert_eq!(app.query.page, 2);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn clamp_position_handles_huge_saved_page() {
        let materials = (0..7).map(|i| sample_material(&format!("Book {}", i))).collect();
        let mut app = app_with_materials(materials);
        app.query.page = usize::MAX;
        app.clamp_position();
        assert_eq!(app.query.page, 2);
        assert_eq!(app.page().items.len(), 1);
    }

    #[test]
    fn search_regex_escapes_and_ignores_case() {
        let mut app = app_with_materials(vec![]);
        assert!(app.search_regex().is_none());
        app.query.search = "c.s. (lewis)".into();
        let re = app.search_regex().unwrap();
        assert!(re.is_match("by C.S. (Lewis)"));
        assert!(!re.is_match("by CxS. (Lewis)"));
    }

    #[test]
    fn subject_choices_include_unconfigured_subjects() {
        let mut m = sample_material("Cosmos");
        m.category = "Astronomy".into();
        let app = app_with_materials(vec![m]);
        let choices = app.subject_choices();
        assert_eq!(choices.last().map(String::as_str), Some("Astronomy"));
        assert!(choices.contains(&"Physics".to_string()));
    }

    #[test]
    fn ui_state_round_trips_through_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app_with_materials(vec![sample_material("A"), sample_material("B")]);
        app.library.lectern_dir = dir.path().to_path_buf();
        app.tab = Tab::Dashboard;
        app.query.status = StatusFilter::Only(crate::model::Status::Reading);
        app.query.search = "lewis".into();
        save_ui_state(&app);

        let mut restored = app_with_materials(vec![]);
        restored.library.lectern_dir = dir.path().to_path_buf();
        restore_ui_state(&mut restored);
        assert_eq!(restored.tab, Tab::Dashboard);
        assert_eq!(restored.query.status, app.query.status);
        assert_eq!(restored.query.search, "lewis");
        assert_eq!(restored.query.page, 1);
    }
}
