use crossterm::event::KeyCode;

use crate::io::recovery;
use crate::model::Status;
use crate::ops::material_ops::{self, QuickAction};
use crate::ops::reconcile::{PROGRESS_STEP, ProgressChange, apply_progress};

use super::app::{App, ConfirmAction, ConfirmState, Mode, StatusPickState, Tab};
use super::form::{FormState, FormTarget};

/// Everything a key can trigger in Navigate mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CursorUp,
    CursorDown,
    PrevPage,
    NextPage,
    QuickAction,
    ProgressUp,
    ProgressDown,
    NudgeUp,
    NudgeDown,
    PickStatus,
    Delete,
    Add,
    Edit,
    CycleFilter,
    CycleSubject,
    CycleSort,
    Search,
    ClearFilters,
    SwitchTab,
    Quit,
}

pub type Handler = fn(&mut App);

/// A key binding: the keys, where they apply, how the help line names them
/// and the handler that runs.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub action: Action,
    pub keys: &'static [KeyCode],
    /// Key text for the help line; empty hides the binding from it
    pub hint: &'static str,
    pub label: &'static str,
    pub tabs: &'static [Tab],
    pub handler: Handler,
}

const LIBRARY: &[Tab] = &[Tab::Library];
const ALL_TABS: &[Tab] = &[Tab::Library, Tab::Dashboard];

/// Key → action table. Input dispatch and the help line both read it, so a
/// binding exists in exactly one place.
#[derive(Debug, Clone)]
pub struct ActionTable {
    bindings: Vec<Binding>,
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionTable {
    pub fn new() -> Self {
        let mut table = ActionTable {
            bindings: Vec::new(),
        };
        use KeyCode::{BackTab, Char, Delete, Down, Enter, Left, Right, Up};
        table.register(Action::CursorUp, &[Up, Char('k')], "", "up", LIBRARY, cursor_up);
        table.register(Action::CursorDown, &[Down, Char('j')], "j/k", "move", LIBRARY, cursor_down);
        table.register(Action::PrevPage, &[Left, Char('h')], "", "prev page", LIBRARY, prev_page);
        table.register(Action::NextPage, &[Right, Char('l')], "h/l", "page", LIBRARY, next_page);
        table.register(Action::QuickAction, &[Enter, Char(' ')], "⏎", "quick", LIBRARY, quick_action);
        table.register(Action::ProgressUp, &[Char('+'), Char('=')], "", "+10%", LIBRARY, progress_up);
        table.register(Action::ProgressDown, &[Char('-')], "-/+", "progress", LIBRARY, progress_down);
        table.register(Action::NudgeUp, &[Char('>'), Char('.')], "", "+1%", LIBRARY, nudge_up);
        table.register(Action::NudgeDown, &[Char('<'), Char(',')], "", "-1%", LIBRARY, nudge_down);
        table.register(Action::PickStatus, &[Char('s')], "s", "status", LIBRARY, pick_status);
        table.register(Action::Add, &[Char('a')], "a", "add", LIBRARY, open_add_form);
        table.register(Action::Edit, &[Char('e')], "e", "edit", LIBRARY, open_edit_form);
        table.register(Action::Delete, &[Char('d'), Delete], "d", "delete", LIBRARY, begin_delete);
        table.register(Action::CycleFilter, &[Char('f')], "f", "filter", LIBRARY, cycle_filter);
        table.register(Action::CycleSubject, &[Char('c')], "c", "subject", LIBRARY, cycle_subject);
        table.register(Action::CycleSort, &[Char('o')], "o", "sort", LIBRARY, cycle_sort);
        table.register(Action::Search, &[Char('/')], "/", "search", LIBRARY, begin_search);
        table.register(Action::ClearFilters, &[Char('x')], "x", "clear", LIBRARY, clear_filters);
        table.register(Action::SwitchTab, &[KeyCode::Tab, BackTab], "tab", "view", ALL_TABS, switch_tab);
        table.register(Action::Quit, &[Char('q')], "q", "quit", ALL_TABS, quit);
        table
    }

    pub fn register(
        &mut self,
        action: Action,
        keys: &'static [KeyCode],
        hint: &'static str,
        label: &'static str,
        tabs: &'static [Tab],
        handler: Handler,
    ) {
        self.bindings.push(Binding {
            action,
            keys,
            hint,
            label,
            tabs,
            handler,
        });
    }

    /// Binding for a key on a tab
    pub fn lookup(&self, tab: Tab, code: KeyCode) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| b.tabs.contains(&tab) && b.keys.contains(&code))
    }

    pub fn binding(&self, action: Action) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.action == action)
    }

    /// Key hints for the status row, e.g. `j/k move  s status  q quit`
    pub fn help_line(&self, tab: Tab) -> String {
        self.bindings
            .iter()
            .filter(|b| !b.hint.is_empty() && b.tabs.contains(&tab))
            .map(|b| format!("{} {}", b.hint, b.label))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Run the handler bound to `code` on the current tab. Returns false when
/// nothing is bound.
pub fn dispatch(app: &mut App, code: KeyCode) -> bool {
    let handler = app.actions.lookup(app.tab, code).map(|b| b.handler);
    match handler {
        Some(handler) => {
            handler(app);
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

fn cursor_up(app: &mut App) {
    if app.cursor > 0 {
        app.cursor -= 1;
    } else if app.query.page > 1 {
        app.query.page -= 1;
        app.cursor = app.query.page_size.saturating_sub(1);
        app.clamp_position();
    }
}

fn cursor_down(app: &mut App) {
    let page = app.page();
    let (len, total_pages) = (page.items.len(), page.total_pages);
    if app.cursor + 1 < len {
        app.cursor += 1;
    } else if app.query.page < total_pages {
        app.query.page += 1;
        app.cursor = 0;
    }
}

fn prev_page(app: &mut App) {
    if app.query.page > 1 {
        app.query.page -= 1;
        app.cursor = 0;
    }
}

fn next_page(app: &mut App) {
    if app.query.page < app.page().total_pages {
        app.query.page += 1;
        app.cursor = 0;
    }
}

fn switch_tab(app: &mut App) {
    app.tab = match app.tab {
        Tab::Library => Tab::Dashboard,
        Tab::Dashboard => Tab::Library,
    };
}

fn quit(app: &mut App) {
    app.should_quit = true;
}

// ---------------------------------------------------------------------------
// Record actions
// ---------------------------------------------------------------------------

fn quick_action(app: &mut App) {
    let Some(id) = app.selected_id() else {
        return;
    };
    let status = app.selected().map(|m| m.status);
    let Some(message) = material_ops::apply_quick_action(&mut app.library.materials, &id) else {
        return;
    };
    let mutated = status.is_some_and(|s| QuickAction::for_status(s).mutates());
    if mutated && !app.save_materials() {
        return;
    }
    app.notify(message);
    app.clamp_position();
}

fn step_progress(app: &mut App, delta: i64) {
    let Some(id) = app.selected_id() else {
        return;
    };
    let Some(material) = material_ops::find_material_mut(&mut app.library.materials, &id) else {
        return;
    };
    let before = material.progress;
    apply_progress(material, ProgressChange::Step(delta));
    if material.progress == before {
        return;
    }
    let message = format!("Progress: {}% ({})", material.progress, material.status);
    if app.save_materials() {
        app.notify(message);
    }
    app.clamp_position();
}

fn progress_up(app: &mut App) {
    step_progress(app, PROGRESS_STEP);
}

fn progress_down(app: &mut App) {
    step_progress(app, -PROGRESS_STEP);
}

fn nudge_up(app: &mut App) {
    step_progress(app, 1);
}

fn nudge_down(app: &mut App) {
    step_progress(app, -1);
}

fn pick_status(app: &mut App) {
    let Some(material) = app.selected() else {
        return;
    };
    let cursor = Status::all()
        .iter()
        .position(|s| *s == material.status)
        .unwrap_or(0);
    app.status_pick = Some(StatusPickState {
        id: material.id.clone(),
        cursor,
    });
    app.mode = Mode::StatusPick;
}

/// Apply the status chosen in the dropdown
pub fn apply_status_pick(app: &mut App, status: Status) {
    let Some(pick) = app.status_pick.take() else {
        return;
    };
    app.mode = Mode::Navigate;
    let Some(material) = material_ops::find_material_mut(&mut app.library.materials, &pick.id)
    else {
        return;
    };
    if material.status == status {
        return;
    }
    crate::ops::reconcile::on_status_change(material, status);
    let message = format!("Status: {} ({}%)", material.status, material.progress);
    if app.save_materials() {
        app.notify(message);
    }
    app.clamp_position();
}

fn begin_delete(app: &mut App) {
    let Some(material) = app.selected() else {
        return;
    };
    app.confirm_state = Some(ConfirmState {
        prompt: format!("Delete \"{}\"?", material.title),
        action: ConfirmAction::DeleteMaterial {
            id: material.id.clone(),
        },
    });
    app.mode = Mode::Confirm;
}

/// Carry out a confirmed action
pub fn confirm(app: &mut App, action: ConfirmAction) {
    match action {
        ConfirmAction::DeleteMaterial { id } => delete_material(app, &id),
    }
}

fn delete_material(app: &mut App, id: &str) {
    let Some((index, removed)) = material_ops::delete_material(&mut app.library.materials, id) else {
        return;
    };
    if !app.save_materials() {
        app.library.materials.insert(index, removed);
        return;
    }
    if let Ok(json) = serde_json::to_string_pretty(&removed) {
        recovery::log_deletion(&app.library.lectern_dir, "material", &removed.id, &removed.title, &json);
    }
    app.notify(format!("Deleted \"{}\"", removed.title));
    app.clamp_position();
}

fn open_add_form(app: &mut App) {
    let subject = app.query.subject.clone();
    app.form = Some(FormState::for_add(&app.library.config, subject.as_deref()));
    app.mode = Mode::Form;
}

fn open_edit_form(app: &mut App) {
    let Some(material) = app.selected() else {
        return;
    };
    let form = FormState::for_edit(&app.library.config, material);
    app.form = Some(form);
    app.mode = Mode::Form;
}

/// Submit the open form. Validation failures stay in the form with the
/// typed input intact.
pub fn submit_form(app: &mut App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(message) => {
            set_form_error(app, message);
            return;
        }
    };
    let target = form.target.clone();

    let result = match &target {
        FormTarget::Add => {
            material_ops::create_material(&mut app.library.materials, &draft, &app.library.config)
                .map(|id| Some(format!("Added \"{}\"", title_of(app, &id))))
        }
        FormTarget::Edit { id } => {
            let snapshot = material_ops::find_material(&app.library.materials, id).cloned();
            material_ops::edit_material(&mut app.library.materials, id, &draft, &app.library.config)
                .map(|found| {
                    // Unchanged or vanished records need no save
                    let changed = found
                        && snapshot.as_ref()
                            != material_ops::find_material(&app.library.materials, id);
                    changed.then(|| format!("Updated \"{}\"", title_of(app, id)))
                })
        }
    };

    match result {
        Err(e) => set_form_error(app, e.to_string()),
        Ok(message) => {
            app.form = None;
            app.mode = Mode::Navigate;
            if let Some(message) = message
                && app.save_materials()
            {
                app.notify(message);
            }
            app.clamp_position();
        }
    }
}

fn title_of(app: &App, id: &str) -> String {
    material_ops::find_material(&app.library.materials, id)
        .map(|m| m.title.clone())
        .unwrap_or_default()
}

fn set_form_error(app: &mut App, message: String) {
    if let Some(form) = app.form.as_mut() {
        form.error = Some(message);
    }
}

// ---------------------------------------------------------------------------
// View query
// ---------------------------------------------------------------------------

fn cycle_filter(app: &mut App) {
    app.query.status = app.query.status.cycle();
    app.query.page = 1;
    app.cursor = 0;
    let label = app.query.status.label();
    app.notify(format!("Filter: {}", label));
}

fn cycle_subject(app: &mut App) {
    let choices = app.subject_choices();
    app.query.subject = match &app.query.subject {
        None => choices.first().cloned(),
        Some(current) => choices
            .iter()
            .position(|s| s == current)
            .and_then(|i| choices.get(i + 1))
            .cloned(),
    };
    app.query.page = 1;
    app.cursor = 0;
    let label = app.query.subject.clone().unwrap_or_else(|| "all".to_string());
    app.notify(format!("Subject: {}", label));
}

fn cycle_sort(app: &mut App) {
    app.query.sort = app.query.sort.cycle();
    app.query.page = 1;
    app.cursor = 0;
    let label = app.query.sort.as_str();
    app.notify(format!("Sort: {}", label));
}

fn begin_search(app: &mut App) {
    app.search_input = app.query.search.clone();
    app.mode = Mode::Search;
}

fn clear_filters(app: &mut App) {
    app.query.clear_filters();
    app.cursor = 0;
    app.notify("Filters cleared");
}
