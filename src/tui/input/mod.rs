mod confirm;
mod form;
mod search;
mod status_pick;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions;
use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    // Messages last until the next key press
    app.status_message = None;

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => search::handle_search(app, key),
        Mode::Confirm => confirm::handle_confirm(app, key),
        Mode::StatusPick => status_pick::handle_status_pick(app, key),
        Mode::Form => form::handle_form(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            app.should_quit = true;
        }
        return;
    }
    actions::dispatch(app, key.code);
}
