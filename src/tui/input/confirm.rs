use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::actions;
use crate::tui::app::{App, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) | (KeyModifiers::SHIFT, KeyCode::Char('Y')) => {
            let state = app.confirm_state.take();
            app.mode = Mode::Navigate;
            if let Some(state) = state {
                actions::confirm(app, state.action);
            }
        }
        // Cancel: n or Esc, nothing changes
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.confirm_state = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{app_with_materials, sample_material};

    #[test]
    fn declining_leaves_library_unchanged() {
        let mut app = app_with_materials(vec![sample_material("Orthodoxy")]);
        actions::dispatch(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Confirm);
        handle_confirm(&mut app, KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.confirm_state.is_none());
        assert_eq!(app.library.materials.len(), 1);
    }

    #[test]
    fn other_keys_keep_waiting() {
        let mut app = app_with_materials(vec![sample_material("Orthodoxy")]);
        actions::dispatch(&mut app, KeyCode::Char('d'));
        handle_confirm(&mut app, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(app.mode, Mode::Confirm);
        assert!(app.confirm_state.is_some());
    }
}
