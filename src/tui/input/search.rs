use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::unicode::{prev_grapheme_boundary, word_boundary_left};

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cancel: keep the search that was active before
        (_, KeyCode::Esc) => {
            app.search_input.clear();
            app.mode = Mode::Navigate;
        }

        // Apply the typed text (empty clears the search)
        (_, KeyCode::Enter) => {
            let text = std::mem::take(&mut app.search_input);
            app.query.search = text.trim().to_string();
            app.query.page = 1;
            app.cursor = 0;
            app.mode = Mode::Navigate;
            if !app.query.search.is_empty() {
                let total = app.page().total_matching;
                app.notify(format!("{} match{}", total, if total == 1 { "" } else { "es" }));
            }
        }

        (_, KeyCode::Backspace) => {
            if let Some(start) = prev_grapheme_boundary(&app.search_input, app.search_input.len()) {
                app.search_input.truncate(start);
            }
        }

        (m, KeyCode::Char('w')) if m.contains(KeyModifiers::CONTROL) => {
            let start = word_boundary_left(&app.search_input, app.search_input.len());
            app.search_input.truncate(start);
        }

        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            app.search_input.clear();
        }

        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            app.search_input.push(c);
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{app_with_materials, sample_material};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            handle_search(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn enter_applies_search_and_reports_matches() {
        let mut app = app_with_materials(vec![sample_material("Orthodoxy"), sample_material("Cosmos")]);
        app.mode = Mode::Search;
        type_str(&mut app, "cosm");
        handle_search(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.query.search, "cosm");
        assert_eq!(app.page().total_matching, 1);
        assert_eq!(app.status_message.map(|m| m.text), Some("1 match".to_string()));
    }

    #[test]
    fn escape_keeps_previous_search() {
        let mut app = app_with_materials(vec![]);
        app.query.search = "lewis".into();
        app.mode = Mode::Search;
        type_str(&mut app, "plato");
        handle_search(&mut app, key(KeyCode::Esc));
        assert_eq!(app.query.search, "lewis");
        assert!(app.search_input.is_empty());
    }

    #[test]
    fn ctrl_w_deletes_word() {
        let mut app = app_with_materials(vec![]);
        type_str(&mut app, "mere christianity");
        handle_search(&mut app, KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(app.search_input, "mere ");
        handle_search(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.search_input, "mere");
    }
}
