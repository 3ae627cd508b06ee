use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::actions;
use crate::tui::app::{App, Mode};

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Enter
        || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s'))
    {
        actions::submit_form(app);
        return;
    }

    let Some(form) = app.form.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.form = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left => form.left(),
        KeyCode::Right => form.right(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.insert_char(c);
        }
        _ => {}
    }
}
