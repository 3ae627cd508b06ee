use crossterm::event::{KeyCode, KeyEvent};

use crate::model::Status;
use crate::tui::actions;
use crate::tui::app::{App, Mode};

pub(super) fn handle_status_pick(app: &mut App, key: KeyEvent) {
    let statuses = Status::all();
    let Some(pick) = app.status_pick.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            pick.cursor = pick.cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            pick.cursor = (pick.cursor + 1).min(statuses.len() - 1);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let status = statuses[pick.cursor.min(statuses.len() - 1)];
            actions::apply_status_pick(app, status);
        }
        // 1-4 pick directly
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            actions::apply_status_pick(app, statuses[index]);
        }
        KeyCode::Esc => {
            app.status_pick = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}
