//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] mutations.  Anything the app cannot
//! do by itself (fetching, launching a player) comes back as an [`Action`]
//! for the main loop.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{Action, App, Mode};

/// Process a single key event.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    if app.editing.is_some() {
        match key.code {
            KeyCode::Enter => app.apply_edit(),
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Tab => app.next_field(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Char(c) => app.push_char(c),
            _ => {}
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Tab => app.cycle_mode(),
        KeyCode::Char(']') => return app.next_podcast(),
        KeyCode::Char('[') => return app.previous_podcast(),
        KeyCode::Char('r') => return Action::Reload,
        KeyCode::Char('e') | KeyCode::Char('/') => app.start_editing(),
        KeyCode::Char('d') if app.mode == Mode::Search => app.toggle_detail(),
        KeyCode::Char('o') | KeyCode::Enter => return app.open_selected_audio(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
    Action::None
}
