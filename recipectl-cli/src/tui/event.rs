//! Event handling for the recipe form

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use recipectl_core::editor::GroupKind;
use recipectl_core::RecipeCreate;

use super::app::App;

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling a key event
#[derive(Debug)]
pub enum HandleResult {
    /// Keep editing
    Continue,
    /// Leave without saving
    Cancel,
    /// Form is complete; send this request
    Submit(RecipeCreate),
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    // Any key closes the notice
    if app.modal.is_some() {
        app.dismiss_modal();
        return HandleResult::Continue;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => HandleResult::Cancel,
            KeyCode::Char('s') => submit(app),
            KeyCode::Char('d') => {
                app.remove_focused_row();
                HandleResult::Continue
            }
            _ => HandleResult::Continue,
        };
    }

    if key.code == KeyCode::Enter && key.modifiers.contains(KeyModifiers::ALT) {
        app.insert_newline();
        return HandleResult::Continue;
    }

    app.status_message = None;
    match key.code {
        KeyCode::Esc => return HandleResult::Cancel,
        KeyCode::F(2) => app.add_row(GroupKind::Ingredients),
        KeyCode::F(3) => app.add_row(GroupKind::Instructions),
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
    HandleResult::Continue
}

fn submit(app: &mut App) -> HandleResult {
    match app.submission() {
        Ok(request) => HandleResult::Submit(request),
        Err(message) => {
            app.status_message = Some(message);
            HandleResult::Continue
        }
    }
}
