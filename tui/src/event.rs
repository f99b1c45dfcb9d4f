use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::time::Duration;

use crate::adapter::CellGesture;
use crate::app::App;
use crate::dialog::DialogField;

/// Terminal events
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal tick event
    Tick,
    /// Mouse event
    Mouse(MouseEvent),
}

/// Event handler for the terminal
pub struct EventHandler {
    /// Tick rate in milliseconds
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CEvent::Key(key) => return Ok(Event::Key(key)),
                CEvent::Mouse(m) => return Ok(Event::Mouse(m)),
                _ => {}
            }
        }
        Ok(Event::Tick)
    }
}

/// Handle key events for the application
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    // On Windows, crossterm reports both key press and release events.
    // We only want to handle press events to avoid duplicates.
    if key.kind != KeyEventKind::Press {
        return;
    }

    // The confirmation can only be answered, not dismissed some other way
    if app.pending_delete.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
        return;
    }

    if app.dialog.is_some() {
        handle_dialog_input(key, app);
        return;
    }

    if app.help_open {
        if app.bindings.help.matches(&key) || app.bindings.cancel.matches(&key) {
            app.close_help();
        }
        return;
    }

    if app.drag.is_some() {
        handle_drag_input(key, app);
        return;
    }

    // --- Grid ---
    let b = app.bindings.clone();
    if b.quit.matches(&key) {
        app.quit();
    } else if b.help.matches(&key) {
        app.open_help();
    } else if b.add_note.matches(&key) {
        app.open_add_dialog();
    } else if b.edit_note.matches(&key) {
        app.gesture_at(app.selected, CellGesture::Tap);
    } else if b.pick_up.matches(&key) {
        app.pick_up_selected();
    } else {
        match key.code {
            KeyCode::Up => app.move_up(),
            KeyCode::Down => app.move_down(),
            KeyCode::Left => app.move_left(),
            KeyCode::Right => app.move_right(),
            _ => {}
        }
    }
}

/// Keys while a note is being dragged
fn handle_drag_input(key: KeyEvent, app: &mut App) {
    let b = app.bindings.clone();
    if b.cancel.matches(&key) {
        app.cancel_drag();
    } else if b.drop.matches(&key) {
        app.release_drag();
    } else if b.hover_bin.matches(&key) || key.code == KeyCode::Right || key.code == KeyCode::Down {
        app.hover_bin();
    } else if b.leave_bin.matches(&key) || key.code == KeyCode::Up {
        app.leave_bin();
    }
}

/// Keys while the add/edit dialog is open
fn handle_dialog_input(key: KeyEvent, app: &mut App) {
    let b = app.bindings.clone();
    if b.submit.matches(&key) {
        app.submit_dialog();
        return;
    }
    if b.cancel.matches(&key) {
        app.close_dialog();
        return;
    }

    // Enter moves from title to body, and submits from the body
    if key.code == KeyCode::Enter
        && app.dialog.as_ref().map(|d| d.focus) == Some(DialogField::Body)
    {
        app.submit_dialog();
        return;
    }

    let Some(dialog) = app.dialog.as_mut() else { return };
    if b.switch_field.matches(&key) || key.code == KeyCode::BackTab {
        dialog.toggle_focus();
        return;
    }

    match key.code {
        KeyCode::Enter => dialog.toggle_focus(),
        KeyCode::Backspace => dialog.backspace(),
        KeyCode::Left => dialog.cursor_left(),
        KeyCode::Right => dialog.cursor_right(),
        KeyCode::Home => dialog.cursor_home(),
        KeyCode::End => dialog.cursor_end(),
        KeyCode::Char(c) => {
            // Allow AltGr combinations (CONTROL+ALT) for special characters
            if !key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT) {
                dialog.insert_char(c);
            }
        }
        _ => {}
    }
}

/// Handle mouse events: clicks tap cards and the add button, left-button
/// drags move cards toward the bin
pub fn handle_mouse_event(mouse: MouseEvent, app: &mut App) {
    if app.dialog.is_some() || app.pending_delete.is_some() || app.help_open {
        return;
    }
    // A drag picked up from the keyboard is finished from the keyboard
    if app.drag.is_some() && app.press.is_none() {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.pointer_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.pointer_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.pointer_up(mouse.column, mouse.row),
        MouseEventKind::ScrollUp => app.move_up(),
        MouseEventKind::ScrollDown => app.move_down(),
        _ => {}
    }
}
