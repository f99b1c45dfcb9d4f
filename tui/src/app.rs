use crate::adapter::{AdapterEvent, CellCache, CellGesture, Invalidation, NotesAdapter};
use crate::config::{Bindings, Config};
use crate::dialog::{DialogSubmission, NoteDialog};
use crate::drag::{ActiveDrag, DragPayload, DragPhase, TrashTarget, MIMETYPE_TEXT_PLAIN};
use anyhow::Result;
use dragnotes_core::models::{NewNote, Note, NoteId};
use dragnotes_core::storage::NoteStore;
use log::{debug, error, info, warn};
use ratatui::layout::{Position, Rect};
use std::time::{Duration, Instant};

pub const NOTE_DELETED_MESSAGE: &str = "Note has been deleted";
pub const DELETE_FAILED_MESSAGE: &str = "Error deleting note";
pub const EDIT_FAILED_MESSAGE: &str = "Error editing note";
pub const ADD_FAILED_MESSAGE: &str = "Error adding note";
pub const BAD_PAYLOAD_MESSAGE: &str = "Dropped item is not a note";
pub const CONFIRM_DELETE_MESSAGE: &str = "Are you sure you want to delete this note?";

/// Short-lived message shown over the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

/// A mouse button held down on a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPress {
    pub position: usize,
    /// The press turned into a drag
    pub dragging: bool,
}

/// Screen controller: owns the note sequence and mediates between the store
/// and the grid.
pub struct App {
    pub should_quit: bool,
    pub notes: Vec<Note>,
    pub selected: usize,
    pub store: Box<dyn NoteStore>,
    pub config: Config,
    pub bindings: Bindings,
    pub cells: CellCache,
    pub pending_invalidation: Option<Invalidation>,
    pub dialog: Option<NoteDialog>,
    pub pending_delete: Option<NoteId>,
    pub drag: Option<ActiveDrag>,
    pub press: Option<PointerPress>,
    pub trash: TrashTarget,
    pub toast: Option<Toast>,
    pub load_error: Option<String>,
    pub help_open: bool,
    // Hit-test areas recorded during render
    pub cell_areas: Vec<(Rect, usize)>,
    pub trash_area: Rect,
    pub add_button_area: Rect,
    pub scroll_row: usize,
}

impl App {
    /// Create a new App instance and load the notes
    pub fn new(store: Box<dyn NoteStore>, config: Config) -> Result<Self> {
        let bindings = config.bindings()?;
        let mut app = Self {
            should_quit: false,
            notes: Vec::new(),
            selected: 0,
            store,
            config,
            bindings,
            cells: CellCache::default(),
            pending_invalidation: None,
            dialog: None,
            pending_delete: None,
            drag: None,
            press: None,
            trash: TrashTarget::default(),
            toast: None,
            load_error: None,
            help_open: false,
            cell_areas: Vec::new(),
            trash_area: Rect::default(),
            add_button_area: Rect::default(),
            scroll_row: 0,
        };
        app.load_notes(None);
        Ok(app)
    }

    pub fn adapter(&self) -> NotesAdapter<'_> {
        NotesAdapter::new(&self.notes)
    }

    /// Replace the in-memory sequence with a fresh read of the store.
    ///
    /// With `changed`, only the first cell holding that id is invalidated;
    /// otherwise the whole grid is.
    pub fn load_notes(&mut self, changed: Option<NoteId>) {
        self.notes.clear();
        match self.store.list_all() {
            Ok(notes) => {
                self.notes = notes;
                self.load_error = None;
            }
            Err(e) => {
                error!("Failed to load notes: {}", e);
                self.load_error = Some(format!("Could not load notes: {}", e));
            }
        }

        let position = changed.and_then(|id| self.notes.iter().position(|n| n.id == id));
        match position {
            Some(position) => self.notify(Invalidation::Item(position)),
            None => self.notify(Invalidation::All),
        }

        if self.selected >= self.notes.len() {
            self.selected = self.notes.len().saturating_sub(1);
        }
    }

    /// Record that the grid is stale. Two different notices collapse to `All`.
    pub fn notify(&mut self, invalidation: Invalidation) {
        self.pending_invalidation = match self.pending_invalidation {
            None => Some(invalidation),
            Some(existing) if existing == invalidation => Some(existing),
            Some(_) => Some(Invalidation::All),
        };
    }

    /// Rebind whatever the pending invalidation names
    pub fn sync_cells(&mut self) {
        if let Some(invalidation) = self.pending_invalidation.take() {
            self.cells.apply(&NotesAdapter::new(&self.notes), invalidation);
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("Toast: {}", message);
        self.toast = Some(Toast {
            message,
            shown_at: Instant::now(),
        });
    }

    /// Drop the toast once it has been visible for the configured duration
    pub fn expire_toast(&mut self, now: Instant) {
        let duration: Duration = self.config.toast.duration();
        if let Some(toast) = &self.toast {
            if now.saturating_duration_since(toast.shown_at) >= duration {
                self.toast = None;
            }
        }
    }

    // =========================
    // Adapter callbacks
    // =========================

    pub fn gesture_at(&mut self, position: usize, gesture: CellGesture) {
        if let Some(event) = self.adapter().on_gesture(position, gesture) {
            self.selected = position;
            self.on_adapter_event(event);
        }
    }

    pub fn on_adapter_event(&mut self, event: AdapterEvent) {
        match event {
            AdapterEvent::Click(note) => self.open_edit_dialog(note),
            AdapterEvent::BeginDrag(payload) => {
                self.handle_drag(DragPhase::Started(payload));
            }
        }
    }

    // =========================
    // Dialogs
    // =========================

    pub fn open_add_dialog(&mut self) {
        self.dialog = Some(NoteDialog::create());
    }

    pub fn open_edit_dialog(&mut self, note: Note) {
        self.dialog = Some(NoteDialog::edit(note));
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Validate the open dialog and store it. Invalid input keeps the dialog
    /// open and never reaches the store.
    pub fn submit_dialog(&mut self) {
        let submission = match &self.dialog {
            Some(dialog) => dialog.submit(),
            None => return,
        };

        match submission {
            Err(message) => self.show_toast(message),
            Ok(DialogSubmission::Create(note)) => {
                self.add_note(&note);
                self.dialog = None;
            }
            Ok(DialogSubmission::Edit { id, title, body }) => {
                self.edit_note(id, &title, &body);
                self.dialog = None;
            }
        }
    }

    pub fn add_note(&mut self, note: &NewNote) {
        match self.store.create(note) {
            Ok(id) => {
                info!("Added note {}", id);
                self.load_notes(None);
            }
            Err(e) => {
                error!("Failed to add note: {}", e);
                self.show_toast(ADD_FAILED_MESSAGE);
            }
        }
    }

    pub fn edit_note(&mut self, id: NoteId, title: &str, body: &str) {
        match self.store.update(id, title, body) {
            Ok(0) => {
                warn!("Edit of note {} matched no rows", id);
                self.show_toast(EDIT_FAILED_MESSAGE);
            }
            Ok(_) => self.load_notes(Some(id)),
            Err(e) => {
                error!("Failed to edit note {}: {}", id, e);
                self.show_toast(EDIT_FAILED_MESSAGE);
            }
        }
    }

    // =========================
    // Drag and drop onto the bin
    // =========================

    /// Dispatch one drag phase to the trash target. Returns whether the
    /// phase was accepted.
    pub fn handle_drag(&mut self, phase: DragPhase) -> bool {
        match phase {
            DragPhase::Started(payload) => {
                let accepted = payload.has_mime_type(MIMETYPE_TEXT_PLAIN);
                if accepted {
                    self.drag = Some(ActiveDrag {
                        payload,
                        over_trash: false,
                    });
                } else {
                    debug!("Rejected drag with types {:?}", payload.mime_types);
                }
                accepted
            }
            DragPhase::Entered => {
                if self.drag.is_none() {
                    return false;
                }
                self.set_trash_hover(true);
                true
            }
            DragPhase::Location => true,
            DragPhase::Exited => {
                self.set_trash_hover(false);
                true
            }
            DragPhase::Drop(payload) => self.drop_into_bin(&payload),
            DragPhase::Ended => {
                self.drag = None;
                if self.trash.hovered {
                    self.trash.hovered = false;
                    self.trash.invalidate();
                }
                true
            }
        }
    }

    fn set_trash_hover(&mut self, hovered: bool) {
        self.trash.hovered = hovered;
        self.trash.invalidate();
        if let Some(drag) = &mut self.drag {
            drag.over_trash = hovered;
        }
    }

    /// Ask for confirmation before deleting the dropped note. A payload that
    /// is not an id is refused.
    fn drop_into_bin(&mut self, payload: &DragPayload) -> bool {
        match payload.note_id() {
            Some(id) => {
                self.pending_delete = Some(id);
                true
            }
            None => {
                warn!("Ignoring drop with malformed payload {:?}", payload.text);
                self.show_toast(BAD_PAYLOAD_MESSAGE);
                false
            }
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            self.delete_note(id);
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn delete_note(&mut self, id: NoteId) {
        match self.store.delete(id) {
            Ok(rows) if rows > 0 => {
                self.load_notes(None);
                self.show_toast(NOTE_DELETED_MESSAGE);
                self.trash.mark_full();
            }
            Ok(_) => {
                warn!("Delete of note {} matched no rows", id);
                self.show_toast(DELETE_FAILED_MESSAGE);
            }
            Err(e) => {
                error!("Failed to delete note {}: {}", id, e);
                self.show_toast(DELETE_FAILED_MESSAGE);
            }
        }
    }

    // =========================
    // Keyboard drag
    // =========================

    /// Long-press the selected cell
    pub fn pick_up_selected(&mut self) {
        if self.drag.is_none() {
            self.gesture_at(self.selected, CellGesture::LongPress);
        }
    }

    pub fn hover_bin(&mut self) {
        if matches!(&self.drag, Some(drag) if !drag.over_trash) {
            self.handle_drag(DragPhase::Entered);
        }
    }

    pub fn leave_bin(&mut self) {
        if matches!(&self.drag, Some(drag) if drag.over_trash) {
            self.handle_drag(DragPhase::Exited);
        }
    }

    /// Release the drag: drops into the bin when hovering it, then ends
    pub fn release_drag(&mut self) {
        let Some(drag) = self.drag.clone() else { return };
        if drag.over_trash {
            self.handle_drag(DragPhase::Drop(drag.payload));
        }
        self.handle_drag(DragPhase::Ended);
    }

    pub fn cancel_drag(&mut self) {
        self.leave_bin();
        if self.drag.is_some() {
            self.handle_drag(DragPhase::Ended);
        }
    }

    // =========================
    // Pointer input
    // =========================

    pub fn cell_at(&self, column: u16, row: u16) -> Option<usize> {
        let point = Position::new(column, row);
        self.cell_areas
            .iter()
            .find(|(rect, _)| rect.contains(point))
            .map(|(_, position)| *position)
    }

    pub fn pointer_down(&mut self, column: u16, row: u16) {
        if self.add_button_area.contains(Position::new(column, row)) {
            self.open_add_dialog();
            return;
        }
        if let Some(position) = self.cell_at(column, row) {
            self.selected = position;
            self.press = Some(PointerPress {
                position,
                dragging: false,
            });
        }
    }

    /// Pointer moved with the button held. The first move of a press is the
    /// long-press that starts the drag.
    pub fn pointer_drag(&mut self, column: u16, row: u16) {
        let Some(press) = self.press else { return };

        if !press.dragging {
            self.gesture_at(press.position, CellGesture::LongPress);
            if self.drag.is_none() {
                self.press = None;
                return;
            }
            self.press = Some(PointerPress {
                dragging: true,
                ..press
            });
        }

        let over = self.trash_area.contains(Position::new(column, row));
        let was_over = self.drag.as_ref().map(|d| d.over_trash).unwrap_or(false);
        let phase = match (was_over, over) {
            (false, true) => DragPhase::Entered,
            (true, false) => DragPhase::Exited,
            _ => DragPhase::Location,
        };
        self.handle_drag(phase);
    }

    pub fn pointer_up(&mut self, column: u16, row: u16) {
        let Some(press) = self.press.take() else { return };

        if press.dragging {
            if self.trash_area.contains(Position::new(column, row)) && !self.is_over_trash() {
                self.handle_drag(DragPhase::Entered);
            }
            self.release_drag();
        } else if self.cell_at(column, row) == Some(press.position) {
            self.gesture_at(press.position, CellGesture::Tap);
        }
    }

    pub fn is_over_trash(&self) -> bool {
        self.drag.as_ref().map(|d| d.over_trash).unwrap_or(false)
    }

    // =========================
    // Grid navigation
    // =========================

    fn columns(&self) -> usize {
        self.config.grid.columns.max(1) as usize
    }

    pub fn move_left(&mut self) {
        if self.selected % self.columns() > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_right(&mut self) {
        let last = self.notes.len().saturating_sub(1);
        if self.selected % self.columns() + 1 < self.columns() && self.selected < last {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected >= self.columns() {
            self.selected -= self.columns();
        }
    }

    pub fn move_down(&mut self) {
        let target = self.selected + self.columns();
        if target < self.notes.len() {
            self.selected = target;
        }
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notes.get(self.selected)
    }

    // =========================
    // Misc
    // =========================

    /// Handle tick events
    pub fn tick(&mut self) {
        self.expire_toast(Instant::now());
    }

    pub fn open_help(&mut self) {
        self.help_open = true;
    }

    pub fn close_help(&mut self) {
        self.help_open = false;
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
