use dragnotes_core::models::{NewNote, Note, NoteId};

pub const MISSING_FIELDS_MESSAGE: &str = "Please provide a note title and note body";

#[derive(Debug, Clone, PartialEq)]
pub enum DialogMode {
    Create,
    Edit(Note),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Title,
    Body,
}

/// What a valid submit asks the controller to store
#[derive(Debug, Clone, PartialEq)]
pub enum DialogSubmission {
    Create(NewNote),
    Edit { id: NoteId, title: String, body: String },
}

/// Form for adding a note or editing an existing one
#[derive(Debug, Clone)]
pub struct NoteDialog {
    pub mode: DialogMode,
    pub title: String,
    pub body: String,
    pub focus: DialogField,
    /// Cursor position in chars within the focused field
    pub cursor: usize,
}

impl NoteDialog {
    pub fn create() -> Self {
        Self {
            mode: DialogMode::Create,
            title: String::new(),
            body: String::new(),
            focus: DialogField::Title,
            cursor: 0,
        }
    }

    /// Pre-filled with the note's current text
    pub fn edit(note: Note) -> Self {
        let title = note.title.clone();
        let body = note.body.clone();
        let cursor = title.chars().count();
        Self {
            mode: DialogMode::Edit(note),
            title,
            body,
            focus: DialogField::Title,
            cursor,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, DialogMode::Edit(_))
    }

    pub fn heading(&self) -> &'static str {
        if self.is_edit() {
            " Edit note "
        } else {
            " Add a new note "
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Save"
        } else {
            "Add"
        }
    }

    pub fn focused_text(&self) -> &str {
        match self.focus {
            DialogField::Title => &self.title,
            DialogField::Body => &self.body,
        }
    }

    fn focused_text_mut(&mut self) -> &mut String {
        match self.focus {
            DialogField::Title => &mut self.title,
            DialogField::Body => &mut self.body,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            DialogField::Title => DialogField::Body,
            DialogField::Body => DialogField::Title,
        };
        self.cursor = self.focused_text().chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        let text = self.focused_text_mut();
        let byte_pos = text.char_indices().map(|(i, _)| i).nth(cursor).unwrap_or(text.len());
        text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let cursor = self.cursor;
        let text = self.focused_text_mut();
        if let Some(from) = text.char_indices().map(|(i, _)| i).nth(cursor - 1) {
            text.remove(from);
            self.cursor -= 1;
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.focused_text().chars().count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.focused_text().chars().count();
    }

    fn fields_empty(&self) -> bool {
        self.title.is_empty() || self.body.is_empty()
    }

    /// Validate and turn the form into a store request.
    ///
    /// Returns the instruction message when either field is empty; the dialog
    /// stays as it is so the user can fix it.
    pub fn submit(&self) -> Result<DialogSubmission, &'static str> {
        if self.fields_empty() {
            return Err(MISSING_FIELDS_MESSAGE);
        }

        let submission = match &self.mode {
            DialogMode::Edit(note) => DialogSubmission::Edit {
                id: note.id,
                title: self.title.clone(),
                body: self.body.clone(),
            },
            DialogMode::Create => {
                DialogSubmission::Create(NewNote::new(self.title.clone(), self.body.clone()))
            }
        };
        Ok(submission)
    }
}
