use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row identifier assigned by the store
pub type NoteId = i64;

/// A note that has been stored and has an identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A note that has not been stored yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewNote {
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl NewNote {
    /// Create a new note stamped with the current instant
    pub fn new(title: String, body: String) -> Self {
        Self {
            title,
            body,
            created_at: Utc::now(),
        }
    }

    /// Attach the identifier the store assigned
    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id,
            title: self.title,
            body: self.body,
            created_at: self.created_at,
        }
    }
}

impl Note {
    /// Text carried by a drag of this note
    pub fn payload_text(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_creation() {
        let note = NewNote::new("Groceries".to_string(), "milk, eggs".to_string());
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.body, "milk, eggs");
    }

    #[test]
    fn test_into_note_keeps_fields() {
        let draft = NewNote::new("Title".to_string(), "Body".to_string());
        let created_at = draft.created_at;
        let note = draft.into_note(7);
        assert_eq!(note.id, 7);
        assert_eq!(note.title, "Title");
        assert_eq!(note.created_at, created_at);
    }

    #[test]
    fn test_payload_text_is_decimal_id() {
        let note = NewNote::new("a".to_string(), "b".to_string()).into_note(42);
        assert_eq!(note.payload_text(), "42");
    }
}
