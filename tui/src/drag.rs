use dragnotes_core::models::{Note, NoteId};

/// MIME type advertised by note drags
pub const MIMETYPE_TEXT_PLAIN: &str = "text/plain";

/// Clip carried by a drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub mime_types: Vec<String>,
    pub text: String,
}

impl DragPayload {
    /// Plain-text clip holding the note's decimal id
    pub fn for_note(note: &Note) -> Self {
        Self::plain_text(note.payload_text())
    }

    pub fn plain_text(text: impl Into<String>) -> Self {
        Self {
            mime_types: vec![MIMETYPE_TEXT_PLAIN.to_string()],
            text: text.into(),
        }
    }

    pub fn has_mime_type(&self, mime_type: &str) -> bool {
        self.mime_types.iter().any(|m| m == mime_type)
    }

    /// Parse the clip text back into a note id
    pub fn note_id(&self) -> Option<NoteId> {
        self.text.trim().parse().ok()
    }
}

/// Phases reported to the trash target while a drag is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPhase {
    Started(DragPayload),
    Entered,
    Location,
    Exited,
    Drop(DragPayload),
    Ended,
}

/// The bin notes get dropped into
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrashTarget {
    /// A drag is currently hovering the bin
    pub hovered: bool,
    /// At least one note has been deleted this session
    pub is_full: bool,
    /// Needs repainting
    pub dirty: bool,
}

impl TrashTarget {
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn mark_full(&mut self) {
        if !self.is_full {
            self.is_full = true;
            self.invalidate();
        }
    }
}

/// Bookkeeping for the drag in progress, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag {
    pub payload: DragPayload,
    pub over_trash: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragnotes_core::models::NewNote;

    #[test]
    fn test_payload_for_note() {
        let note = NewNote::new("t".to_string(), "b".to_string()).into_note(17);
        let payload = DragPayload::for_note(&note);
        assert!(payload.has_mime_type(MIMETYPE_TEXT_PLAIN));
        assert_eq!(payload.text, "17");
        assert_eq!(payload.note_id(), Some(17));
    }

    #[test]
    fn test_malformed_payload_has_no_id() {
        assert_eq!(DragPayload::plain_text("seventeen").note_id(), None);
        assert_eq!(DragPayload::plain_text("").note_id(), None);
        assert_eq!(DragPayload::plain_text("1.5").note_id(), None);
    }

    #[test]
    fn test_other_mime_type() {
        let payload = DragPayload {
            mime_types: vec!["image/png".to_string()],
            text: "3".to_string(),
        };
        assert!(!payload.has_mime_type(MIMETYPE_TEXT_PLAIN));
    }

    #[test]
    fn test_mark_full_only_once_dirty() {
        let mut trash = TrashTarget::default();
        trash.mark_full();
        assert!(trash.is_full);
        assert!(trash.dirty);

        trash.dirty = false;
        trash.mark_full();
        assert!(!trash.dirty);
    }
}
