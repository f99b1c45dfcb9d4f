use crate::drag::DragPayload;
use dragnotes_core::models::{Note, NoteId};

/// What the owner has to repaint after the note sequence changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// Only the cell at this position changed
    Item(usize),
    /// Anything may have changed
    All,
}

/// Gestures a grid cell recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellGesture {
    Tap,
    LongPress,
}

/// What a gesture on a cell asks the owner to do
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterEvent {
    Click(Note),
    BeginDrag(DragPayload),
}

/// Content of one bound grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteCell<'a> {
    pub id: NoteId,
    pub title: &'a str,
    pub body: &'a str,
}

/// Maps grid positions onto the owner's current note sequence.
///
/// Borrows the sequence instead of copying it, so it always sees whatever the
/// owner last loaded.
pub struct NotesAdapter<'a> {
    notes: &'a [Note],
}

impl<'a> NotesAdapter<'a> {
    pub fn new(notes: &'a [Note]) -> Self {
        Self { notes }
    }

    pub fn item_count(&self) -> usize {
        self.notes.len()
    }

    /// Bind the cell at `position`
    pub fn bind(&self, position: usize) -> Option<NoteCell<'a>> {
        self.notes.get(position).map(|note| NoteCell {
            id: note.id,
            title: &note.title,
            body: &note.body,
        })
    }

    /// Translate a gesture on the cell at `position`
    pub fn on_gesture(&self, position: usize, gesture: CellGesture) -> Option<AdapterEvent> {
        let note = self.notes.get(position)?;
        let event = match gesture {
            CellGesture::Tap => AdapterEvent::Click(note.clone()),
            CellGesture::LongPress => AdapterEvent::BeginDrag(DragPayload::for_note(note)),
        };
        Some(event)
    }
}

/// Owned copy of a bound cell, kept by the grid between invalidations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundCell {
    pub id: NoteId,
    pub title: String,
    pub body: String,
}

impl From<NoteCell<'_>> for BoundCell {
    fn from(cell: NoteCell<'_>) -> Self {
        Self {
            id: cell.id,
            title: cell.title.to_string(),
            body: cell.body.to_string(),
        }
    }
}

/// Cells as last bound. Only rebinds what an invalidation names, so a
/// change the owner forgets to signal stays invisible.
#[derive(Debug, Default, Clone)]
pub struct CellCache {
    cells: Vec<BoundCell>,
}

impl CellCache {
    pub fn cells(&self) -> &[BoundCell] {
        &self.cells
    }

    pub fn apply(&mut self, adapter: &NotesAdapter<'_>, invalidation: Invalidation) {
        match invalidation {
            Invalidation::Item(position) if self.cells.len() == adapter.item_count() => {
                if let (Some(slot), Some(cell)) = (self.cells.get_mut(position), adapter.bind(position)) {
                    *slot = cell.into();
                }
            }
            // A single-item notice cannot describe a size change
            Invalidation::Item(_) | Invalidation::All => {
                self.cells = (0..adapter.item_count())
                    .filter_map(|position| adapter.bind(position))
                    .map(BoundCell::from)
                    .collect();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::MIMETYPE_TEXT_PLAIN;
    use dragnotes_core::models::NewNote;

    fn notes() -> Vec<Note> {
        vec![
            NewNote::new("First".to_string(), "one".to_string()).into_note(3),
            NewNote::new("Second".to_string(), "two".to_string()).into_note(8),
        ]
    }

    #[test]
    fn test_item_count_matches_sequence() {
        let notes = notes();
        assert_eq!(NotesAdapter::new(&notes).item_count(), 2);
        assert_eq!(NotesAdapter::new(&[]).item_count(), 0);
    }

    #[test]
    fn test_bind_reads_position() {
        let notes = notes();
        let adapter = NotesAdapter::new(&notes);

        let cell = adapter.bind(1).unwrap();
        assert_eq!(cell.id, 8);
        assert_eq!(cell.title, "Second");
        assert_eq!(cell.body, "two");
        assert!(adapter.bind(2).is_none());
    }

    #[test]
    fn test_tap_clicks_note() {
        let notes = notes();
        let adapter = NotesAdapter::new(&notes);

        match adapter.on_gesture(0, CellGesture::Tap) {
            Some(AdapterEvent::Click(note)) => assert_eq!(note.id, 3),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_long_press_begins_drag_with_id() {
        let notes = notes();
        let adapter = NotesAdapter::new(&notes);

        match adapter.on_gesture(1, CellGesture::LongPress) {
            Some(AdapterEvent::BeginDrag(payload)) => {
                assert_eq!(payload.text, "8");
                assert!(payload.has_mime_type(MIMETYPE_TEXT_PLAIN));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_cache_rebinds_only_named_item() {
        let mut notes = notes();
        let mut cache = CellCache::default();
        cache.apply(&NotesAdapter::new(&notes), Invalidation::All);
        assert_eq!(cache.cells().len(), 2);

        notes[0].title = "First, edited".to_string();
        notes[1].title = "Second, edited".to_string();
        cache.apply(&NotesAdapter::new(&notes), Invalidation::Item(1));

        assert_eq!(cache.cells()[0].title, "First");
        assert_eq!(cache.cells()[1].title, "Second, edited");
    }

    #[test]
    fn test_cache_item_notice_with_size_change_rebinds_all() {
        let mut notes = notes();
        let mut cache = CellCache::default();
        cache.apply(&NotesAdapter::new(&notes), Invalidation::All);

        notes.remove(0);
        cache.apply(&NotesAdapter::new(&notes), Invalidation::Item(0));
        assert_eq!(cache.cells().len(), 1);
        assert_eq!(cache.cells()[0].id, 8);
    }

    #[test]
    fn test_gesture_out_of_range() {
        let notes = notes();
        let adapter = NotesAdapter::new(&notes);
        assert!(adapter.on_gesture(5, CellGesture::Tap).is_none());
    }
}
