use super::{Database, NoteRepository};
use crate::models::{NewNote, Note, NoteId};
use crate::Result;
use log::{debug, info};
use std::path::Path;

/// Persistence boundary between the notes screen and wherever notes live.
///
/// `update` and `delete` report rows affected; `0` means no note had that
/// id, and callers decide whether that is an error.
pub trait NoteStore {
    fn create(&self, note: &NewNote) -> Result<NoteId>;
    fn update(&self, id: NoteId, title: &str, body: &str) -> Result<usize>;
    fn delete(&self, id: NoteId) -> Result<usize>;
    /// Every stored note, in whatever order the backing store yields them
    fn list_all(&self) -> Result<Vec<Note>>;
}

/// SQLite-backed store that opens a fresh connection for every call
pub struct SqliteNoteStore {
    db: Database,
}

impl SqliteNoteStore {
    /// Open (creating or upgrading if needed) the database at `db_path`
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db = Database::new(db_path);
        db.open()?;
        Ok(Self { db })
    }

    pub fn path(&self) -> &Path {
        self.db.path()
    }
}

impl NoteStore for SqliteNoteStore {
    fn create(&self, note: &NewNote) -> Result<NoteId> {
        let conn = self.db.connect()?;
        let id = NoteRepository::create(&conn, note)?;
        info!("Stored note {}", id);
        Ok(id)
    }

    fn update(&self, id: NoteId, title: &str, body: &str) -> Result<usize> {
        let conn = self.db.connect()?;
        let rows = NoteRepository::update(&conn, id, title, body)?;
        info!("Updated note {} ({} rows)", id, rows);
        Ok(rows)
    }

    fn delete(&self, id: NoteId) -> Result<usize> {
        let conn = self.db.connect()?;
        let rows = NoteRepository::delete(&conn, id)?;
        info!("Deleted note {} ({} rows)", id, rows);
        Ok(rows)
    }

    fn list_all(&self) -> Result<Vec<Note>> {
        let conn = self.db.connect()?;
        let notes = NoteRepository::get_all(&conn)?;
        debug!("Loaded {} notes", notes.len());
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup_store() -> (tempfile::TempDir, SqliteNoteStore) {
        let dir = tempdir().unwrap();
        let store = SqliteNoteStore::open(dir.path().join("notes.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_groceries_lifecycle() {
        let (_dir, store) = setup_store();

        let draft = NewNote::new("Groceries".to_string(), "milk, eggs".to_string());
        let id = store.create(&draft).unwrap();

        let notes = store.list_all().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, id);
        assert_eq!(notes[0].title, "Groceries");
        assert_eq!(notes[0].body, "milk, eggs");
        let created_at = notes[0].created_at;

        assert_eq!(store.update(id, "Groceries", "milk, eggs, bread").unwrap(), 1);
        let notes = store.list_all().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, id);
        assert_eq!(notes[0].body, "milk, eggs, bread");
        assert_eq!(notes[0].created_at, created_at);

        assert_eq!(store.delete(id).unwrap(), 1);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_all_tracks_surviving_records() {
        let (_dir, store) = setup_store();
        assert_eq!(store.list_all().unwrap().len(), 0);

        let ids: Vec<NoteId> = (0..5)
            .map(|i| {
                let draft = NewNote::new(format!("title {}", i), format!("body {}", i));
                store.create(&draft).unwrap()
            })
            .collect();
        assert_eq!(store.list_all().unwrap().len(), 5);

        store.delete(ids[1]).unwrap();
        store.delete(ids[3]).unwrap();

        let remaining: Vec<NoteId> = store.list_all().unwrap().iter().map(|n| n.id).collect();
        assert_eq!(remaining.len(), 3);
        assert!(!remaining.contains(&ids[1]));
        assert!(!remaining.contains(&ids[3]));
    }

    #[test]
    fn test_delete_unknown_id_returns_zero() {
        let (_dir, store) = setup_store();
        store
            .create(&NewNote::new("a".to_string(), "b".to_string()))
            .unwrap();

        assert_eq!(store.delete(404).unwrap(), 0);
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.db");

        let id = {
            let store = SqliteNoteStore::open(&path).unwrap();
            store
                .create(&NewNote::new("persist".to_string(), "me".to_string()))
                .unwrap()
        };

        let store = SqliteNoteStore::open(&path).unwrap();
        let notes = store.list_all().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, id);
    }

    #[test]
    fn test_list_all_reports_broken_database() {
        let (_dir, store) = setup_store();
        let conn = store.db.connect().unwrap();
        conn.execute_batch("DROP TABLE NotesTable;").unwrap();
        drop(conn);

        assert!(store.list_all().is_err());
    }
}
