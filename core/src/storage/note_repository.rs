use crate::models::{datetime_to_iso, iso_to_datetime, NewNote, Note, NoteId};
use crate::{Error, Result};
use rusqlite::{params, Connection, Row};

pub struct NoteRepository;

impl NoteRepository {
    /// Insert a note and return the identifier SQLite assigned to it
    pub fn create(conn: &Connection, note: &NewNote) -> Result<NoteId> {
        conn.execute(
            "INSERT INTO NotesTable (title, note, timeStamp) VALUES (?1, ?2, ?3)",
            params![note.title, note.body, datetime_to_iso(&note.created_at)],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a note by ID
    pub fn get_by_id(conn: &Connection, id: NoteId) -> Result<Note> {
        let mut stmt = conn.prepare(
            "SELECT _id, title, note, timeStamp FROM NotesTable WHERE _id = ?1"
        )?;

        stmt.query_row(params![id], Self::from_row).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound(format!("Note not found: {}", id)),
            other => Error::Database(other),
        })
    }

    /// Get all notes in storage order
    pub fn get_all(conn: &Connection) -> Result<Vec<Note>> {
        let mut stmt = conn.prepare("SELECT _id, title, note, timeStamp FROM NotesTable")?;

        let notes = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    /// Update title and body, returning the number of rows affected
    pub fn update(conn: &Connection, id: NoteId, title: &str, body: &str) -> Result<usize> {
        let rows_affected = conn.execute(
            "UPDATE NotesTable SET title = ?1, note = ?2 WHERE _id = ?3",
            params![title, body, id],
        )?;
        Ok(rows_affected)
    }

    /// Delete a note, returning the number of rows affected
    pub fn delete(conn: &Connection, id: NoteId) -> Result<usize> {
        let rows_affected = conn.execute("DELETE FROM NotesTable WHERE _id = ?1", params![id])?;
        Ok(rows_affected)
    }

    /// Count total notes
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM NotesTable", [], |row| row.get(0))?;
        Ok(count)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
        let title: Option<String> = row.get(1)?;
        let body: Option<String> = row.get(2)?;
        let created_at: Option<String> = row.get(3)?;
        Ok(Note {
            id: row.get(0)?,
            title: title.unwrap_or_default(),
            body: body.unwrap_or_default(),
            created_at: iso_to_datetime(created_at.as_deref().unwrap_or_default()),
        })
    }
}
