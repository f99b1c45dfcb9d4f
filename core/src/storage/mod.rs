mod database;
mod note_repository;
mod note_store;

pub use database::{Connection, Database, SCHEMA_VERSION};
pub use note_repository::NoteRepository;
pub use note_store::{NoteStore, SqliteNoteStore};
