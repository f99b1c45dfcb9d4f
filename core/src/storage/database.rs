use crate::{Error, Result};
use log::{debug, info};
use rusqlite::Connection as SqliteConnection;
use std::path::{Path, PathBuf};

pub type Connection = SqliteConnection;

/// Version written to `PRAGMA user_version` once the schema is in place
pub const SCHEMA_VERSION: i32 = 1;

/// Database manager for the notes file
pub struct Database {
    db_path: PathBuf,
}

impl Database {
    /// Create a new database manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Get a connection to an existing database
    pub fn connect(&self) -> Result<Connection> {
        let conn = SqliteConnection::open(&self.db_path)?;
        Ok(conn)
    }

    /// Create a new database and initialize it with the schema
    pub fn create(&self) -> Result<Connection> {
        // Ensure parent directory exists
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = SqliteConnection::open(&self.db_path)?;
        self.initialize_schema(&conn)?;
        info!("Created notes database at {}", self.db_path.display());

        Ok(conn)
    }

    /// Initialize the database schema
    fn initialize_schema(&self, conn: &Connection) -> Result<()> {
        let schema = include_str!("../../schema.sql");
        conn.execute_batch(schema)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(())
    }

    /// Check if the database exists
    pub fn exists(&self) -> bool {
        self.db_path.exists()
    }

    /// Open the database, creating or upgrading the schema when needed
    pub fn open(&self) -> Result<Connection> {
        if self.db_path.is_dir() {
            return Err(Error::InvalidInput(format!(
                "{} is a directory, not a database file",
                self.db_path.display()
            )));
        }
        if !self.exists() {
            return self.create();
        }

        let conn = self.connect()?;
        let version = self.get_schema_version(&conn)?;
        debug!("Opened {} at schema version {}", self.db_path.display(), version);

        if version == 0 {
            self.initialize_schema(&conn)?;
        } else if version < SCHEMA_VERSION {
            self.migrate(&conn, version, SCHEMA_VERSION)?;
        } else if version > SCHEMA_VERSION {
            return Err(Error::UnsupportedSchemaVersion {
                found: version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(conn)
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Upgrade by dropping the notes table and recreating it empty
    pub fn migrate(&self, conn: &Connection, from_version: i32, to_version: i32) -> Result<()> {
        info!("Upgrading notes schema from {} to {}; existing notes are dropped", from_version, to_version);
        conn.execute_batch("DROP TABLE IF EXISTS NotesTable;")?;
        self.initialize_schema(conn)
    }

    /// Get the current schema version
    pub fn get_schema_version(&self, conn: &Connection) -> Result<i32> {
        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version)
    }
}
