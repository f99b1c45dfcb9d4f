use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported schema version {found} (this build supports up to {supported})")]
    UnsupportedSchemaVersion { found: i32, supported: i32 },
}

pub type Result<T> = std::result::Result<T, Error>;
