use std::io;
use thiserror::Error;

/// Failure kinds surfaced by the note store
#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Invalid note name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Note already exists: {0}")]
    AlreadyExists(String),
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),
}

pub type NoteResult<T> = Result<T, NoteError>;

impl NoteError {
    /// Classify an I/O error for `name`: absence becomes `NotFound`,
    /// anything else is a storage failure.
    pub fn from_io(name: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => NoteError::NotFound(name.to_string()),
            _ => NoteError::Storage(err),
        }
    }
}
