//! NoteStore — file-backed note storage
//!
//! Keys are note names, values are note text. Every operation validates the
//! name first and then maps to a single filesystem call where possible.

use notes_types::Note;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::error::{NoteError, NoteResult};
use super::file_ops;

/// Note store rooted at a single flat directory
pub struct NoteStore {
    notes_dir: PathBuf,
}

impl NoteStore {
    /// Create a note store, creating `notes_dir` if it does not exist yet
    pub fn new(notes_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let notes_dir = notes_dir.into();
        std::fs::create_dir_all(&notes_dir)?;
        Ok(Self { notes_dir })
    }

    /// Get the notes directory path
    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Validate `name` and resolve it to its backing file
    fn path_for(&self, name: &str) -> NoteResult<PathBuf> {
        file_ops::validate_note_name(name)?;
        Ok(file_ops::note_path(&self.notes_dir, name))
    }

    /// Create a new note. Fails with `AlreadyExists` if the name is taken.
    pub async fn create(&self, name: &str, text: &str) -> NoteResult<()> {
        let path = self.path_for(name)?;

        file_ops::write_new_note(&path, text)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => NoteError::AlreadyExists(name.to_string()),
                _ => NoteError::Storage(e),
            })?;

        log::debug!("[NOTES] Created note '{}' ({} bytes)", name, text.len());
        Ok(())
    }

    /// Read a note's full text
    pub async fn read(&self, name: &str) -> NoteResult<String> {
        let path = self.path_for(name)?;
        fs::read_to_string(&path)
            .await
            .map_err(|e| NoteError::from_io(name, e))
    }

    /// Replace the text of an existing note
    pub async fn update(&self, name: &str, text: &str) -> NoteResult<()> {
        let path = self.path_for(name)?;

        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| NoteError::from_io(name, e))?;
        if !metadata.is_file() {
            return Err(NoteError::Storage(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is not a regular file", path.display()),
            )));
        }

        file_ops::replace_note(&path, text).await?;

        log::debug!("[NOTES] Updated note '{}' ({} bytes)", name, text.len());
        Ok(())
    }

    /// Delete a note
    pub async fn delete(&self, name: &str) -> NoteResult<()> {
        let path = self.path_for(name)?;
        fs::remove_file(&path)
            .await
            .map_err(|e| NoteError::from_io(name, e))?;

        log::debug!("[NOTES] Deleted note '{}'", name);
        Ok(())
    }

    /// Check whether a note exists (its path is a regular file)
    pub async fn exists(&self, name: &str) -> NoteResult<bool> {
        let path = self.path_for(name)?;
        match fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(NoteError::Storage(e)),
        }
    }

    /// List every note with its text, sorted by name.
    ///
    /// Fails as a whole if any note cannot be read. A note deleted while the
    /// listing runs is left out.
    pub async fn list(&self) -> NoteResult<Vec<Note>> {
        let files = file_ops::list_note_files(&self.notes_dir).await?;

        let mut notes = Vec::with_capacity(files.len());
        for (name, path) in files {
            match fs::read_to_string(&path).await {
                Ok(text) => notes.push(Note { name, text }),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!("[NOTES] Note '{}' vanished during listing", name);
                }
                Err(e) => {
                    log::warn!("[NOTES] Failed to read note '{}': {}", name, e);
                    return Err(NoteError::Storage(e));
                }
            }
        }

        notes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(notes)
    }
}
