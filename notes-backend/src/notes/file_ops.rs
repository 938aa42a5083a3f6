//! File operations for notes system
//!
//! Handles the name → file mapping, name validation, and the create/replace
//! primitives the store is built on.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::error::{NoteError, NoteResult};

/// Extension of every note file (without the dot)
pub const NOTE_EXTENSION: &str = "txt";

/// Longest accepted note name in bytes; `<name>.txt` must fit a 255-byte filename
pub const MAX_NAME_LEN: usize = 255 - NOTE_EXTENSION.len() - 1;

/// Validate a note name before it is turned into a path.
///
/// Every store operation goes through this guard, so a name that passes can
/// only ever resolve to a file directly inside the notes directory.
pub fn validate_note_name(name: &str) -> NoteResult<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative path segment")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else if name.contains('\0') {
        Some("name contains a NUL byte")
    } else if name.len() > MAX_NAME_LEN {
        Some("name is too long")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(NoteError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Path of the file backing `name` (the name must already be validated)
pub fn note_path(notes_dir: &Path, name: &str) -> PathBuf {
    notes_dir.join(format!("{}.{}", name, NOTE_EXTENSION))
}

/// Recover a note name from a file name, e.g. "groceries.txt" -> "groceries"
pub fn note_name_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(NOTE_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .filter(|s| !s.is_empty())
}

/// Create a note file, failing with `AlreadyExists` if it is already present.
///
/// The check and the creation are one `create_new` open. If the content
/// cannot be written the half-created file is removed again.
pub async fn write_new_note(path: &Path, content: &str) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;

    let written = async {
        file.write_all(content.as_bytes()).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(file);
        fs::remove_file(path).await.ok();
        return Err(e);
    }
    Ok(())
}

/// Replace the whole content of a note file.
///
/// Content goes to a hidden temp file in the same directory which is then
/// renamed over the target, so readers see either the old or the new text.
pub async fn replace_note(path: &Path, content: &str) -> io::Result<()> {
    let tmp_path = temp_path_for(path);

    let replaced = async {
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, path).await
    }
    .await;

    // a failed write can leave a partial temp file behind as well
    if let Err(e) = replaced {
        fs::remove_file(&tmp_path).await.ok();
        return Err(e);
    }
    Ok(())
}

/// Temp file next to `path`. Never ends in the note extension.
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = format!(".note-{}.tmp", Uuid::new_v4().simple());
    match path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// List `(name, path)` for every note file directly inside `notes_dir`.
///
/// Symlinks are followed like a read would follow them. Directories, dangling
/// links, non-note files and names that are not UTF-8 are skipped.
pub async fn list_note_files(notes_dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    let mut read_dir = fs::read_dir(notes_dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let file_type = entry.file_type().await?;
        let is_file = if file_type.is_symlink() {
            fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
        } else {
            file_type.is_file()
        };
        if !is_file {
            continue;
        }

        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            log::warn!(
                "[NOTES] Skipping non UTF-8 file name in {}: {:?}",
                notes_dir.display(),
                entry.file_name()
            );
            continue;
        };

        if let Some(name) = note_name_from_file_name(file_name) {
            files.push((name.to_string(), entry.path()));
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn assert_invalid(name: &str) {
        match validate_note_name(name) {
            Err(NoteError::InvalidName { .. }) => {}
            other => panic!("expected InvalidName for {:?}, got {:?}", name, other),
        }
    }

    #[test]
    fn test_validate_note_name() {
        assert!(validate_note_name("groceries").is_ok());
        assert!(validate_note_name("with spaces and ünïcode").is_ok());
        assert!(validate_note_name(".hidden").is_ok());
        assert!(validate_note_name("a..b").is_ok());

        assert_invalid("");
        assert_invalid(".");
        assert_invalid("..");
        assert_invalid("../secret");
        assert_invalid("nested/name");
        assert_invalid("..\\secret");
        assert_invalid("nul\0byte");
        assert_invalid(&"x".repeat(MAX_NAME_LEN + 1));
        assert!(validate_note_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_note_path() {
        let path = note_path(Path::new("/tmp/notes"), "todo");
        assert_eq!(path, PathBuf::from("/tmp/notes/todo.txt"));
    }

    #[test]
    fn test_note_name_from_file_name() {
        assert_eq!(note_name_from_file_name("todo.txt"), Some("todo"));
        assert_eq!(note_name_from_file_name("archive.tar.txt"), Some("archive.tar"));
        assert_eq!(note_name_from_file_name(".txt"), None);
        assert_eq!(note_name_from_file_name("todo.md"), None);
        assert_eq!(note_name_from_file_name("todotxt"), None);
        assert_eq!(note_name_from_file_name(".note-abc.tmp"), None);
    }

    #[tokio::test]
    async fn test_write_new_note_refuses_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");

        write_new_note(&path, "first").await.unwrap();
        let err = write_new_note(&path, "second").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
    }

    #[tokio::test]
    async fn test_replace_note_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "a much longer original text").unwrap();

        replace_note(&path, "short").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_note_failure_removes_temp_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("blocked.txt");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("inner"), "keeps the directory non-empty").unwrap();

        assert!(replace_note(&target, "new text").await.is_err());

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("blocked.txt")]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_note_files_follows_symlinks() {
        let dir = tempdir().unwrap();
        let notes_dir = dir.path().join("notes");
        std::fs::create_dir(&notes_dir).unwrap();
        std::fs::write(dir.path().join("target"), "linked").unwrap();
        std::os::unix::fs::symlink(dir.path().join("target"), notes_dir.join("linked.txt"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), notes_dir.join("dangling.txt"))
            .unwrap();

        let names: Vec<String> = list_note_files(&notes_dir)
            .await
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["linked"]);
    }

    #[tokio::test]
    async fn test_list_note_files_filters_entries() {
        let dir = tempdir().unwrap();
        let notes_dir = dir.path();

        std::fs::write(notes_dir.join("one.txt"), "1").unwrap();
        std::fs::write(notes_dir.join("two.txt"), "2").unwrap();
        std::fs::write(notes_dir.join("readme.md"), "ignored").unwrap();
        std::fs::write(notes_dir.join(".note-123.tmp"), "ignored").unwrap();
        std::fs::create_dir(notes_dir.join("dir.txt")).unwrap();

        let mut names: Vec<String> = list_note_files(notes_dir)
            .await
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["one", "two"]);
    }
}
