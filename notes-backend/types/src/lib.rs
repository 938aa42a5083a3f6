//! Shared types for the notes service HTTP API and its clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Request Types
// =====================================================

/// Form submitted to `POST /write` to create a note.
///
/// The upload form sends this as `multipart/form-data`; scripted clients may
/// send it urlencoded instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteForm {
    /// Name of the note (becomes `<name>.txt` on disk)
    pub note_name: String,
    /// Note text, stored verbatim
    #[serde(default)]
    pub note: String,
}

// =====================================================
// Domain Types
// =====================================================

/// A named text note as returned by `GET /notes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub name: String,
    pub text: String,
}

impl Note {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}
