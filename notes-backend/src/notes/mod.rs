//! Notes system — plain-text notes stored one file per note
//!
//! Each note `name` lives at `<notes_dir>/<name>.txt` and the file holds the
//! note text verbatim. The HTTP controllers are the only callers.

pub mod error;
pub mod file_ops;
pub mod store;

pub use error::NoteError;
pub use store::NoteStore;
