//! Trait for handing a document to the user for editing.

use std::io;
use std::path::Path;

/// How the editor process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorExit {
    Success,
    /// Non-zero exit status, or `None` when killed by a signal.
    Failed(Option<i32>),
}

impl EditorExit {
    pub fn is_success(&self) -> bool {
        matches!(self, EditorExit::Success)
    }
}

/// Opens a file for editing and blocks until the user is done.
pub trait Editor {
    /// # Errors
    /// Returns an I/O error when the editor could not be started at all.
    fn edit(&self, path: &Path) -> io::Result<EditorExit>;
}
