//! Parse edited review documents back into diff models.

mod document;

pub use document::parse_document;

use thiserror::Error;

/// Errors that can occur while reading a review document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing usable was left in the document, typically because it was
    /// emptied in the editor.
    #[error("Malformed review document: {0}")]
    MalformedDocument(String),
}
