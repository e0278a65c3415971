//! Review comments attached to diff lines.

use std::fmt;

/// Remote identity of a comment that already exists on the review service.
///
/// Both parts are opaque tokens: the service assigns the `id`, and the
/// `version` is the optimistic-concurrency token it expects back on every
/// update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub id: String,
    pub version: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}

/// A reviewer comment on a single diff line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Comment body. May span several lines.
    pub text: String,
    /// Present only for comments that exist remotely.
    pub identity: Option<Identity>,
}

impl Annotation {
    /// Create a comment authored locally (not yet known to the service).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            identity: None,
        }
    }

    /// Create a comment fetched from the service.
    pub fn existing(
        id: impl Into<String>,
        version: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            identity: Some(Identity::new(id, version)),
        }
    }

    /// Whether this comment was authored during the current session.
    pub fn is_new(&self) -> bool {
        self.identity.is_none()
    }
}
