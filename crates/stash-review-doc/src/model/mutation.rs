//! Comment operations produced by comparing two documents.

use super::{Identity, LineAnchor};
use std::fmt;

/// One change to replay against the review service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Post a new comment on the anchored line.
    Create { anchor: LineAnchor, text: String },
    /// Replace the text of an existing comment. The identity carries the
    /// version token observed when the review was fetched.
    Update { identity: Identity, text: String },
    /// Remove an existing comment.
    Delete { identity: Identity },
}

impl Mutation {
    /// The existing comment this mutation targets, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Mutation::Create { .. } => None,
            Mutation::Update { identity, .. } | Mutation::Delete { identity } => Some(identity),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Create { anchor, .. } => write!(f, "create comment on {}", anchor),
            Mutation::Update { identity, .. } => write!(f, "update comment {}", identity),
            Mutation::Delete { identity } => write!(f, "delete comment {}", identity),
        }
    }
}
