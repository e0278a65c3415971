//! Data models for a reviewed file and the changes made to its comments.

mod annotation;
mod diff;
mod mutation;

pub use annotation::{Annotation, Identity};
pub use diff::{DiffLine, DiffModel, Hunk, LineAnchor, LineKind};
pub use mutation::Mutation;
