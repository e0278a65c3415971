//! Boundaries to the collaborators of a review session.

mod diff_source;
mod editor;
mod mutation_applier;

pub use diff_source::{DiffSource, FetchError};
pub use editor::{Editor, EditorExit};
pub use mutation_applier::{ApplyError, DryRunApplier, MutationApplier};
