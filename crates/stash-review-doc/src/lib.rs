//! # stash-review-doc
//!
//! Review comments on a pull request diff as a plain text document.
//!
//! A file's diff and its comments are rendered into a document the reviewer
//! edits in any text editor. The edited document is parsed back and compared
//! with the fetched one; the differences become [`Mutation`]s that an
//! implementation of [`MutationApplier`] sends to the review service.
//!
//! ## Document format
//!
//! ```text
//! ~ notes are ignored
//! --- a/src/lib.rs
//! +++ b/src/lib.rs
//! @@ -10,3 +10,4 @@ impl Foo {
//!  context line
//! -removed line
//! #[17@2] an existing comment on the removed line
//! +added line
//! # a new comment
//! #| spanning two lines
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stash_review_doc::{diff_models, parse_document, render_document, ReviewContext};
//!
//! let mut ctx = ReviewContext::default();
//! let text = render_document(&ctx, &fetched);
//! // ... the user edits `text` ...
//! let edited = parse_document(&mut ctx, &text)?;
//! for mutation in diff_models(&mut ctx, &fetched, &edited) {
//!     println!("{}", mutation);
//! }
//! ```
//!
//! [`ReviewSession`] runs the whole round against the trait boundaries in
//! [`traits`].

pub mod apply;
pub mod context;
pub mod differ;
pub mod grammar;
pub mod model;
pub mod parser;
pub mod render;
pub mod session;
pub mod traits;

pub use apply::{apply_all, ApplyReport, FailedMutation};
pub use context::{RenderOptions, ReviewContext, Warning};
pub use differ::diff_models;
pub use model::{Annotation, DiffLine, DiffModel, Hunk, Identity, LineAnchor, LineKind, Mutation};
pub use parser::{parse_document, ParseError};
pub use render::render_document;
pub use session::{ReviewSession, SessionError, SessionOutcome};
pub use traits::{
    ApplyError, DiffSource, DryRunApplier, Editor, EditorExit, FetchError, MutationApplier,
};
