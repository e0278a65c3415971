//! Per-session context shared by the renderer, parser and differ.

use crate::model::Identity;
use std::fmt;

/// Options controlling how a document is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix the document with note lines explaining how to comment.
    pub usage_notes: bool,
    /// Editor modeline written as the last note (e.g. `vim: ft=diff`).
    pub modeline: Option<String>,
}

impl RenderOptions {
    /// Options used for interactive sessions: usage notes plus a vim modeline.
    pub fn interactive() -> Self {
        Self {
            usage_notes: true,
            modeline: Some("vim: ft=diff".to_string()),
        }
    }
}

/// Something odd found while reading a document or comparing two of them.
///
/// Warnings never stop a session; they are logged and kept so the caller can
/// show them once the session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Comment line with no diff line above it in the current hunk.
    OrphanComment { line: usize },
    /// Continuation line with no comment above it.
    OrphanContinuation { line: usize },
    /// Diff line before any hunk header.
    OrphanDiffLine { line: usize },
    /// `@@` line whose ranges could not be read.
    MalformedHunkHeader { line: usize },
    /// Hunk whose old/new line counts differ from its header, so the
    /// positions of its lines cannot be trusted. New comments in it are
    /// skipped.
    HunkLineCount {
        line: usize,
        expected: (u32, u32),
        found: (u32, u32),
        skipped: usize,
    },
    /// Edited comment tagged with an identity the original never had.
    UnknownIdentity { identity: Identity },
    /// Identity tag used by more than one edited comment.
    DuplicateIdentity { identity: Identity },
    /// Existing comment found under a different line than it was fetched on.
    MovedAnnotation { identity: Identity },
}

impl Warning {
    /// Whether text the reviewer wrote was left out of the edited model.
    pub fn drops_comments(&self) -> bool {
        match self {
            Warning::OrphanComment { .. } | Warning::OrphanContinuation { .. } => true,
            Warning::HunkLineCount { skipped, .. } => *skipped > 0,
            _ => false,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::OrphanComment { line } => {
                write!(f, "line {}: comment is not below a diff line, skipped", line)
            }
            Warning::OrphanContinuation { line } => {
                write!(f, "line {}: continuation is not below a comment, skipped", line)
            }
            Warning::OrphanDiffLine { line } => {
                write!(f, "line {}: diff line before any hunk header, skipped", line)
            }
            Warning::MalformedHunkHeader { line } => {
                write!(f, "line {}: unreadable hunk header, skipped", line)
            }
            Warning::HunkLineCount {
                line,
                expected,
                found,
                skipped,
            } => write!(
                f,
                "line {}: hunk has {} old and {} new line(s) but its header says {} and {}; \
                 {} new comment(s) in it skipped",
                line, found.0, found.1, expected.0, expected.1, skipped
            ),
            Warning::UnknownIdentity { identity } => {
                write!(f, "comment {} is unknown, posting it as a new comment", identity)
            }
            Warning::DuplicateIdentity { identity } => {
                write!(f, "comment {} appears twice, posting the copy as a new comment", identity)
            }
            Warning::MovedAnnotation { identity } => {
                write!(f, "comment {} was moved; existing comments stay on their line", identity)
            }
        }
    }
}

/// Explicit session state handed to the renderer, parser and differ.
#[derive(Debug, Clone, Default)]
pub struct ReviewContext {
    pub render: RenderOptions,
    warnings: Vec<Warning>,
}

impl ReviewContext {
    pub fn new(render: RenderOptions) -> Self {
        Self {
            render,
            warnings: Vec::new(),
        }
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Drain the recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_are_recorded_in_order() {
        let mut ctx = ReviewContext::default();
        ctx.warn(Warning::OrphanComment { line: 3 });
        ctx.warn(Warning::MalformedHunkHeader { line: 7 });

        assert_eq!(ctx.warnings().len(), 2);
        assert_eq!(
            ctx.warnings()[0].to_string(),
            "line 3: comment is not below a diff line, skipped"
        );

        let taken = ctx.take_warnings();
        assert_eq!(taken.len(), 2);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_dropping_warnings() {
        assert!(Warning::OrphanComment { line: 1 }.drops_comments());
        assert!(!Warning::MalformedHunkHeader { line: 1 }.drops_comments());

        let mismatch = Warning::HunkLineCount {
            line: 4,
            expected: (3, 3),
            found: (2, 2),
            skipped: 1,
        };
        assert!(mismatch.drops_comments());
        assert_eq!(
            mismatch.to_string(),
            "line 4: hunk has 2 old and 2 new line(s) but its header says 3 and 3; \
             1 new comment(s) in it skipped"
        );
        assert!(!Warning::HunkLineCount {
            line: 4,
            expected: (3, 3),
            found: (2, 2),
            skipped: 0,
        }
        .drops_comments());
    }

    #[test]
    fn test_interactive_options() {
        let options = RenderOptions::interactive();
        assert!(options.usage_notes);
        assert_eq!(options.modeline.as_deref(), Some("vim: ft=diff"));
        assert!(!RenderOptions::default().usage_notes);
    }
}
