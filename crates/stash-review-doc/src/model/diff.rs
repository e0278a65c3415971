//! Diff data structures for the file under review.

use super::Annotation;
use std::fmt;

/// The reviewed file: its path and the hunks of the change, with comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffModel {
    /// Path of the file relative to the repository root.
    pub path: String,
    /// Change hunks, in file order.
    pub hunks: Vec<Hunk>,
}

impl DiffModel {
    /// Create an empty model for the given path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hunks: Vec::new(),
        }
    }

    /// Append a hunk (builder style).
    pub fn with_hunk(mut self, hunk: Hunk) -> Self {
        self.hunks.push(hunk);
        self
    }

    /// An empty model means the path is not part of the reviewed change.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// All diff lines in document order.
    pub fn lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.hunks.iter().flat_map(|h| h.lines.iter())
    }

    /// All annotations in document order (hunk, line, then order on the line),
    /// each paired with the line it is attached to.
    pub fn annotations(&self) -> impl Iterator<Item = (&DiffLine, &Annotation)> {
        self.lines()
            .flat_map(|line| line.annotations.iter().map(move |a| (line, a)))
    }

    pub fn annotation_count(&self) -> usize {
        self.lines().map(|l| l.annotations.len()).sum()
    }
}

/// A contiguous region of changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// Old file starting line.
    pub old_start: u32,
    /// Number of lines in old version.
    pub old_count: u32,
    /// New file starting line.
    pub new_start: u32,
    /// Number of lines in new version.
    pub new_count: u32,
    /// Text after the closing `@@` of the header, usually the enclosing function.
    pub section: Option<String>,
    /// Lines in this hunk.
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Create an empty hunk with the given header ranges.
    pub fn new(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> Self {
        Self {
            old_start,
            old_count,
            new_start,
            new_count,
            section: None,
            lines: Vec::new(),
        }
    }

    /// Set the section heading shown after the header.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Append a line (builder style).
    pub fn with_line(mut self, line: DiffLine) -> Self {
        self.lines.push(line);
        self
    }
}

/// Line type in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Unchanged line.
    Context,
    /// Added line (+).
    Added,
    /// Removed line (-).
    Removed,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Context => "context",
            LineKind::Added => "added",
            LineKind::Removed => "removed",
        };
        f.write_str(name)
    }
}

/// A single line in the diff.
///
/// Kind, text and position are fixed at construction; only the attached
/// annotations change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    kind: LineKind,
    content: String,
    old_line: Option<u32>,
    new_line: Option<u32>,
    /// Comments on this line, in display order.
    pub annotations: Vec<Annotation>,
}

impl DiffLine {
    /// Create a new context line.
    pub fn context(content: impl Into<String>, old_line: u32, new_line: u32) -> Self {
        Self::with_position(LineKind::Context, content, Some(old_line), Some(new_line))
    }

    /// Create a new added line.
    pub fn added(content: impl Into<String>, new_line: u32) -> Self {
        Self::with_position(LineKind::Added, content, None, Some(new_line))
    }

    /// Create a new removed line.
    pub fn removed(content: impl Into<String>, old_line: u32) -> Self {
        Self::with_position(LineKind::Removed, content, Some(old_line), None)
    }

    fn with_position(
        kind: LineKind,
        content: impl Into<String>,
        old_line: Option<u32>,
        new_line: Option<u32>,
    ) -> Self {
        Self {
            kind,
            content: content.into(),
            old_line,
            new_line,
            annotations: Vec::new(),
        }
    }

    /// Attach a comment (builder style).
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Line content without the leading marker.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Line number in the old file (context and removed lines).
    pub fn old_line(&self) -> Option<u32> {
        self.old_line
    }

    /// Line number in the new file (context and added lines).
    pub fn new_line(&self) -> Option<u32> {
        self.new_line
    }

    /// Where a comment on this line is anchored.
    pub fn anchor(&self) -> LineAnchor {
        LineAnchor {
            kind: self.kind,
            old_line: self.old_line,
            new_line: self.new_line,
        }
    }
}

/// Target of a newly created comment: the kind and position of a diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineAnchor {
    pub kind: LineKind,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
}

impl LineAnchor {
    /// The line number on the side the comment belongs to: the old file for
    /// removed lines, the new file otherwise.
    pub fn line(&self) -> Option<u32> {
        match self.kind {
            LineKind::Removed => self.old_line,
            LineKind::Added | LineKind::Context => self.new_line,
        }
    }
}

impl fmt::Display for LineAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line() {
            Some(line) => write!(f, "{} line {}", self.kind, line),
            None => write!(f, "{} line ?", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DiffModel {
        DiffModel::new("src/main.rs").with_hunk(
            Hunk::new(1, 3, 1, 3)
                .with_line(DiffLine::context("fn main() {", 1, 1))
                .with_line(
                    DiffLine::removed("    old();", 2)
                        .with_annotation(Annotation::existing("1", "0", "why?")),
                )
                .with_line(
                    DiffLine::added("    new();", 2)
                        .with_annotation(Annotation::existing("2", "1", "nice"))
                        .with_annotation(Annotation::new("agreed")),
                )
                .with_line(DiffLine::context("}", 3, 3)),
        )
    }

    #[test]
    fn test_diff_line_kinds() {
        let ctx = DiffLine::context("unchanged", 5, 6);
        assert_eq!(ctx.kind(), LineKind::Context);
        assert_eq!(ctx.old_line(), Some(5));
        assert_eq!(ctx.new_line(), Some(6));

        let add = DiffLine::added("new line", 10);
        assert_eq!(add.kind(), LineKind::Added);
        assert_eq!(add.old_line(), None);
        assert_eq!(add.new_line(), Some(10));

        let del = DiffLine::removed("removed line", 8);
        assert_eq!(del.kind(), LineKind::Removed);
        assert_eq!(del.old_line(), Some(8));
        assert_eq!(del.new_line(), None);
    }

    #[test]
    fn test_anchor_line_follows_side() {
        assert_eq!(DiffLine::removed("x", 8).anchor().line(), Some(8));
        assert_eq!(DiffLine::added("x", 9).anchor().line(), Some(9));
        assert_eq!(DiffLine::context("x", 4, 7).anchor().line(), Some(7));
    }

    #[test]
    fn test_annotations_in_document_order() {
        let model = sample();
        let texts: Vec<&str> = model.annotations().map(|(_, a)| a.text.as_str()).collect();
        assert_eq!(texts, vec!["why?", "nice", "agreed"]);
        assert_eq!(model.annotation_count(), 3);

        let (line, _) = model.annotations().nth(1).unwrap();
        assert_eq!(line.content(), "    new();");
    }

    #[test]
    fn test_empty_model() {
        assert!(DiffModel::new("missing.rs").is_empty());
        assert!(!sample().is_empty());
    }
}
