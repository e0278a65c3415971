//! Line-oriented state machine reading a review document.

use super::ParseError;
use crate::context::{ReviewContext, Warning};
use crate::grammar::{self, DocLine};
use crate::model::{Annotation, DiffLine, DiffModel, Hunk, LineKind};

/// Parse a review document into a `DiffModel`.
///
/// Comment lines attach to the nearest diff line above them; notes, blank and
/// unrecognised lines are skipped without detaching them. Lines that cannot be
/// placed are skipped and recorded as warnings in `ctx`.
///
/// An empty line inside a hunk that still expects lines is read as an empty
/// context line whose leading space was trimmed by the editor. A hunk whose
/// line counts end up different from its header keeps its fetched comments
/// but loses its new ones, since their positions are off.
///
/// # Errors
/// `ParseError::MalformedDocument` when the document holds no hunk at all.
pub fn parse_document(ctx: &mut ReviewContext, text: &str) -> Result<DiffModel, ParseError> {
    let mut builder = DocumentBuilder::default();
    for (idx, line) in document_lines(text).into_iter().enumerate() {
        builder.feed(ctx, idx + 1, line);
    }
    builder.finish(ctx)
}

/// Lines of `text` without their `\n` terminators.
///
/// A document saved with `\r\n` after every line loses the `\r`s. Otherwise a
/// `\r` before `\n` is part of the line, as in diffs of CRLF files.
fn document_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }

    let breaks = text.matches('\n').count();
    let crlf = breaks > 0 && breaks == text.matches("\r\n").count();
    let body = text.strip_suffix('\n').unwrap_or(text);

    body.split('\n')
        .map(|line| match line.strip_suffix('\r') {
            Some(stripped) if crlf => stripped,
            _ => line,
        })
        .collect()
}

/// What a comment line read next would attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attach {
    Nothing,
    Line,
    Annotation,
}

/// Position inside the open hunk.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    /// Document line of the hunk header.
    header_line: usize,
    old_line: u32,
    new_line: u32,
    /// Lines the header announces that were not read yet.
    old_left: u32,
    new_left: u32,
}

impl Cursor {
    fn expects_context(&self) -> bool {
        self.old_left > 0 && self.new_left > 0
    }

    fn advance_old(&mut self) {
        self.old_line = self.old_line.saturating_add(1);
        self.old_left = self.old_left.saturating_sub(1);
    }

    fn advance_new(&mut self) {
        self.new_line = self.new_line.saturating_add(1);
        self.new_left = self.new_left.saturating_sub(1);
    }
}

#[derive(Debug)]
struct DocumentBuilder {
    old_path: Option<String>,
    new_path: Option<String>,
    hunks: Vec<Hunk>,
    /// `None` before the first hunk and after an unreadable hunk header.
    cursor: Option<Cursor>,
    attach: Attach,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            old_path: None,
            new_path: None,
            hunks: Vec::new(),
            cursor: None,
            attach: Attach::Nothing,
        }
    }
}

impl DocumentBuilder {
    fn feed(&mut self, ctx: &mut ReviewContext, line_no: usize, line: &str) {
        let in_hunk = !self.hunks.is_empty();

        match grammar::classify(line, in_hunk) {
            DocLine::Blank
                if line.is_empty() && self.cursor.is_some_and(|c| c.expects_context()) =>
            {
                log::debug!("line {}: reading empty line as context", line_no);
                self.push_line(ctx, line_no, LineKind::Context, "");
            }
            DocLine::Note(_) | DocLine::Blank => {}
            DocLine::Unrecognized(text) => {
                log::debug!("line {}: ignoring {:?}", line_no, text);
            }
            DocLine::OldFile(path) => self.old_path = Some(path.to_string()),
            DocLine::NewFile(path) => self.new_path = Some(path.to_string()),
            DocLine::HunkHeader(header) => {
                self.close_hunk(ctx);
                self.cursor = Some(Cursor {
                    header_line: line_no,
                    old_line: header.old_start,
                    new_line: header.new_start,
                    old_left: header.old_count,
                    new_left: header.new_count,
                });
                self.hunks.push(header.into_hunk());
                self.attach = Attach::Nothing;
            }
            DocLine::MalformedHunkHeader => {
                self.close_hunk(ctx);
                ctx.warn(Warning::MalformedHunkHeader { line: line_no });
                self.attach = Attach::Nothing;
            }
            DocLine::Diff { kind, content } => self.push_line(ctx, line_no, kind, content),
            DocLine::Comment { identity, text } => {
                if self.attach == Attach::Nothing {
                    ctx.warn(Warning::OrphanComment { line: line_no });
                    return;
                }
                if let Some(line) = self.current_line() {
                    line.annotations.push(Annotation {
                        text: text.to_string(),
                        identity,
                    });
                    self.attach = Attach::Annotation;
                }
            }
            DocLine::Continuation(text) => {
                if self.attach != Attach::Annotation {
                    ctx.warn(Warning::OrphanContinuation { line: line_no });
                    return;
                }
                if let Some(annotation) = self
                    .current_line()
                    .and_then(|line| line.annotations.last_mut())
                {
                    annotation.text.push('\n');
                    annotation.text.push_str(text);
                }
            }
        }
    }

    fn push_line(&mut self, ctx: &mut ReviewContext, line_no: usize, kind: LineKind, content: &str) {
        let (Some(cursor), Some(hunk)) = (self.cursor.as_mut(), self.hunks.last_mut()) else {
            ctx.warn(Warning::OrphanDiffLine { line: line_no });
            self.attach = Attach::Nothing;
            return;
        };

        let line = match kind {
            LineKind::Context => {
                let line = DiffLine::context(content, cursor.old_line, cursor.new_line);
                cursor.advance_old();
                cursor.advance_new();
                line
            }
            LineKind::Added => {
                let line = DiffLine::added(content, cursor.new_line);
                cursor.advance_new();
                line
            }
            LineKind::Removed => {
                let line = DiffLine::removed(content, cursor.old_line);
                cursor.advance_old();
                line
            }
        };

        hunk.lines.push(line);
        self.attach = Attach::Line;
    }

    /// Check the open hunk against its header.
    fn close_hunk(&mut self, ctx: &mut ReviewContext) {
        let (Some(cursor), Some(hunk)) = (self.cursor.take(), self.hunks.last_mut()) else {
            return;
        };

        let found = line_counts(hunk);
        let expected = (hunk.old_count, hunk.new_count);
        if found == expected {
            return;
        }

        let mut skipped = 0;
        for line in &mut hunk.lines {
            let before = line.annotations.len();
            line.annotations.retain(|annotation| !annotation.is_new());
            skipped += before - line.annotations.len();
        }

        ctx.warn(Warning::HunkLineCount {
            line: cursor.header_line,
            expected,
            found,
            skipped,
        });
    }

    fn current_line(&mut self) -> Option<&mut DiffLine> {
        self.hunks.last_mut().and_then(|hunk| hunk.lines.last_mut())
    }

    fn finish(mut self, ctx: &mut ReviewContext) -> Result<DiffModel, ParseError> {
        self.close_hunk(ctx);

        if self.hunks.is_empty() {
            return Err(ParseError::MalformedDocument(
                "no hunks found in the document".to_string(),
            ));
        }

        let path = self.new_path.or(self.old_path).unwrap_or_default();
        Ok(DiffModel {
            path,
            hunks: self.hunks,
        })
    }
}

/// Old and new side line counts of the lines read into `hunk`.
fn line_counts(hunk: &Hunk) -> (u32, u32) {
    hunk.lines.iter().fold((0, 0), |(old, new), line| match line.kind() {
        LineKind::Context => (old + 1, new + 1),
        LineKind::Added => (old, new + 1),
        LineKind::Removed => (old + 1, new),
    })
}
