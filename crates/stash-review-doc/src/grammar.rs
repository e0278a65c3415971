//! Line grammar of the review document.
//!
//! The renderer and the parser both go through this module, so every line the
//! renderer writes is classified back into the same thing by the parser.
//!
//! ```text
//! ~ note                     ignored on read (usage help, editor modeline)
//! --- a/src/main.rs          old file header, only before the first hunk
//! +++ b/src/main.rs          new file header, only before the first hunk
//! @@ -1,3 +1,4 @@ fn main    hunk header
//!  context line
//! -removed line
//! +added line
//! # a new comment
//! #[1234@2] an existing comment (id 1234, version 2)
//! #| second line of the comment above
//! ```
//!
//! An identity tag is only recognised when `[` directly follows `#`; a human
//! writing `# [x@y]` gets a new comment whose text starts with a bracket.

use crate::model::{Annotation, Hunk, Identity, LineKind};
use regex::Regex;
use std::sync::OnceLock;

pub const NOTE_MARKER: char = '~';
pub const COMMENT_MARKER: char = '#';
pub const CONTINUATION_MARKER: &str = "#|";
pub const OLD_FILE_PREFIX: &str = "--- ";
pub const NEW_FILE_PREFIX: &str = "+++ ";
pub const HUNK_HEADER_PREFIX: &str = "@@";

/// Classification of a single document line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocLine<'a> {
    Note(&'a str),
    OldFile(&'a str),
    NewFile(&'a str),
    HunkHeader(HunkHeader),
    /// Starts like a hunk header but the ranges could not be read.
    MalformedHunkHeader,
    Diff {
        kind: LineKind,
        content: &'a str,
    },
    Comment {
        identity: Option<Identity>,
        text: &'a str,
    },
    Continuation(&'a str),
    Blank,
    Unrecognized(&'a str),
}

/// Ranges and section heading read from an `@@` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub section: Option<String>,
}

impl HunkHeader {
    /// An empty hunk carrying these ranges.
    pub fn into_hunk(self) -> Hunk {
        Hunk {
            old_start: self.old_start,
            old_count: self.old_count,
            new_start: self.new_start,
            new_count: self.new_count,
            section: self.section,
            lines: Vec::new(),
        }
    }
}

/// Classify one line of the document.
///
/// File headers are only recognised while `in_hunk` is false; inside a hunk
/// `--- x` is a removed line whose content starts with `-- `.
pub fn classify(line: &str, in_hunk: bool) -> DocLine<'_> {
    if line.starts_with(NOTE_MARKER) {
        return DocLine::Note(strip_space(&line[NOTE_MARKER.len_utf8()..]));
    }

    if !in_hunk {
        if let Some(path) = line.strip_prefix(OLD_FILE_PREFIX) {
            return DocLine::OldFile(path.strip_prefix("a/").unwrap_or(path));
        }
        if let Some(path) = line.strip_prefix(NEW_FILE_PREFIX) {
            return DocLine::NewFile(path.strip_prefix("b/").unwrap_or(path));
        }
    }

    if line.starts_with(HUNK_HEADER_PREFIX) {
        return match parse_hunk_header(line) {
            Some(header) => DocLine::HunkHeader(header),
            None => DocLine::MalformedHunkHeader,
        };
    }

    let mut chars = line.chars();
    match chars.next() {
        Some(marker) => {
            if let Some(kind) = line_kind(marker) {
                return DocLine::Diff {
                    kind,
                    content: chars.as_str(),
                };
            }
            if marker == COMMENT_MARKER {
                return classify_comment(line);
            }
            if line.trim().is_empty() {
                DocLine::Blank
            } else {
                DocLine::Unrecognized(line)
            }
        }
        None => DocLine::Blank,
    }
}

fn line_kind(marker: char) -> Option<LineKind> {
    match marker {
        ' ' => Some(LineKind::Context),
        '+' => Some(LineKind::Added),
        '-' => Some(LineKind::Removed),
        _ => None,
    }
}

fn line_marker(kind: LineKind) -> char {
    match kind {
        LineKind::Context => ' ',
        LineKind::Added => '+',
        LineKind::Removed => '-',
    }
}

fn classify_comment(line: &str) -> DocLine<'_> {
    if let Some(rest) = line.strip_prefix(CONTINUATION_MARKER) {
        return DocLine::Continuation(strip_space(rest));
    }

    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = TAG_REGEX.get_or_init(|| {
        // #[id@version] text
        Regex::new(r"^#\[([^\s\[\]@]+)@([^\s\[\]@]+)\](.*)$").unwrap()
    });

    if let Some(captures) = re.captures(line) {
        if let (Some(id), Some(version), Some(text)) =
            (captures.get(1), captures.get(2), captures.get(3))
        {
            return DocLine::Comment {
                identity: Some(Identity::new(id.as_str(), version.as_str())),
                text: strip_space(text.as_str()),
            };
        }
    }

    DocLine::Comment {
        identity: None,
        text: strip_space(&line[COMMENT_MARKER.len_utf8()..]),
    }
}

fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = HEADER_REGEX.get_or_init(|| {
        // @@ -old_start[,old_count] +new_start[,new_count] @@[ section]
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@(?: (.*))?$").unwrap()
    });

    let captures = re.captures(line)?;
    let number = |idx: usize| -> Option<u32> {
        match captures.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            // Omitted count defaults to 1
            None => Some(1),
        }
    };

    Some(HunkHeader {
        old_start: captures.get(1)?.as_str().parse().ok()?,
        old_count: number(2)?,
        new_start: captures.get(3)?.as_str().parse().ok()?,
        new_count: number(4)?,
        section: captures.get(5).map(|m| m.as_str().to_string()),
    })
}

fn strip_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}

pub fn note_line(text: &str) -> String {
    if text.is_empty() {
        NOTE_MARKER.to_string()
    } else {
        format!("{} {}", NOTE_MARKER, text)
    }
}

pub fn old_file_line(path: &str) -> String {
    format!("{}a/{}", OLD_FILE_PREFIX, path)
}

pub fn new_file_line(path: &str) -> String {
    format!("{}b/{}", NEW_FILE_PREFIX, path)
}

pub fn hunk_header_line(hunk: &Hunk) -> String {
    let mut line = format!(
        "@@ -{},{} +{},{} @@",
        hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
    );
    if let Some(section) = &hunk.section {
        line.push(' ');
        line.push_str(section);
    }
    line
}

pub fn diff_line(kind: LineKind, content: &str) -> String {
    let mut line = String::with_capacity(content.len() + 1);
    line.push(line_marker(kind));
    line.push_str(content);
    line
}

/// Document lines for one annotation: the marker line carrying the first line
/// of text, then one continuation line per further line of text.
///
/// Identities whose tokens contain whitespace, brackets or `@` are written as
/// is but cannot be read back as a tag.
pub fn annotation_lines(annotation: &Annotation) -> Vec<String> {
    let mut text_lines = annotation.text.split('\n');
    let first = text_lines.next().unwrap_or_default();

    let mut marker = COMMENT_MARKER.to_string();
    if let Some(identity) = &annotation.identity {
        marker.push_str(&format!("[{}@{}]", identity.id, identity.version));
    }

    let mut lines = vec![join_marker(&marker, first)];
    lines.extend(text_lines.map(|text| join_marker(CONTINUATION_MARKER, text)));
    lines
}

fn join_marker(marker: &str, text: &str) -> String {
    if text.is_empty() {
        marker.to_string()
    } else {
        format!("{} {}", marker, text)
    }
}
