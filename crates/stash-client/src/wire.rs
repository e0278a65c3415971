//! JSON shapes of the Stash REST API (`/rest/api/1.0`).
//!
//! Only the fields this crate reads are declared; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};

/// A page of a paged listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub values: Vec<T>,
    #[serde(default = "default_true")]
    pub is_last_page: bool,
    pub next_page_start: Option<u64>,
}

fn default_true() -> bool {
    true
}

/// Response of `GET .../pull-requests/<id>/diff/<path>`.
#[derive(Debug, Default, Deserialize)]
pub struct DiffResponse {
    #[serde(default)]
    pub diffs: Vec<FileDiff>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    pub source: Option<PathInfo>,
    pub destination: Option<PathInfo>,
    #[serde(default)]
    pub hunks: Vec<DiffHunk>,
    /// Comments on lines of this file; lines refer to them by id.
    #[serde(default)]
    pub line_comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathInfo {
    #[serde(rename = "toString")]
    pub to_string: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
    pub source_line: u32,
    pub source_span: u32,
    pub destination_line: u32,
    pub destination_span: u32,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
pub struct Segment {
    #[serde(rename = "type")]
    pub kind: SegmentType,
    #[serde(default)]
    pub lines: Vec<SegmentLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentType {
    Context,
    Added,
    Removed,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentLine {
    pub source: u32,
    pub destination: u32,
    pub line: String,
    #[serde(default)]
    pub comment_ids: Vec<u64>,
}

/// A comment as returned by the comments and diff endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub version: u64,
    #[serde(default)]
    pub text: String,
}

/// Body of `POST .../comments`.
#[derive(Debug, Serialize)]
pub struct NewComment<'a> {
    pub text: &'a str,
    pub anchor: CommentAnchor<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAnchor<'a> {
    pub line: u32,
    pub line_type: SegmentType,
    pub file_type: FileType,
    pub path: &'a str,
    pub src_path: &'a str,
}

/// Side of the diff a line number refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    From,
    To,
}

/// Body of `PUT .../comments/<id>`.
#[derive(Debug, Serialize)]
pub struct EditComment<'a> {
    pub text: &'a str,
    pub version: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub path: PathInfo,
    pub src_path: Option<PathInfo>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub executable: bool,
    #[serde(default)]
    pub src_executable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub state: String,
    pub author: Participant,
    pub from_ref: Ref,
    /// Milliseconds since the Unix epoch.
    pub updated_date: i64,
}

#[derive(Debug, Deserialize)]
pub struct Participant {
    pub user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ref {
    pub id: String,
    pub display_id: Option<String>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}
