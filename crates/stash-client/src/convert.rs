//! Conversions between the Stash wire format and the review models.

use crate::types::{ChangedFile, PullRequest, PullRequestState};
use crate::wire;
use chrono::{DateTime, Utc};
use stash_review_doc::{Annotation, DiffLine, DiffModel, Hunk, LineAnchor, LineKind};
use std::collections::HashMap;

/// Build the model of one file from a diff response.
///
/// Comments are attached to every line listing their id, in the order the
/// line lists them, with `\r\n` line breaks turned into `\n`. A response
/// without diffs gives an empty model.
pub fn diff_model(path: &str, response: wire::DiffResponse) -> DiffModel {
    let Some(diff) = response.diffs.into_iter().next() else {
        return DiffModel::new(path);
    };

    let model_path = diff
        .destination
        .as_ref()
        .or(diff.source.as_ref())
        .map(|p| p.to_string.clone())
        .unwrap_or_else(|| path.to_string());

    let comments: HashMap<u64, &wire::Comment> =
        diff.line_comments.iter().map(|c| (c.id, c)).collect();

    let mut model = DiffModel::new(model_path);
    for hunk in &diff.hunks {
        let mut converted = Hunk::new(
            hunk.source_line,
            hunk.source_span,
            hunk.destination_line,
            hunk.destination_span,
        );

        for segment in &hunk.segments {
            for line in &segment.lines {
                let mut diff_line = match segment.kind {
                    wire::SegmentType::Context => {
                        DiffLine::context(line.line.as_str(), line.source, line.destination)
                    }
                    wire::SegmentType::Added => DiffLine::added(line.line.as_str(), line.destination),
                    wire::SegmentType::Removed => DiffLine::removed(line.line.as_str(), line.source),
                };

                for id in &line.comment_ids {
                    match comments.get(id) {
                        Some(comment) => diff_line.annotations.push(Annotation::existing(
                            comment.id.to_string(),
                            comment.version.to_string(),
                            comment.text.replace("\r\n", "\n"),
                        )),
                        None => log::debug!("comment {} is not part of the response", id),
                    }
                }

                converted.lines.push(diff_line);
            }
        }

        model.hunks.push(converted);
    }

    model
}

/// Anchor for posting a comment on a line of `path`.
///
/// Removed lines are addressed by their number in the source revision, all
/// others by their number in the destination revision.
pub fn comment_anchor<'a>(path: &'a str, anchor: &LineAnchor) -> Option<wire::CommentAnchor<'a>> {
    let (line_type, file_type) = match anchor.kind {
        LineKind::Context => (wire::SegmentType::Context, wire::FileType::To),
        LineKind::Added => (wire::SegmentType::Added, wire::FileType::To),
        LineKind::Removed => (wire::SegmentType::Removed, wire::FileType::From),
    };

    Some(wire::CommentAnchor {
        line: anchor.line()?,
        line_type,
        file_type,
        path,
        src_path: path,
    })
}

pub fn changed_file(change: wire::Change) -> ChangedFile {
    let path = if change.kind == "DELETE" {
        change.src_path.unwrap_or(change.path)
    } else {
        change.path
    };

    ChangedFile {
        path: path.to_string,
        change_type: change.kind,
        executable: change.executable,
        src_executable: change.src_executable,
    }
}

pub fn pull_request(pr: wire::PullRequest) -> PullRequest {
    let state = match pr.state.as_str() {
        "MERGED" => PullRequestState::Merged,
        "DECLINED" => PullRequestState::Declined,
        _ => PullRequestState::Open,
    };

    let from_branch = pr.from_ref.display_id.unwrap_or_else(|| {
        pr.from_ref
            .id
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string()
    });

    PullRequest {
        id: pr.id,
        title: pr.title,
        description: pr.description.filter(|d| !d.is_empty()),
        state,
        author: pr.author.user.display_name.unwrap_or(pr.author.user.name),
        from_branch,
        updated_at: DateTime::<Utc>::from_timestamp_millis(pr.updated_date).unwrap_or_default(),
    }
}
