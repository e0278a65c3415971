//! Stash API data transfer objects
//!
//! These types represent what the commands display about a pull request.
//! They are intentionally separate from the wire format in [`crate::wire`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pull request state, as used for filtering listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestState {
    #[default]
    Open,
    Merged,
    Declined,
}

impl PullRequestState {
    /// Value of the `state` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            PullRequestState::Open => "OPEN",
            PullRequestState::Merged => "MERGED",
            PullRequestState::Declined => "DECLINED",
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// A pull request from the Stash API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR id within the repository (e.g., 123)
    pub id: u64,

    /// PR title
    pub title: String,

    /// PR description
    pub description: Option<String>,

    pub state: PullRequestState,

    /// Author's display name
    pub author: String,

    /// Source branch name without the `refs/heads/` prefix
    pub from_branch: String,

    /// When the PR was last updated
    pub updated_at: DateTime<Utc>,
}

/// A file touched by a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path in the destination revision (source path for deletions)
    pub path: String,

    /// Change type as reported by Stash (`ADD`, `MODIFY`, `DELETE`, `MOVE`, ...)
    pub change_type: String,

    /// Executable bit in the destination revision
    pub executable: bool,

    /// Executable bit in the source revision
    pub src_executable: bool,
}

impl ChangedFile {
    /// `+x` or `-x` when the change flips the executable bit.
    pub fn exec_flag(&self) -> Option<&'static str> {
        match (self.src_executable, self.executable) {
            (false, true) => Some("+x"),
            (true, false) => Some("-x"),
            _ => None,
        }
    }
}
