//! Bitbucket Server (Stash) pull request client
//!
//! This crate provides a trait-based client for the parts of the Stash REST
//! API a reviewer needs: file diffs with line comments, changed files, pull
//! request listings and comment create/update/delete.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              StashClient trait                   │
//! │  - fetch_diff() / fetch_changes()                │
//! │  - fetch_pull_requests()                         │
//! │  - create/update/delete_comment()                │
//! └─────────────────────────────────────────────────┘
//!          │                              │
//!          ▼                              ▼
//! ┌──────────────────────┐     ┌─────────────────────────┐
//! │ OctocrabStashClient  │     │ StashReview             │
//! │ (HTTP, basic auth)   │     │ (DiffSource +           │
//! └──────────────────────┘     │  MutationApplier)       │
//!                              └─────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use stash_client::{OctocrabStashClient, PullRequestRef, StashClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pr = PullRequestRef::parse(
//!     "https://stash.example.com/projects/CORE/repos/api/pull-requests/17",
//!     None,
//!     None,
//! )?;
//! let client = OctocrabStashClient::with_basic_auth(&pr.repo.host, "jdoe", "secret")?;
//! for file in client.fetch_changes(&pr).await? {
//!     println!("{} {}", file.change_type, file.path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod convert;
pub mod octocrab_client;
pub mod reference;
pub mod review;
pub mod types;
pub mod wire;

pub use client::{StashClient, StashError};
pub use octocrab_client::OctocrabStashClient;
pub use reference::{PullRequestRef, ReferenceError, RepoRef, URL_EXAMPLE};
pub use review::StashReview;
pub use types::{ChangedFile, PullRequest, PullRequestState};
