//! Octocrab-based Stash API client
//!
//! Implementation of the `StashClient` trait on top of octocrab's raw HTTP
//! methods. Octocrab only provides transport and basic authentication here;
//! every URL is absolute and every body is Stash's own JSON.

use crate::client::{StashClient, StashError};
use crate::convert;
use crate::reference::{PullRequestRef, RepoRef};
use crate::types::{ChangedFile, PullRequest, PullRequestState};
use crate::wire;
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use stash_review_doc::{DiffModel, Identity, LineAnchor};
use std::sync::Arc;

/// Upper bound on pages fetched for one listing.
const MAX_PAGES: usize = 20;

/// Stash API client using octocrab as HTTP transport
#[derive(Debug, Clone)]
pub struct OctocrabStashClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabStashClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Build a client for `host` authenticating with user and password.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_basic_auth(host: &str, user: &str, password: &str) -> Result<Self, StashError> {
        let octocrab = Octocrab::builder()
            .base_uri(host)?
            .basic_auth(user.to_string(), password.to_string())
            .build()?;
        Ok(Self::new(Arc::new(octocrab)))
    }

    async fn get_json<T: DeserializeOwned>(&self, uri: String) -> Result<T, StashError> {
        debug!("GET {}", uri);
        let response = self.octocrab._get(uri.as_str()).await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;
        let body = check_status(status, body, &uri)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Collect every value of a paged listing, starting at `start = 0`.
    async fn get_paged<T, F>(&self, page_url: F) -> Result<Vec<T>, StashError>
    where
        T: DeserializeOwned,
        F: Fn(u64) -> String + Send + Sync,
    {
        let mut values = Vec::new();
        let mut start = 0;

        for _ in 0..MAX_PAGES {
            let page: wire::Page<T> = self.get_json(page_url(start)).await?;
            values.extend(page.values);
            match page.next_page_start {
                Some(next) if !page.is_last_page => start = next,
                _ => return Ok(values),
            }
        }

        log::warn!("listing truncated after {} pages", MAX_PAGES);
        Ok(values)
    }
}

#[async_trait]
impl StashClient for OctocrabStashClient {
    async fn fetch_diff(&self, pr: &PullRequestRef, path: &str) -> Result<DiffModel, StashError> {
        debug!("Fetching diff of {} in {}", path, pr);

        let response: wire::DiffResponse = match self.get_json(pr.diff_url(path)?).await {
            Ok(response) => response,
            // Stash answers 404 for paths outside the change.
            Err(StashError::NotFound(message)) => {
                debug!("{}: {}", path, message);
                wire::DiffResponse::default()
            }
            Err(e) => return Err(e),
        };

        let model = convert::diff_model(path, response);
        debug!(
            "Fetched {} hunk(s) with {} comment(s) for {}",
            model.hunks.len(),
            model.annotation_count(),
            path
        );
        Ok(model)
    }

    async fn fetch_changes(&self, pr: &PullRequestRef) -> Result<Vec<ChangedFile>, StashError> {
        debug!("Fetching changed files of {}", pr);

        let changes: Vec<wire::Change> = self.get_paged(|start| pr.changes_url(start)).await?;
        Ok(changes.into_iter().map(convert::changed_file).collect())
    }

    async fn fetch_pull_requests(
        &self,
        repo: &RepoRef,
        state: PullRequestState,
    ) -> Result<Vec<PullRequest>, StashError> {
        debug!("Fetching {} PRs for {}", state, repo);

        let prs: Vec<wire::PullRequest> = self
            .get_paged(|start| repo.pull_requests_url(state.as_param(), start))
            .await?;

        debug!("Fetched {} PRs for {}", prs.len(), repo);
        Ok(prs.into_iter().map(convert::pull_request).collect())
    }

    async fn create_comment(
        &self,
        pr: &PullRequestRef,
        path: &str,
        anchor: &LineAnchor,
        text: &str,
    ) -> Result<Identity, StashError> {
        let body = wire::NewComment {
            text,
            anchor: convert::comment_anchor(path, anchor)
                .ok_or(StashError::InvalidAnchor(*anchor))?,
        };

        let uri = pr.comments_url();
        debug!("POST {} ({})", uri, anchor);
        let response = self.octocrab._post(uri.as_str(), Some(&body)).await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;
        let body = check_status(status, body, &uri)?;

        let comment: wire::Comment = serde_json::from_str(&body)?;
        Ok(comment_identity(&comment))
    }

    async fn update_comment(
        &self,
        pr: &PullRequestRef,
        identity: &Identity,
        text: &str,
    ) -> Result<Identity, StashError> {
        let body = wire::EditComment {
            text,
            version: numeric_version(identity)?,
        };

        let uri = pr.comment_url(&identity.id, &identity.version);
        debug!("PUT {}", uri);
        let response = self.octocrab._put(uri.as_str(), Some(&body)).await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;
        let body = check_status(status, body, &uri)?;

        let comment: wire::Comment = serde_json::from_str(&body)?;
        Ok(comment_identity(&comment))
    }

    async fn delete_comment(&self, pr: &PullRequestRef, identity: &Identity) -> Result<(), StashError> {
        numeric_version(identity)?;

        let uri = pr.comment_url(&identity.id, &identity.version);
        debug!("DELETE {}", uri);
        let response = self.octocrab._delete(uri.as_str(), None::<&()>).await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;
        check_status(status, body, &uri)?;
        Ok(())
    }
}

/// Pass 2xx bodies through; turn anything else into an error carrying the
/// first message Stash reported.
fn check_status(status: u16, body: String, uri: &str) -> Result<String, StashError> {
    if (200..300).contains(&status) {
        return Ok(body);
    }

    let message = serde_json::from_str::<wire::ErrorResponse>(&body)
        .ok()
        .and_then(|e| e.errors.into_iter().next())
        .map(|e| e.message)
        .unwrap_or_else(|| uri.to_string());
    debug!("HTTP {} for {}: {}", status, uri, message);
    Err(StashError::from_status(status, message))
}

fn numeric_version(identity: &Identity) -> Result<u64, StashError> {
    identity
        .version
        .parse()
        .map_err(|_| StashError::InvalidIdentity(identity.clone()))
}

fn comment_identity(comment: &wire::Comment) -> Identity {
    Identity::new(comment.id.to_string(), comment.version.to_string())
}
