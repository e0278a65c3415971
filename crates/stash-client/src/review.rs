//! Binds a client to one file of one pull request, so that a review session
//! can fetch it and replay mutations on it.

use crate::client::{StashClient, StashError};
use crate::reference::PullRequestRef;
use async_trait::async_trait;
use stash_review_doc::{
    ApplyError, DiffModel, DiffSource, FetchError, Identity, Mutation, MutationApplier,
};

/// A file under review in a pull request.
pub struct StashReview<'a, C: StashClient + ?Sized> {
    client: &'a C,
    pr: &'a PullRequestRef,
    path: &'a str,
}

impl<'a, C: StashClient + ?Sized> StashReview<'a, C> {
    pub fn new(client: &'a C, pr: &'a PullRequestRef, path: &'a str) -> Self {
        Self { client, pr, path }
    }
}

#[async_trait]
impl<'a, C: StashClient + ?Sized> DiffSource for StashReview<'a, C> {
    async fn fetch_diff(&self, path: &str) -> Result<DiffModel, FetchError> {
        match self.client.fetch_diff(self.pr, path).await {
            Ok(model) => Ok(model),
            Err(StashError::NotFound(_)) => Err(FetchError::NotFound(path.to_string())),
            Err(e) => Err(FetchError::Failed(e.to_string())),
        }
    }
}

#[async_trait]
impl<'a, C: StashClient + ?Sized> MutationApplier for StashReview<'a, C> {
    async fn apply(&self, mutation: &Mutation) -> Result<Option<Identity>, ApplyError> {
        let result = match mutation {
            Mutation::Create { anchor, text } => self
                .client
                .create_comment(self.pr, self.path, anchor, text)
                .await
                .map(Some),
            Mutation::Update { identity, text } => self
                .client
                .update_comment(self.pr, identity, text)
                .await
                .map(|_| None),
            Mutation::Delete { identity } => self
                .client
                .delete_comment(self.pr, identity)
                .await
                .map(|_| None),
        };

        result.map_err(|e| apply_error(mutation, e))
    }
}

fn apply_error(mutation: &Mutation, error: StashError) -> ApplyError {
    match (error, mutation.identity()) {
        (StashError::Conflict(_), Some(identity)) => ApplyError::VersionConflict(identity.clone()),
        (
            e @ (StashError::Unauthorized(_)
            | StashError::NotFound(_)
            | StashError::Status { .. }
            | StashError::InvalidAnchor(_)
            | StashError::InvalidIdentity(_)
            | StashError::Conflict(_)),
            _,
        ) => ApplyError::Rejected(e.to_string()),
        (e, _) => ApplyError::Failed(e.to_string()),
    }
}
