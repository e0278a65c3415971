//! Replay a list of mutations against a `MutationApplier`.

use crate::model::{Identity, Mutation};
use crate::traits::{ApplyError, MutationApplier};
use std::fmt;

/// A mutation that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedMutation {
    /// Position in the applied list, starting at 0.
    pub index: usize,
    pub mutation: Mutation,
    pub error: ApplyError,
}

impl fmt::Display for FailedMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}: {}", self.index + 1, self.mutation, self.error)
    }
}

/// Outcome of applying a list of mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub total: usize,
    pub applied: usize,
    /// Identities assigned to created comments, in creation order.
    pub created: Vec<Identity>,
    /// Version conflicts, which do not stop the run.
    pub conflicts: Vec<FailedMutation>,
    /// The failure that stopped the run, if any.
    pub halted: Option<FailedMutation>,
}

impl ApplyReport {
    /// Mutations never attempted because the run halted.
    pub fn remaining(&self) -> usize {
        match &self.halted {
            Some(failed) => self.total - failed.index - 1,
            None => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.conflicts.is_empty() && self.halted.is_none()
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "applied {} of {} change(s)", self.applied, self.total)?;
        if !self.conflicts.is_empty() {
            write!(f, ", {} conflict(s)", self.conflicts.len())?;
        }
        if let Some(failed) = &self.halted {
            write!(f, ", stopped at {} with {} remaining", failed, self.remaining())?;
        }
        Ok(())
    }
}

/// Apply `mutations` in order.
///
/// A version conflict is recorded and the run continues; any other error
/// stops it. Mutations applied before a failure stay in effect.
pub async fn apply_all<A>(applier: &A, mutations: &[Mutation]) -> ApplyReport
where
    A: MutationApplier + ?Sized,
{
    let mut report = ApplyReport {
        total: mutations.len(),
        ..ApplyReport::default()
    };

    for (index, mutation) in mutations.iter().enumerate() {
        log::info!("({}/{}) applying {}", index + 1, report.total, mutation);

        match applier.apply(mutation).await {
            Ok(created) => {
                report.applied += 1;
                if let Some(identity) = created {
                    log::debug!("created comment {}", identity);
                    report.created.push(identity);
                }
            }
            Err(error) => {
                let failed = FailedMutation {
                    index,
                    mutation: mutation.clone(),
                    error,
                };
                if failed.error.is_recoverable() {
                    log::warn!("skipping {}", failed);
                    report.conflicts.push(failed);
                } else {
                    log::error!("stopping at {}", failed);
                    report.halted = Some(failed);
                    break;
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiffLine, Identity};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Applier answering from a script, one result per call.
    struct Scripted {
        results: Mutex<Vec<Result<Option<Identity>, ApplyError>>>,
        seen: Mutex<Vec<Mutation>>,
    }

    impl Scripted {
        fn new(mut results: Vec<Result<Option<Identity>, ApplyError>>) -> Self {
            results.reverse();
            Self {
                results: Mutex::new(results),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MutationApplier for Scripted {
        async fn apply(&self, mutation: &Mutation) -> Result<Option<Identity>, ApplyError> {
            self.seen.lock().unwrap().push(mutation.clone());
            self.results.lock().unwrap().pop().unwrap_or(Ok(None))
        }
    }

    fn delete(id: &str) -> Mutation {
        Mutation::Delete {
            identity: Identity::new(id, "0"),
        }
    }

    #[tokio::test]
    async fn test_all_applied() {
        let create = Mutation::Create {
            anchor: DiffLine::added("x", 3).anchor(),
            text: "new".to_string(),
        };
        let applier = Scripted::new(vec![Ok(Some(Identity::new("42", "0"))), Ok(None)]);

        let report = apply_all(&applier, &[create, delete("1")]).await;

        assert!(report.is_success());
        assert_eq!(report.applied, 2);
        assert_eq!(report.created, vec![Identity::new("42", "0")]);
        assert_eq!(report.remaining(), 0);
    }

    #[tokio::test]
    async fn test_conflict_does_not_stop_the_run() {
        let applier = Scripted::new(vec![
            Err(ApplyError::VersionConflict(Identity::new("1", "0"))),
            Ok(None),
        ]);

        let report = apply_all(&applier, &[delete("1"), delete("2")]).await;

        assert_eq!(applier.seen.lock().unwrap().len(), 2);
        assert_eq!(report.applied, 1);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].index, 0);
        assert!(report.halted.is_none());
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_other_failure_halts() {
        let applier = Scripted::new(vec![
            Ok(None),
            Err(ApplyError::Failed("connection reset".to_string())),
        ]);

        let report = apply_all(&applier, &[delete("1"), delete("2"), delete("3"), delete("4")]).await;

        assert_eq!(applier.seen.lock().unwrap().len(), 2);
        assert_eq!(report.applied, 1);
        assert_eq!(report.remaining(), 2);
        assert_eq!(report.halted.as_ref().map(|f| f.index), Some(1));
        assert_eq!(
            report.to_string(),
            "applied 1 of 4 change(s), stopped at #2: delete comment 2@0: \
             Request failed: connection reset with 2 remaining"
        );
    }

    #[tokio::test]
    async fn test_nothing_to_apply() {
        let applier = Scripted::new(vec![]);
        let report = apply_all(&applier, &[]).await;
        assert!(report.is_success());
        assert_eq!(report.to_string(), "applied 0 of 0 change(s)");
    }
}
