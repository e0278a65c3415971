//! One review round: fetch, render, edit, parse, diff and apply.

use crate::apply::{apply_all, ApplyReport};
use crate::context::{RenderOptions, ReviewContext, Warning};
use crate::differ::diff_models;
use crate::model::Mutation;
use crate::parser::{parse_document, ParseError};
use crate::render::render_document;
use crate::traits::{DiffSource, Editor, EditorExit, FetchError, MutationApplier};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that end a session before anything is applied.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to access review document {}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start the editor: {0}")]
    EditorUnavailable(#[source] io::Error),

    /// The editor exited abnormally. The document is left in place.
    #[error("Editor exited abnormally ({exit:?}), review document kept at {}", document.display())]
    EditorAborted { exit: EditorExit, document: PathBuf },

    /// The edited document could not be read back. It is left in place.
    #[error("{source}, review document kept at {}", document.display())]
    Parse {
        #[source]
        source: ParseError,
        document: PathBuf,
    },
}

/// How a session ended when it got past parsing.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The edited document held no comment changes.
    Unchanged {
        warnings: Vec<Warning>,
        /// Set when the document was kept because comments in it were skipped.
        kept_document: Option<PathBuf>,
    },
    /// Mutations were sent to the applier.
    Applied {
        mutations: Vec<Mutation>,
        report: ApplyReport,
        warnings: Vec<Warning>,
        /// Set when the document was kept because something failed or
        /// comments in it were skipped.
        kept_document: Option<PathBuf>,
    },
}

impl SessionOutcome {
    pub fn warnings(&self) -> &[Warning] {
        match self {
            SessionOutcome::Unchanged { warnings, .. } => warnings,
            SessionOutcome::Applied { warnings, .. } => warnings,
        }
    }
}

/// Drives a single edit of one file's review comments.
#[derive(Debug)]
pub struct ReviewSession {
    path: String,
    document: PathBuf,
    ctx: ReviewContext,
}

impl ReviewSession {
    /// `path` is the reviewed file, `document` where the editable text goes.
    pub fn new(path: impl Into<String>, document: impl Into<PathBuf>, render: RenderOptions) -> Self {
        Self {
            path: path.into(),
            document: document.into(),
            ctx: ReviewContext::new(render),
        }
    }

    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Run the session to completion.
    ///
    /// Nothing is applied unless the editor exits successfully and the
    /// edited document parses. The document file is removed once every
    /// mutation succeeded, or when there was nothing to do, unless the parser
    /// had to skip comments the reviewer wrote.
    pub async fn run<S, E, A>(
        mut self,
        source: &S,
        editor: &E,
        applier: &A,
    ) -> Result<SessionOutcome, SessionError>
    where
        S: DiffSource + ?Sized,
        E: Editor + ?Sized,
        A: MutationApplier + ?Sized,
    {
        log::info!("fetching diff of {}", self.path);
        let original = source.fetch_diff(&self.path).await?;
        if original.is_empty() {
            return Err(FetchError::NotFound(self.path).into());
        }
        log::debug!(
            "{} hunk(s), {} comment(s)",
            original.hunks.len(),
            original.annotation_count()
        );

        let text = render_document(&self.ctx, &original);
        fs::write(&self.document, text).map_err(|source| SessionError::Document {
            path: self.document.clone(),
            source,
        })?;

        log::debug!("editing {}", self.document.display());
        let exit = editor
            .edit(&self.document)
            .map_err(SessionError::EditorUnavailable)?;
        if !exit.is_success() {
            return Err(SessionError::EditorAborted {
                exit,
                document: self.document,
            });
        }

        let edited_text = fs::read_to_string(&self.document).map_err(|source| SessionError::Document {
            path: self.document.clone(),
            source,
        })?;
        let edited = match parse_document(&mut self.ctx, &edited_text) {
            Ok(model) => model,
            Err(source) => {
                return Err(SessionError::Parse {
                    source,
                    document: self.document,
                })
            }
        };

        let skipped_comments = self.ctx.warnings().iter().any(Warning::drops_comments);
        let mutations = diff_models(&mut self.ctx, &original, &edited);
        if mutations.is_empty() {
            log::info!("no changes detected");
            return Ok(SessionOutcome::Unchanged {
                kept_document: self.settle_document(!skipped_comments),
                warnings: self.ctx.take_warnings(),
            });
        }

        let report = apply_all(applier, &mutations).await;
        let kept_document = self.settle_document(report.is_success() && !skipped_comments);

        Ok(SessionOutcome::Applied {
            mutations,
            report,
            warnings: self.ctx.take_warnings(),
            kept_document,
        })
    }

    /// Remove the document when `done`, otherwise return where it was kept.
    fn settle_document(&self, done: bool) -> Option<PathBuf> {
        if !done {
            log::warn!("review document kept at {}", self.document.display());
            return Some(self.document.clone());
        }
        if let Err(e) = fs::remove_file(&self.document) {
            log::warn!("could not remove {}: {}", self.document.display(), e);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Annotation, DiffLine, DiffModel, Hunk, Identity};
    use crate::traits::ApplyError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FixedSource(DiffModel);

    #[async_trait]
    impl DiffSource for FixedSource {
        async fn fetch_diff(&self, _path: &str) -> Result<DiffModel, FetchError> {
            Ok(self.0.clone())
        }
    }

    /// Editor that rewrites the document with a closure, or fails.
    struct FakeEditor<F: Fn(&str) -> String> {
        edit: F,
        exit: EditorExit,
    }

    impl<F: Fn(&str) -> String> Editor for FakeEditor<F> {
        fn edit(&self, path: &Path) -> io::Result<EditorExit> {
            let text = fs::read_to_string(path)?;
            fs::write(path, (self.edit)(&text))?;
            Ok(self.exit)
        }
    }

    fn editor<F: Fn(&str) -> String>(edit: F) -> FakeEditor<F> {
        FakeEditor {
            edit,
            exit: EditorExit::Success,
        }
    }

    #[derive(Default)]
    struct Recorder {
        applied: Mutex<Vec<Mutation>>,
        fail_with: Option<ApplyError>,
    }

    #[async_trait]
    impl MutationApplier for Recorder {
        async fn apply(&self, mutation: &Mutation) -> Result<Option<Identity>, ApplyError> {
            if let Some(error) = &self.fail_with {
                return Err(error.clone());
            }
            self.applied.lock().unwrap().push(mutation.clone());
            Ok(None)
        }
    }

    fn fetched() -> DiffModel {
        DiffModel::new("src/lib.rs").with_hunk(
            Hunk::new(1, 1, 1, 2)
                .with_line(DiffLine::context("fn a() {}", 1, 1))
                .with_line(
                    DiffLine::added("fn b() {}", 2)
                        .with_annotation(Annotation::existing("7", "3", "ok")),
                ),
        )
    }

    fn session(dir: &TempDir) -> ReviewSession {
        ReviewSession::new("src/lib.rs", dir.path().join("review.diff"), RenderOptions::interactive())
    }

    #[tokio::test]
    async fn test_unchanged_document_removes_file() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir);
        let document = session.document().to_path_buf();

        let outcome = session
            .run(&FixedSource(fetched()), &editor(|t| t.to_string()), &Recorder::default())
            .await
            .unwrap();

        assert!(matches!(outcome, SessionOutcome::Unchanged { .. }));
        assert!(!document.exists());
    }

    #[tokio::test]
    async fn test_edit_is_applied() {
        let dir = TempDir::new().unwrap();
        let applier = Recorder::default();

        let outcome = session(&dir)
            .run(
                &FixedSource(fetched()),
                &editor(|t| t.replace("#[7@3] ok", "#[7@3] looks good")),
                &applier,
            )
            .await
            .unwrap();

        let SessionOutcome::Applied { report, kept_document, .. } = outcome else {
            panic!("expected mutations to be applied");
        };
        assert!(report.is_success());
        assert!(kept_document.is_none());
        assert_eq!(
            *applier.applied.lock().unwrap(),
            vec![Mutation::Update {
                identity: Identity::new("7", "3"),
                text: "looks good".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_abnormal_editor_exit_applies_nothing() {
        let dir = TempDir::new().unwrap();
        let applier = Recorder::default();
        let aborting = FakeEditor {
            edit: |t: &str| t.replace("#[7@3] ok\n", ""),
            exit: EditorExit::Failed(Some(1)),
        };

        let result = session(&dir)
            .run(&FixedSource(fetched()), &aborting, &applier)
            .await;

        let Err(SessionError::EditorAborted { document, .. }) = result else {
            panic!("expected the session to abort");
        };
        assert!(document.exists());
        assert!(applier.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_emptied_document_is_malformed_and_kept() {
        let dir = TempDir::new().unwrap();
        let applier = Recorder::default();

        let result = session(&dir)
            .run(&FixedSource(fetched()), &editor(|_| String::new()), &applier)
            .await;

        let Err(SessionError::Parse { document, source }) = result else {
            panic!("expected a parse error");
        };
        assert!(matches!(source, ParseError::MalformedDocument(_)));
        assert!(document.exists());
        assert!(applier.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = session(&dir)
            .run(
                &FixedSource(DiffModel::new("src/lib.rs")),
                &editor(|t| t.to_string()),
                &Recorder::default(),
            )
            .await;

        assert!(matches!(result, Err(SessionError::Fetch(FetchError::NotFound(_)))));
        assert!(!dir.path().join("review.diff").exists());
    }

    #[tokio::test]
    async fn test_failed_apply_keeps_document() {
        let dir = TempDir::new().unwrap();
        let applier = Recorder {
            fail_with: Some(ApplyError::Rejected("403 Forbidden".to_string())),
            ..Recorder::default()
        };

        let outcome = session(&dir)
            .run(&FixedSource(fetched()), &editor(|t| t.replace("#[7@3] ok\n", "")), &applier)
            .await
            .unwrap();

        let SessionOutcome::Applied { report, kept_document, .. } = outcome else {
            panic!("expected mutations to be attempted");
        };
        assert!(report.halted.is_some());
        assert!(kept_document.is_some_and(|p| p.exists()));
    }

    #[tokio::test]
    async fn test_skipped_comment_keeps_document() {
        let dir = TempDir::new().unwrap();
        let applier = Recorder::default();

        let outcome = session(&dir)
            .run(
                &FixedSource(fetched()),
                &editor(|t| {
                    t.replace(" fn a() {}\n", "")
                        .replace("#[7@3] ok\n", "#[7@3] ok\n# lost?\n")
                }),
                &applier,
            )
            .await
            .unwrap();

        let SessionOutcome::Unchanged { warnings, kept_document } = outcome else {
            panic!("expected no mutations");
        };
        assert!(warnings
            .iter()
            .any(|w| matches!(w, Warning::HunkLineCount { skipped: 1, .. })));
        assert!(kept_document.is_some_and(|p| p.exists()));
        assert!(applier.applied.lock().unwrap().is_empty());
    }
}
