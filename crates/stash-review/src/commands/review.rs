//! `review`: edit the comments of one file in the editor.

use super::connect;
use crate::cli::ReviewArgs;
use crate::editor::ExternalEditor;
use anyhow::{bail, Result};
use stash_client::{PullRequestRef, StashReview};
use stash_review_config::AppConfig;
use stash_review_doc::{
    DryRunApplier, FetchError, RenderOptions, ReviewSession, SessionError, SessionOutcome,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code when the document was saved without any comment change.
const EXIT_UNCHANGED: u8 = 2;

pub async fn run(config: &AppConfig, args: &ReviewArgs) -> Result<ExitCode> {
    let editor = ExternalEditor::new(config.resolve_editor()?);
    let pr = PullRequestRef::parse(
        &args.pull_request,
        config.host.as_deref(),
        config.project.as_deref(),
    )?;
    let client = connect(config, &pr.repo.host)?;
    let review = StashReview::new(&client, &pr, &args.file);

    let render = RenderOptions {
        usage_notes: config.usage_notes,
        ..RenderOptions::interactive()
    };
    let session = ReviewSession::new(args.file.as_str(), document_path(), render);
    log::info!("writing review to {}", session.document().display());

    let result = if args.dry_run {
        session.run(&review, &editor, &DryRunApplier).await
    } else {
        session.run(&review, &editor, &review).await
    };

    match result {
        Ok(outcome) => Ok(report(outcome)),
        Err(SessionError::Fetch(FetchError::NotFound(path))) => {
            bail!("{} is not part of pull request {}", path, pr)
        }
        Err(e) => Err(e.into()),
    }
}

/// A fresh file in the temp directory, named so editors pick diff syntax.
fn document_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    std::env::temp_dir().join(format!("review.{}.{}.diff", stamp, std::process::id()))
}

fn report(outcome: SessionOutcome) -> ExitCode {
    let code = match &outcome {
        SessionOutcome::Unchanged { .. } => {
            eprintln!("No changes detected in the review document.");
            ExitCode::from(EXIT_UNCHANGED)
        }
        SessionOutcome::Applied {
            mutations, report, ..
        } => {
            for mutation in mutations {
                log::debug!("{}", mutation);
            }
            println!("{}", capitalize(&report.to_string()));

            for conflict in &report.conflicts {
                eprintln!("  changed by someone else meanwhile, {}", conflict);
            }
            if let Some(failed) = &report.halted {
                eprintln!("  failed: {}", failed);
            }

            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    };

    for notice in notices(&outcome) {
        eprintln!("{}", notice);
    }
    code
}

/// Session warnings, then where the document was kept.
fn notices(outcome: &SessionOutcome) -> Vec<String> {
    let (SessionOutcome::Unchanged { kept_document, .. }
    | SessionOutcome::Applied { kept_document, .. }) = outcome;

    outcome
        .warnings()
        .iter()
        .map(|warning| format!("warning: {}", warning))
        .chain(
            kept_document
                .iter()
                .map(|path| format!("Your edits are kept in {}", path.display())),
        )
        .collect()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
