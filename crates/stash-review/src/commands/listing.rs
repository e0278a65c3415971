//! `ls` and `ls-reviews`.

use super::connect;
use crate::cli::{LsArgs, LsReviewsArgs};
use anyhow::Result;
use chrono::Local;
use stash_client::{
    ChangedFile, PullRequest, PullRequestRef, PullRequestState, RepoRef, StashClient,
};
use stash_review_config::AppConfig;

pub async fn ls(config: &AppConfig, args: &LsArgs) -> Result<()> {
    let pr = PullRequestRef::parse(
        &args.pull_request,
        config.host.as_deref(),
        config.project.as_deref(),
    )?;
    let client = connect(config, &pr.repo.host)?;

    for file in client.fetch_changes(&pr).await? {
        println!("{}", format_file(&file));
    }
    Ok(())
}

pub async fn ls_reviews(config: &AppConfig, args: &LsReviewsArgs) -> Result<()> {
    let repo = RepoRef::parse(&args.repo, config.host.as_deref(), config.project.as_deref())?;
    let client = connect(config, &repo.host)?;

    let state: PullRequestState = args.state.into();
    let prs = client.fetch_pull_requests(&repo, state).await?;
    if prs.is_empty() {
        log::info!("no {} pull requests in {}", state, repo);
    }
    for pr in &prs {
        println!("{}", format_pull_request(pr, args.show_description));
    }
    Ok(())
}

/// `+x  MODIFY path/to/file`
fn format_file(file: &ChangedFile) -> String {
    format!(
        "{:>2} {:>7} {}",
        file.exec_flag().unwrap_or_default(),
        file.change_type,
        file.path
    )
}

/// One line per pull request; the description, when shown, is indented
/// below it.
fn format_pull_request(pr: &PullRequest, show_description: bool) -> String {
    let id = format!("{:>3}", pr.id);
    let mut line = format!(
        "{} {} [{}] {:>25} {:<20} {}",
        id,
        pr.state,
        pr.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        pr.author,
        pr.from_branch,
        pr.title
    );

    if let Some(description) = pr.description.as_deref().filter(|_| show_description) {
        let indent = " ".repeat(id.chars().count() + 1);
        line.push('\n');
        for text in ["---"].into_iter().chain(description.lines()).chain(["---"]) {
            line.push_str(&indent);
            line.push_str(text);
            line.push('\n');
        }
    }

    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_file() {
        let file = ChangedFile {
            path: "bin/run.sh".to_string(),
            change_type: "ADD".to_string(),
            executable: true,
            src_executable: false,
        };
        assert_eq!(format_file(&file), "+x     ADD bin/run.sh");

        let file = ChangedFile {
            executable: false,
            change_type: "MODIFY".to_string(),
            ..file
        };
        assert_eq!(format_file(&file), "    MODIFY bin/run.sh");
    }

    #[test]
    fn test_format_pull_request_with_description() {
        let pr = PullRequest {
            id: 7,
            title: "Faster parser".to_string(),
            description: Some("Line one\nLine two".to_string()),
            state: PullRequestState::Open,
            author: "Jane Doe".to_string(),
            from_branch: "fast-parser".to_string(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        };

        let text = format_pull_request(&pr, true);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("  7 OPEN ["));
        assert!(lines[0].ends_with("fast-parser          Faster parser"));
        assert_eq!(&lines[1..], ["    ---", "    Line one", "    Line two", "    ---"]);

        assert_eq!(format_pull_request(&pr, false).lines().count(), 1);
    }
}
