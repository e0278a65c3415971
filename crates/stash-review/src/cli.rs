use clap::{Args, Parser, Subcommand, ValueEnum};
use stash_client::PullRequestState;
use stash_review_config::{ConfigOverrides, Secret};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "stash-review",
    version,
    about = "Review Bitbucket Server (Stash) pull requests in your text editor",
    after_help = "Pull requests are given as a URL \
                  (http[s]://<host>/(users|projects)/<project>/repos/<repo>/pull-requests/<id>) \
                  or as <project>/<repo>/<id>, <repo>/<id> with --host and --project."
)]
pub struct Cli {
    /// Stash user name.
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Stash password. Better kept in the config file.
    #[arg(short, long, visible_alias = "pass", global = true)]
    pub password: Option<Secret>,

    /// Stash host, for shorthand pull request references.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Default project key, for `<repo>/<id>` shorthands.
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Editor to use. Takes precedence over $EDITOR.
    #[arg(short, long, global = true)]
    pub editor: Option<String>,

    /// Config file to read instead of the default locations.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity: 0 = warnings, 1 = info, 2 = debug.
    #[arg(long, global = true)]
    pub debug: Option<u8>,

    /// Leave the usage notes out of the review document.
    #[arg(long, global = true)]
    pub no_usage: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit the comments on one file of a pull request.
    Review(ReviewArgs),
    /// List the files changed by a pull request.
    Ls(LsArgs),
    /// List the pull requests of a repository.
    LsReviews(LsReviewsArgs),
}

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Pull request URL or shorthand.
    pub pull_request: String,

    /// Path of the file to review, as listed by `ls`.
    pub file: String,

    /// Show what would change without touching the pull request.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct LsArgs {
    /// Pull request URL or shorthand.
    pub pull_request: String,
}

#[derive(Args, Debug)]
pub struct LsReviewsArgs {
    /// Repository URL or `<project>/<repo>` (`<repo>` with --project).
    pub repo: String,

    /// Pull request state to list.
    #[arg(short, long, value_enum, default_value_t = StateArg::Open)]
    pub state: StateArg,

    /// Show pull request descriptions.
    #[arg(short = 'd', long = "description")]
    pub show_description: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateArg {
    Open,
    Merged,
    Declined,
}

impl From<StateArg> for PullRequestState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Open => PullRequestState::Open,
            StateArg::Merged => PullRequestState::Merged,
            StateArg::Declined => PullRequestState::Declined,
        }
    }
}

impl Cli {
    /// Command line values that override the config file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            user: self.user.clone(),
            password: self.password.clone(),
            host: self.host.clone(),
            project: self.project.clone(),
            editor: self.editor.clone(),
            usage_notes: self.no_usage.then_some(false),
            debug: self.debug,
        }
    }
}
