//! Pull request and repository references given on the command line.
//!
//! Accepted forms:
//! - `http[s]://<host>/(users|projects)/<key>/repos/<repo>/pull-requests/<id>`
//! - `<project>/<repo>/<id>` with a default host
//! - `<repo>/<id>` with a default host and project
//!
//! Repository references take the same forms without the id. A project key
//! starting with `~` or `%` names a personal project.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

const API_PREFIX: &str = "rest/api/1.0";

pub const URL_EXAMPLE: &str =
    "http[s]://<host>/(users|projects)/<project>/repos/<repo>/pull-requests/<id>";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("'{input}' is neither a URL ({}) nor of the form {expected}", URL_EXAMPLE)]
    Invalid { input: String, expected: &'static str },

    #[error("--host must be given to use the shorthand '{0}'")]
    MissingHost(String),

    #[error("--project must be given to use the shorthand '{0}'")]
    MissingProject(String),

    #[error("'{0}' is not a pull request id")]
    InvalidId(String),
}

/// A repository on a Stash server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Base URL of the server, with scheme and without trailing slash.
    pub host: String,
    /// `projects/<KEY>` or `users/<name>`.
    pub namespace: String,
    pub repo: String,
}

impl RepoRef {
    /// Parse a repository reference, completing shorthands from the defaults.
    pub fn parse(
        input: &str,
        default_host: Option<&str>,
        default_project: Option<&str>,
    ) -> Result<Self, ReferenceError> {
        if let Some(parsed) = parse_url(input) {
            return Ok(parsed.repo);
        }

        let host = require_host(input, default_host)?;
        let parts: Vec<&str> = input.split('/').collect();
        let (project, repo) = match parts.as_slice() {
            [project, repo] => (*project, *repo),
            [repo] => (require_project(input, default_project)?, *repo),
            _ => return Err(invalid(input, "<project>/<repo>")),
        };

        Self::new(host, project, repo).ok_or_else(|| invalid(input, "<project>/<repo>"))
    }

    fn new(host: &str, project: &str, repo: &str) -> Option<Self> {
        if project.is_empty() || repo.is_empty() {
            return None;
        }
        Some(Self {
            host: normalize_host(host),
            namespace: namespace(project)?,
            repo: repo.to_string(),
        })
    }

    /// `<host>/rest/api/1.0/<namespace>/repos/<repo>`
    pub fn api_url(&self) -> String {
        format!("{}/{}/{}/repos/{}", self.host, API_PREFIX, self.namespace, self.repo)
    }

    /// Listing of pull requests in the given state.
    pub fn pull_requests_url(&self, state: &str, start: u64) -> String {
        format!("{}/pull-requests?state={}&start={}", self.api_url(), state, start)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.repo)
    }
}

/// A single pull request on a Stash server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub repo: RepoRef,
    pub id: u64,
}

impl PullRequestRef {
    /// Parse a pull request reference, completing shorthands from the defaults.
    pub fn parse(
        input: &str,
        default_host: Option<&str>,
        default_project: Option<&str>,
    ) -> Result<Self, ReferenceError> {
        const EXPECTED: &str = "<project>/<repo>/<id>";

        if let Some(parsed) = parse_url(input) {
            let id = parsed.id.ok_or_else(|| invalid(input, EXPECTED))?;
            return Ok(Self { repo: parsed.repo, id });
        }

        let host = require_host(input, default_host)?;
        let parts: Vec<&str> = input.split('/').collect();
        let (project, repo, id) = match parts.as_slice() {
            [project, repo, id] => (*project, *repo, *id),
            [repo, id] => (require_project(input, default_project)?, *repo, *id),
            _ => return Err(invalid(input, EXPECTED)),
        };

        let id = id
            .parse()
            .map_err(|_| ReferenceError::InvalidId(id.to_string()))?;
        let repo = RepoRef::new(host, project, repo).ok_or_else(|| invalid(input, EXPECTED))?;
        Ok(Self { repo, id })
    }

    /// `<repo api>/pull-requests/<id>`
    pub fn api_url(&self) -> String {
        format!("{}/pull-requests/{}", self.repo.api_url(), self.id)
    }

    /// `<pr api>/diff/<path>`, each segment of `path` percent-encoded.
    pub fn diff_url(&self, path: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&self.api_url())?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push("diff")
            .extend(path.split('/'));
        Ok(url.into())
    }

    pub fn changes_url(&self, start: u64) -> String {
        format!("{}/changes?start={}", self.api_url(), start)
    }

    pub fn comments_url(&self) -> String {
        format!("{}/comments", self.api_url())
    }

    /// `<pr api>/comments/<id>?version=<version>`
    pub fn comment_url(&self, id: &str, version: &str) -> String {
        format!("{}/comments/{}?version={}", self.api_url(), id, version)
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/pull-requests/{}", self.repo, self.id)
    }
}

struct ParsedUrl {
    repo: RepoRef,
    id: Option<u64>,
}

fn parse_url(input: &str) -> Option<ParsedUrl> {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = URL_REGEX.get_or_init(|| {
        // <host>/(users|projects)/<key>/repos/<repo>[/pull-requests/<id>]
        Regex::new(r"^(https?://.*?)/?((?:users|projects)/[^/]+)/repos/([^/]+)(?:/pull-requests/(\d+))?")
            .unwrap()
    });

    let captures = re.captures(input)?;
    let repo = RepoRef {
        host: normalize_host(captures.get(1)?.as_str()),
        namespace: captures.get(2)?.as_str().to_string(),
        repo: captures.get(3)?.as_str().to_string(),
    };
    let id = match captures.get(4) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };
    Some(ParsedUrl { repo, id })
}

/// `~name` and `%name` are personal projects, anything else a project key.
fn namespace(project: &str) -> Option<String> {
    match project.chars().next()? {
        '~' | '%' => {
            let user = &project[1..];
            (!user.is_empty()).then(|| format!("users/{}", user))
        }
        _ => Some(format!("projects/{}", project)),
    }
}

/// Add `https://` when no scheme is given and drop trailing slashes.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

fn require_host<'a>(input: &str, host: Option<&'a str>) -> Result<&'a str, ReferenceError> {
    host.filter(|h| !h.is_empty())
        .ok_or_else(|| ReferenceError::MissingHost(input.to_string()))
}

fn require_project<'a>(input: &str, project: Option<&'a str>) -> Result<&'a str, ReferenceError> {
    project
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ReferenceError::MissingProject(input.to_string()))
}

fn invalid(input: &str, expected: &'static str) -> ReferenceError {
    ReferenceError::Invalid {
        input: input.to_string(),
        expected,
    }
}
