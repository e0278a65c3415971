//! Application configuration
//!
//! Configuration loaded from a TOML file, with command line flags taking
//! precedence field by field.

use crate::secret::Secret;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Application configuration loaded from `.stash-review.toml` or
/// `<config dir>/stash-review/config.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Stash user name
    #[serde(default)]
    pub user: Option<String>,

    /// Stash password
    #[serde(default)]
    pub password: Option<Secret>,

    /// Stash host, used for shorthand pull request references
    #[serde(default)]
    pub host: Option<String>,

    /// Default project key for shorthand references
    #[serde(default)]
    pub project: Option<String>,

    /// Editor command, takes precedence over $EDITOR
    #[serde(default)]
    pub editor: Option<String>,

    /// Explain the document format at the top of the review document
    #[serde(default = "default_usage_notes")]
    pub usage_notes: bool,

    /// Verbosity: 0 = warnings, 1 = info, 2 and above = debug
    #[serde(default)]
    pub debug: u8,
}

fn default_usage_notes() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user: None,
            password: None,
            host: None,
            project: None,
            editor: None,
            usage_notes: default_usage_notes(),
            debug: 0,
        }
    }
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub user: Option<String>,
    pub password: Option<Secret>,
    pub host: Option<String>,
    pub project: Option<String>,
    pub editor: Option<String>,
    pub usage_notes: Option<bool>,
    pub debug: Option<u8>,
}

impl AppConfig {
    /// Load config from the explicit path, CWD or config directory, or use
    /// defaults when there is no config file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let Some((path, content)) = crate::load_config_file(explicit)? else {
            log::debug!("Using default app config");
            return Ok(Self::default());
        };

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded app config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command line values on top of this configuration.
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        Self {
            user: overrides.user.or(self.user),
            password: overrides.password.or(self.password),
            host: overrides.host.or(self.host),
            project: overrides.project.or(self.project),
            editor: overrides.editor.or(self.editor),
            usage_notes: overrides.usage_notes.unwrap_or(self.usage_notes),
            debug: overrides.debug.unwrap_or(self.debug),
        }
    }

    /// User name and password, both required to talk to Stash.
    pub fn credentials(&self) -> Result<(&str, &Secret)> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Ok((user.as_str(), password))
            }
            _ => bail!("--user and --password must be given, on the command line or in the config file"),
        }
    }

    /// Editor to use: the configured one, else $EDITOR.
    pub fn resolve_editor(&self) -> Result<String> {
        self.editor_or(env::var("EDITOR").ok())
            .context("No editor configured: pass -e/--editor, set `editor` in the config file or $EDITOR")
    }

    fn editor_or(&self, env_editor: Option<String>) -> Option<String> {
        self.editor
            .clone()
            .or(env_editor)
            .filter(|editor| !editor.trim().is_empty())
    }
}
