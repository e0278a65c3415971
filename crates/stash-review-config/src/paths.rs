//! Configuration file locations
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/stash-review/`
//! - macOS: `~/Library/Application Support/stash-review/`
//! - Windows: `%APPDATA%\stash-review\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "stash-review";
pub const LOCAL_CONFIG_FILE: &str = ".stash-review.toml";
const CONFIG_FILE: &str = "config.toml";

/// Get the application config directory
/// Returns ~/.config/stash-review/ on Linux, ~/Library/Application Support/stash-review/ on macOS
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get path to the user's config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Get path to the local config file (in CWD)
pub fn local_config_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join(LOCAL_CONFIG_FILE))
}
