use crate::paths;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Locate the config file to use.
///
/// Searches, in order:
/// 1. `explicit`, when given (it must exist)
/// 2. `.stash-review.toml` in the current working directory
/// 3. `config.toml` in the user's config directory
///
/// Returns `None` when no file exists.
pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("Config file {} does not exist", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    let candidates = [paths::local_config_path().ok(), paths::app_config_path().ok()];
    Ok(candidates.into_iter().flatten().find(|path| path.is_file()))
}

/// Load config file content.
///
/// Returns the path that was read with its content, or `None` when there is
/// no config file.
pub fn load_config_file(explicit: Option<&Path>) -> Result<Option<(PathBuf, String)>> {
    let Some(path) = find_config_file(explicit)? else {
        log::debug!("No config file found");
        return Ok(None);
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(Some((path, content)))
}
