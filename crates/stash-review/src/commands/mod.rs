//! Command implementations.

pub mod listing;
pub mod review;

use anyhow::{Context, Result};
use stash_client::OctocrabStashClient;
use stash_review_config::AppConfig;

/// Client for `host` with the configured credentials.
fn connect(config: &AppConfig, host: &str) -> Result<OctocrabStashClient> {
    let (user, password) = config.credentials()?;
    log::info!("connecting to {} as {}", host, user);
    OctocrabStashClient::with_basic_auth(host, user, password.expose())
        .with_context(|| format!("Failed to create Stash client for {}", host))
}
