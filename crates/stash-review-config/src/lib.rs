//! Configuration for stash-review
//!
//! This crate provides:
//! - File path utilities for config files
//! - Configuration file lookup and loading (TOML)
//! - Application configuration (AppConfig) with command line overrides
//! - Redaction of credentials in logs

pub mod app_config;
pub mod config_file;
pub mod paths;
pub mod secret;

pub use app_config::{AppConfig, ConfigOverrides};
pub use config_file::{find_config_file, load_config_file};
pub use secret::Secret;
