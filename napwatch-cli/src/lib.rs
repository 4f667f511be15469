//! napwatch CLI library
//!
//! Command handlers live here so the integration tests can drive them
//! without spawning the binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

use std::path::Path;

use napwatch_core::config::NapwatchConfig;

use crate::error::CliError;

/// Load the effective configuration.
///
/// A missing file falls back to defaults; environment overrides and
/// validation apply either way.
pub async fn load_config(path: &Path) -> Result<NapwatchConfig, CliError> {
    if tokio::fs::try_exists(path).await? {
        return Ok(NapwatchConfig::load(path).await?);
    }

    tracing::debug!(path = %path.display(), "config file not found, using defaults");
    let mut config = NapwatchConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}
