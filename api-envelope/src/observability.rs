//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Install a JSON `tracing` subscriber filtered by `service.log_level`
///
/// An unparsable level falls back to `info`. If a global subscriber is
/// already installed it is left in place.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = env_filter(&config.service.log_level);

    if tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
        return Ok(());
    }

    tracing::info!("Tracing initialized for service: {}", config.service.name);

    Ok(())
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}
