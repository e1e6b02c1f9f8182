use std::path::Path;

use anyhow::{Context, Result};
use api_envelope::config::{Config, PaginationConfig};

pub mod cache_key;
pub mod filter;

/// Pagination settings from configuration, with command-line overrides applied
pub fn pagination_config(
    path: Option<&Path>,
    max_limit: Option<i64>,
    prefix: Option<String>,
) -> Result<PaginationConfig> {
    let config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };

    let mut pagination = config.pagination;
    if let Some(max_limit) = max_limit {
        pagination.max_limit = max_limit;
    }
    if let Some(prefix) = prefix {
        pagination.cache_prefix = prefix;
    }
    Ok(pagination)
}
