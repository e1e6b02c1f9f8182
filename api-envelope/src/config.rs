//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. The legacy `MAX_LIMIT_PAGINATE` environment variable (page size cap only)
//! 2. Environment variables (prefix: `API_ENVELOPE_`, nested keys split on `__`)
//! 3. Current working directory: ./config.toml
//! 4. Default values
//!
//! The filter normalizer never reads the environment itself. Load a [`Config`]
//! once at startup and pass its [`PaginationConfig`] down.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Default maximum page size
pub const DEFAULT_MAX_LIMIT: i64 = 100;

/// Legacy environment variable capping the page size
pub const MAX_LIMIT_ENV: &str = "MAX_LIMIT_PAGINATE";

/// Prefix for structured environment overrides
pub const ENV_PREFIX: &str = "API_ENVELOPE_";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Pagination and cache-key configuration
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

/// Pagination configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Largest page size a client may request
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,

    /// Prefix prepended to generated cache keys
    #[serde(default)]
    pub cache_prefix: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_limit: default_max_limit(),
            cache_prefix: String::new(),
        }
    }
}

impl PaginationConfig {
    /// Create a pagination config with the given page size cap
    pub fn with_max_limit(max_limit: i64) -> Self {
        Self {
            max_limit,
            ..Self::default()
        }
    }

    /// Set the cache key prefix
    #[must_use]
    pub fn with_cache_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cache_prefix = prefix.into();
        self
    }

    /// The page size cap actually applied; non-positive values fall back to the default
    pub fn effective_max_limit(&self) -> i64 {
        if self.max_limit < 1 {
            DEFAULT_MAX_LIMIT
        } else {
            self.max_limit
        }
    }
}

fn default_service_name() -> String {
    "api-envelope".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_limit() -> i64 {
    DEFAULT_MAX_LIMIT
}

/// Interpret a raw `MAX_LIMIT_PAGINATE` value
///
/// Absent, non-numeric, and non-positive values all yield [`DEFAULT_MAX_LIMIT`].
pub fn parse_max_limit(raw: Option<&str>) -> i64 {
    match raw.map(|s| s.trim().parse::<i64>()) {
        Some(Ok(limit)) if limit >= 1 => limit,
        Some(Ok(_)) | Some(Err(_)) => {
            tracing::warn!(
                "Ignoring invalid {} value {:?}, using {}",
                MAX_LIMIT_ENV,
                raw.unwrap_or_default(),
                DEFAULT_MAX_LIMIT
            );
            DEFAULT_MAX_LIMIT
        }
        None => DEFAULT_MAX_LIMIT,
    }
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Reads `./config.toml` when present, then `API_ENVELOPE_*` variables,
    /// then `MAX_LIMIT_PAGINATE`.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let path = Path::new("config.toml");
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        let mut config: Config = figment.merge(Env::prefixed(ENV_PREFIX).split("__")).extract()?;
        config.apply_legacy_env();
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override values from the file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.apply_legacy_env();
        Ok(config)
    }

    fn apply_legacy_env(&mut self) {
        if let Ok(raw) = std::env::var(MAX_LIMIT_ENV) {
            self.pagination.max_limit = parse_max_limit(Some(&raw));
        }
    }
}
