//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Rate limit configuration.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Rate limit configuration for all gated action types.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Vote submission limit.
    #[serde(default = "default_vote_limit")]
    pub vote: LimitRule,
    /// Voter token issuance limit.
    #[serde(default = "default_token_request_limit")]
    pub token_request: LimitRule,
    /// Content mutation limit (questions, questionnaires, posts).
    #[serde(default = "default_submit_content_limit")]
    pub submit_content: LimitRule,
    /// Interval between expired-window cleanup sweeps, in seconds.
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// A single rate limit window rule.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LimitRule {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration in seconds.
    pub window_secs: u64,
}

impl LimitRule {
    /// Create a new limit rule.
    #[must_use]
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            vote: default_vote_limit(),
            token_request: default_token_request_limit(),
            submit_content: default_submit_content_limit(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_vote_limit() -> LimitRule {
    LimitRule::new(30, 60)
}

const fn default_token_request_limit() -> LimitRule {
    LimitRule::new(10, 300)
}

const fn default_submit_content_limit() -> LimitRule {
    LimitRule::new(20, 60)
}

const fn default_cleanup_interval_secs() -> u64 {
    600
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `PULSE_ENV`)
    /// 3. Environment variables with `PULSE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("PULSE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PULSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("PULSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_defaults() {
        let limits = LimitsConfig::default();
        assert_eq!(limits.vote.max_requests, 30);
        assert_eq!(limits.vote.window_secs, 60);
        assert_eq!(limits.token_request.window_secs, 300);
        assert_eq!(limits.cleanup_interval_secs, 600);
    }
}
