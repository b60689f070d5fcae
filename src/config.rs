//! Application configuration loaded from environment variables.
//!
//! All tunables have defaults that work for tests and local development;
//! deployments override them through the environment.

use std::env;

/// Tunables for the statistics updater, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Max read-modify-write attempts before surfacing a conflict
    pub max_commit_attempts: u32,
    /// Max users imported concurrently during a backfill
    pub max_concurrent_imports: usize,
}

impl Default for Config {
    /// Default config, also used for tests.
    fn default() -> Self {
        Self {
            max_commit_attempts: 5,
            max_concurrent_imports: 8,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();
        let config = Self {
            max_commit_attempts: read_var("STATS_MAX_COMMIT_ATTEMPTS", defaults.max_commit_attempts)?,
            max_concurrent_imports: read_var(
                "STATS_MAX_CONCURRENT_IMPORTS",
                defaults.max_concurrent_imports,
            )?,
        };

        if config.max_commit_attempts == 0 {
            return Err(ConfigError::Invalid("STATS_MAX_COMMIT_ATTEMPTS"));
        }
        if config.max_concurrent_imports == 0 {
            return Err(ConfigError::Invalid("STATS_MAX_CONCURRENT_IMPORTS"));
        }

        Ok(config)
    }
}

/// Read an environment variable, falling back to `default` when unset.
fn read_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
