//! Configuration for waiting on event results.
//!
//! Events never build their own time budget: `get` only consumes whatever
//! [`TimeBudget`](crate::time::TimeBudget) the caller passes in. This module
//! is a convenience for callers that want a process-wide default, turned
//! into a budget with [`EventConfig::timer`].
//!
//! # Configuration Precedence
//!
//! 1. **Programmatic**: values set with `EventConfig` builder methods
//! 2. **Environment variables**: `APPEVENT_*` variables
//! 3. **Config file**: a TOML file (requires the `config-file` feature)
//! 4. **Defaults**: [`EventConfig::default()`]
//!
//! # Supported Environment Variables
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `APPEVENT_DEFAULT_API_TIMEOUT_MS` | `u64` | `default_api_timeout` |

use std::time::Duration;

use crate::time::Timer;

/// Environment variable name for the default API timeout in milliseconds.
pub const ENV_DEFAULT_API_TIMEOUT_MS: &str = "APPEVENT_DEFAULT_API_TIMEOUT_MS";

/// Default time a blocking API call may wait for its event.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(60);

/// Error raised when configuration input cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value of the wrong shape.
    #[error("invalid value for {var}: expected {expected}, got {value:?}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// What was expected.
        expected: &'static str,
        /// What was found.
        value: String,
    },
    /// A config file could not be read.
    #[error("failed to read config file {path}: {reason}")]
    Io {
        /// File path.
        path: String,
        /// Underlying failure.
        reason: String,
    },
    /// A config file could not be parsed.
    #[error("failed to parse TOML config: {0}")]
    Parse(String),
}

/// Settings that shape how long callers wait for event results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventConfig {
    /// Budget given to one blocking API call when the caller names none.
    pub default_api_timeout: Duration,
}

impl EventConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_api_timeout: DEFAULT_API_TIMEOUT,
        }
    }

    /// Sets the default API timeout.
    #[must_use]
    pub const fn with_default_api_timeout(mut self, timeout: Duration) -> Self {
        self.default_api_timeout = timeout;
        self
    }

    /// Builds the default configuration with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();
        apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Starts the countdown for one logical API call.
    ///
    /// Share the returned timer across every wait made on behalf of that
    /// call, so the waits draw from one budget.
    #[must_use]
    pub fn timer(&self) -> Timer {
        Timer::new(self.default_api_timeout)
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment variable overrides to an [`EventConfig`].
///
/// Only variables that are set are applied.
pub fn apply_env_overrides(config: &mut EventConfig) -> Result<(), ConfigError> {
    if let Some(val) = read_env(ENV_DEFAULT_API_TIMEOUT_MS) {
        config.default_api_timeout = parse_millis(ENV_DEFAULT_API_TIMEOUT_MS, &val)?;
    }
    Ok(())
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_millis(var: &'static str, val: &str) -> Result<Duration, ConfigError> {
    val.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidEnv {
            var,
            expected: "milliseconds as unsigned integer",
            value: val.to_string(),
        })
}

// =========================================================================
// TOML config file support (feature-gated)
// =========================================================================

/// TOML-deserializable event configuration.
///
/// ```toml
/// [events]
/// default_api_timeout_ms = 30000
/// ```
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize, Default, Debug)]
pub struct EventTomlConfig {
    /// Event settings.
    #[serde(default)]
    pub events: EventsToml,
}

/// Events section of the TOML config.
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize, Default, Debug)]
pub struct EventsToml {
    /// Default API timeout in milliseconds.
    pub default_api_timeout_ms: Option<u64>,
}

/// Apply a parsed TOML config. Only fields present in the file override.
#[cfg(feature = "config-file")]
pub fn apply_toml_config(config: &mut EventConfig, toml: &EventTomlConfig) {
    if let Some(ms) = toml.events.default_api_timeout_ms {
        config.default_api_timeout = Duration::from_millis(ms);
    }
}

/// Parse a TOML string into an [`EventTomlConfig`].
#[cfg(feature = "config-file")]
pub fn parse_toml_str(toml_str: &str) -> Result<EventTomlConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Read and parse a TOML file into an [`EventTomlConfig`].
#[cfg(feature = "config-file")]
pub fn parse_toml_file(path: &std::path::Path) -> Result<EventTomlConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_toml_str(&content)
}
