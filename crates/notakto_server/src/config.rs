//! Server configuration.
//!
//! Values come from an optional TOML file, then `NOTAKTO_*` environment
//! variables, then command-line flags, each overriding the last.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    host: String,
    /// Port to bind.
    port: u16,
    /// Coins charged for skipping a turn.
    skip_cost: i64,
    /// Tracing filter used when `RUST_LOG` is unset.
    log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            skip_cost: 200,
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServerConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ServerConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ServerConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ServerConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file if given, otherwise starts from defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ServerConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies `NOTAKTO_HOST`, `NOTAKTO_PORT`, `NOTAKTO_SKIP_COST` and
    /// `NOTAKTO_LOG` as read through `lookup`.
    #[instrument(skip(self, lookup))]
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ServerConfigError> {
        if let Some(host) = lookup("NOTAKTO_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("NOTAKTO_PORT") {
            self.port = port
                .parse()
                .map_err(|e| ServerConfigError::new(format!("Invalid NOTAKTO_PORT {:?}: {}", port, e)))?;
        }
        if let Some(cost) = lookup("NOTAKTO_SKIP_COST") {
            self.skip_cost = cost.parse().map_err(|e| {
                ServerConfigError::new(format!("Invalid NOTAKTO_SKIP_COST {:?}: {}", cost, e))
            })?;
        }
        if let Some(filter) = lookup("NOTAKTO_LOG") {
            self.log_filter = filter;
        }
        self.validate()?;
        Ok(self)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Replaces the skip cost.
    pub fn with_skip_cost(mut self, skip_cost: i64) -> Self {
        self.skip_cost = skip_cost;
        self
    }

    fn validate(&self) -> Result<(), ServerConfigError> {
        if self.skip_cost < 0 {
            return Err(ServerConfigError::new(format!(
                "skip_cost must not be negative, got {}",
                self.skip_cost
            )));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ServerConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServerConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = ServerConfig::from_toml("port = 8080\n").unwrap();
        assert_eq!(*config.port(), 8080);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.skip_cost(), 200);
    }

    #[test]
    fn test_negative_skip_cost_is_rejected() {
        assert!(ServerConfig::from_toml("skip_cost = -5\n").is_err());
    }

    #[test]
    fn test_env_then_flags() {
        let config = ServerConfig::default()
            .with_env(|key| match key {
                "NOTAKTO_PORT" => Some("4000".to_string()),
                "NOTAKTO_HOST" => Some("0.0.0.0".to_string()),
                _ => None,
            })
            .unwrap()
            .with_overrides(None, Some(5000));
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 5000);
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let result = ServerConfig::default().with_env(|key| {
            (key == "NOTAKTO_PORT").then(|| "not-a-port".to_string())
        });
        let err = result.unwrap_err();
        assert!(err.message.contains("NOTAKTO_PORT"));
    }
}
