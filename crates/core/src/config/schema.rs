//! Configuration schema definitions
//!
//! Mirrors the layout of `optidash.toml`:
//!
//! ```toml
//! [optimizer]
//! api_key = "..."
//! compression = "high"
//! concurrency = 4
//!
//! [client]
//! base_url = "https://api.optidash.ai/1.0"
//! timeout_secs = 30
//!
//! [logging]
//! level = "debug"
//! ```

use crate::error::{Error, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of optimizations in flight
pub const DEFAULT_CONCURRENCY: i64 = 6;

/// Compression level requested from the optimization service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Lossless or near-lossless
    Low,
    /// Balanced quality and size
    #[default]
    Medium,
    /// Smallest output
    High,
}

impl Compression {
    /// Wire name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::Low => "low",
            Compression::Medium => "medium",
            Compression::High => "high",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Compression::Low),
            "medium" => Ok(Compression::Medium),
            "high" => Ok(Compression::High),
            other => Err(Error::new(
                ErrorCode::InvalidConfigValue,
                format!("Unknown compression level: {other}"),
            )
            .with_suggestion("Use one of: low, medium, high")),
        }
    }
}

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    #[serde(default)]
    pub client: ClientSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Optimization options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Optidash API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Compression level
    #[serde(default)]
    pub compression: Compression,

    /// Maximum optimizations in flight; values below 1 are treated as 1
    #[serde(default = "default_concurrency")]
    pub concurrency: i64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            compression: Compression::default(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> i64 {
    DEFAULT_CONCURRENCY
}

/// HTTP client options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSection {
    /// Override for the API base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

/// Logging options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_parse() {
        assert_eq!("HIGH".parse::<Compression>().unwrap(), Compression::High);
        assert_eq!(" low ".parse::<Compression>().unwrap(), Compression::Low);
        assert!("ultra".parse::<Compression>().is_err());
    }

    #[test]
    fn test_compression_default_is_medium() {
        assert_eq!(Compression::default(), Compression::Medium);
        assert_eq!(Compression::default().to_string(), "medium");
    }

    #[test]
    fn test_schema_defaults_from_empty_toml() {
        let schema: ConfigSchema = toml::from_str("").unwrap();
        assert!(schema.optimizer.api_key.is_none());
        assert_eq!(schema.optimizer.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(schema.client.timeout_secs, 30);
        assert_eq!(schema.logging.level, "info");
    }

    #[test]
    fn test_schema_parses_sections() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [optimizer]
            api_key = "secret"
            compression = "high"
            concurrency = 0

            [client]
            base_url = "http://localhost:8080"
            "#,
        )
        .unwrap();

        assert_eq!(schema.optimizer.api_key.as_deref(), Some("secret"));
        assert_eq!(schema.optimizer.compression, Compression::High);
        assert_eq!(schema.optimizer.concurrency, 0);
        assert_eq!(schema.client.base_url.as_deref(), Some("http://localhost:8080"));
    }
}
