//! Configuration for the Optidash API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use optidash_core::config::{ConfigSchema, API_KEY_ENV, API_URL_ENV, TIMEOUT_ENV};
use optidash_core::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default Optidash API endpoint
pub const DEFAULT_API_URL: &str = "https://api.optidash.ai/1.0";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API
    pub base_url: String,
    /// API key, sent as the basic-auth user name
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `OPTIDASH_API_KEY`: API key
    /// - `OPTIDASH_API_URL`: Base URL (optional)
    /// - `OPTIDASH_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        let base_url = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());

        let timeout = match env::var(TIMEOUT_ENV) {
            Ok(raw) => raw
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ApiError::config(format!("OPTIDASH_TIMEOUT_SECS is not a number: {raw}")))?,
            Err(_) => Duration::from_secs(30),
        };

        Ok(Self {
            base_url,
            api_key,
            timeout,
            retry: RetryConfig::default(),
        })
    }

    /// Build client settings from a loaded `optidash.toml`
    #[must_use]
    pub fn from_schema(schema: &ConfigSchema) -> Self {
        let retry = RetryConfig {
            max_attempts: schema.client.max_attempts.max(1),
            ..RetryConfig::default()
        };

        Self {
            base_url: schema
                .client
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: schema.optimizer.api_key.clone(),
            timeout: Duration::from_secs(schema.client.timeout_secs),
            retry,
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// URL of the upload endpoint
    #[must_use]
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url.trim_end_matches('/'))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(self.base_url.clone()));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(ApiError::MissingApiKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:9000/")
            .with_api_key("key")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.upload_url(), "http://localhost:9000/upload");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let missing_key = ClientConfig::default();
        assert!(matches!(missing_key.validate(), Err(ApiError::MissingApiKey)));

        let blank_key = ClientConfig::default().with_api_key("  ");
        assert!(matches!(blank_key.validate(), Err(ApiError::MissingApiKey)));

        let bad_url = ClientConfig::default().with_api_key("k").with_base_url("ftp://x");
        assert!(matches!(bad_url.validate(), Err(ApiError::InvalidUrl(_))));

        let zero_timeout = ClientConfig::default()
            .with_api_key("k")
            .with_timeout(Duration::ZERO);
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_from_schema() {
        let mut schema = ConfigSchema::default();
        schema.optimizer.api_key = Some("abc".into());
        schema.client.base_url = Some("http://127.0.0.1:1234".into());
        schema.client.timeout_secs = 5;
        schema.client.max_attempts = 0;

        let config = ClientConfig::from_schema(&schema);
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = ClientConfig::default().with_api_key("secret-key");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-key"));
    }
}
