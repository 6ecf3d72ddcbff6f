//! Stage options and their validated form

use crate::error::{StageError, StageResult};
use optidash_api_client::ClientConfig;
use optidash_core::config::{ConfigSchema, DEFAULT_CONCURRENCY};
use optidash_core::Compression;
use serde::Serialize;
use tokio::sync::Semaphore;

/// Caller-supplied stage options
///
/// Only `api_key` is required. `client` carries the HTTP settings (base URL,
/// timeout, retry); its own key is ignored in favor of `api_key`.
#[derive(Debug, Clone, Default)]
pub struct StageOptions {
    /// Optidash API key
    pub api_key: Option<String>,
    /// Compression level, `medium` when unset
    pub compression: Option<Compression>,
    /// Maximum optimizations in flight, 6 when unset
    pub concurrency: Option<i64>,
    /// HTTP client settings
    pub client: ClientConfig,
}

impl StageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    #[must_use]
    pub fn concurrency(mut self, limit: i64) -> Self {
        self.concurrency = Some(limit);
        self
    }

    #[must_use]
    pub fn client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Validate and fill in defaults
    pub fn validate(self) -> StageResult<StageConfig> {
        StageConfig::try_from(self)
    }
}

impl From<&ConfigSchema> for StageOptions {
    fn from(schema: &ConfigSchema) -> Self {
        Self {
            api_key: schema.optimizer.api_key.clone(),
            compression: Some(schema.optimizer.compression),
            concurrency: Some(schema.optimizer.concurrency),
            client: ClientConfig::from_schema(schema),
        }
    }
}

/// Validated stage configuration
#[derive(Debug, Clone, Serialize)]
pub struct StageConfig {
    #[serde(skip_serializing)]
    api_key: String,
    compression: Compression,
    concurrency: usize,
    #[serde(skip_serializing)]
    client: ClientConfig,
}

impl StageConfig {
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Effective concurrency limit, always at least 1
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Client settings with the stage key applied
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        self.client.clone().with_api_key(self.api_key.clone())
    }
}

impl TryFrom<StageOptions> for StageConfig {
    type Error = StageError;

    fn try_from(options: StageOptions) -> StageResult<Self> {
        let api_key = options
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| StageError::configuration("Please provide a valid Optidash API Key"))?;

        Ok(Self {
            api_key,
            compression: options.compression.unwrap_or_default(),
            concurrency: effective_concurrency(options.concurrency),
            client: options.client,
        })
    }
}

/// Clamp a requested limit into `1..=Semaphore::MAX_PERMITS`
#[must_use]
pub fn effective_concurrency(requested: Option<i64>) -> usize {
    let limit = requested.unwrap_or(DEFAULT_CONCURRENCY).max(1);
    usize::try_from(limit)
        .unwrap_or(Semaphore::MAX_PERMITS)
        .min(Semaphore::MAX_PERMITS)
}
