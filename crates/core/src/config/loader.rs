//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use std::path::{Path, PathBuf};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPTIDASH_API_KEY";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "OPTIDASH_API_URL";

/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "OPTIDASH_TIMEOUT_SECS";

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or the first standard location found.
    ///
    /// An explicit path that does not exist is an error; a missing file in the
    /// standard locations falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Overlay values from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |name: &str| lookup(name).filter(|v: &String| !v.trim().is_empty());

        if let Some(key) = present(API_KEY_ENV) {
            self.schema.optimizer.api_key = Some(key);
        }
        if let Some(url) = present(API_URL_ENV) {
            self.schema.client.base_url = Some(url);
        }
        // Unparsable timeouts are ignored.
        if let Some(secs) = present(TIMEOUT_ENV).and_then(|v| v.trim().parse().ok()) {
            self.schema.client.timeout_secs = secs;
        }
        self
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = ["optidash.toml", ".optidash.toml", ".config/optidash.toml"]
        .iter()
        .map(PathBuf::from)
        .collect();

    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("optidash").join("config.toml"));
    }

    candidates.into_iter().find(|candidate| candidate.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::from(e).with_context(format!("Failed to read config file {}", path.display()))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {}", path.display(), e),
        )
    })
}
