//! Core utilities for optidash tools
//!
//! Shared functionality used by the API client, the pipeline and the CLI:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Retry policy**: exponential backoff parameters for flaky remote calls
//! - **Configuration**: `optidash.toml` loading with environment overrides
//! - **Formatting**: byte sizes, percentages and counts for user-facing messages
//!
//! # Example
//!
//! ```rust,no_run
//! use optidash_core::config::Config;
//!
//! let config = Config::load(None).expect("valid config").with_env();
//! println!("compression: {}", config.schema.optimizer.compression);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod format;
pub mod retry;

pub use config::Compression;
pub use error::{Error, ErrorCode, Result};
