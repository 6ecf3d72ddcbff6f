//! HTTP client for the Optidash image optimization API
//!
//! Uploads image bytes, asks the service to optimize them at a given
//! compression level, and returns the optimized bytes together with the
//! size metadata reported by the service.
//!
//! # Features
//!
//! - **Environment-based configuration**: API key, URL and timeout from environment variables
//! - **Retry with exponential backoff**: transient failures (connect, timeout, 5xx, 429) are retried
//! - **Request correlation**: every request carries a unique `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use optidash_api_client::{OptidashClient, ClientConfig};
//! use optidash_core::Compression;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OptidashClient::with_config(ClientConfig::default().with_api_key("key"))?;
//!
//!     let bytes = std::fs::read("photo.jpg")?;
//!     let optimized = client
//!         .upload("photo.jpg", bytes)
//!         .compression(Compression::High)
//!         .to_buffer()
//!         .await?;
//!
//!     println!("{} -> {} bytes", optimized.meta.input.bytes, optimized.meta.output.bytes);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::OptidashClient;
pub use config::ClientConfig;
pub use endpoints::{OptimizationMeta, OptimizedImage, UploadRequest};
pub use error::{ApiError, ApiResult};
