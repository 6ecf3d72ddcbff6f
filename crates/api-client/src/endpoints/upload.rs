//! Upload endpoint

use crate::client::OptidashClient;
use crate::error::{ApiError, ApiResult};
use optidash_core::Compression;
use serde::{Deserialize, Serialize};

/// Response header carrying JSON metadata in binary response mode
pub const META_HEADER: &str = "X-Optidash-Meta";

/// Pending upload of one image
///
/// Created by [`OptidashClient::upload`]; send it with [`UploadRequest::to_buffer`].
#[derive(Clone)]
pub struct UploadRequest {
    client: OptidashClient,
    file_name: String,
    data: Vec<u8>,
    options: RequestOptions,
}

impl UploadRequest {
    pub(crate) fn new(client: OptidashClient, file_name: String, data: Vec<u8>) -> Self {
        Self {
            client,
            file_name,
            data,
            options: RequestOptions::default(),
        }
    }

    /// Set the compression level
    #[must_use]
    pub fn compression(mut self, compression: Compression) -> Self {
        self.options.optimize.compression = compression;
        self
    }

    /// File name sent with the upload
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Bytes that will be uploaded
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Options serialized into the `data` form field
    #[must_use]
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Send the upload and return the optimized bytes with their metadata
    pub async fn to_buffer(self) -> ApiResult<OptimizedImage> {
        self.client.send_upload(&self).await
    }
}

/// JSON options accompanying an upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Optimization settings
    pub optimize: OptimizeOptions,
    /// How the service returns the result
    pub response: ResponseOptions,
}

/// Optimization settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeOptions {
    /// Compression level
    pub compression: Compression,
}

/// Response settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseOptions {
    /// Response mode
    pub mode: ResponseMode,
}

/// Response mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Optimized bytes in the body, metadata in [`META_HEADER`]
    #[default]
    Binary,
}

/// Metadata describing one optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationMeta {
    /// Whether the service reports success
    #[serde(default = "default_true")]
    pub success: bool,
    /// Service status code
    #[serde(default)]
    pub code: Option<u16>,
    /// Request identifier assigned by the service
    #[serde(default)]
    pub id: Option<String>,
    /// Reason given when `success` is false
    #[serde(default)]
    pub message: Option<String>,
    /// Input image details
    #[serde(default)]
    pub input: InputMeta,
    /// Output image details
    #[serde(default)]
    pub output: OutputMeta,
}

fn default_true() -> bool {
    true
}

impl OptimizationMeta {
    /// Bytes saved; negative when the output grew
    #[must_use]
    pub fn saved_bytes(&self) -> i64 {
        self.input.bytes as i64 - self.output.bytes as i64
    }

    /// Parse the value of [`META_HEADER`]
    pub fn from_header(value: &str) -> ApiResult<Self> {
        serde_json::from_str(value).map_err(ApiError::Json)
    }
}

/// Input image details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputMeta {
    /// Original file name
    #[serde(default)]
    pub name: Option<String>,
    /// Size in bytes
    pub bytes: u64,
    /// Width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels
    #[serde(default)]
    pub height: Option<u32>,
    /// Detected format
    #[serde(default)]
    pub format: Option<String>,
}

/// Output image details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputMeta {
    /// Size in bytes
    pub bytes: u64,
    /// Width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels
    #[serde(default)]
    pub height: Option<u32>,
    /// Output format
    #[serde(default)]
    pub format: Option<String>,
}

/// Optimized bytes plus the metadata reported for them
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    /// Size metadata
    pub meta: OptimizationMeta,
    /// Optimized file contents
    pub data: Vec<u8>,
}

/// Error payload returned with non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
