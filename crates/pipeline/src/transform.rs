//! The remote transform seam

use optidash_api_client::{ApiError, OptidashClient, OptimizedImage};
use optidash_core::Compression;
use std::future::Future;
use std::path::PathBuf;

/// One optimization request handed to a [`Transformer`]
#[derive(Debug, Clone)]
pub struct TransformRequest {
    /// Full path of the item
    pub path: PathBuf,
    /// Name the bytes are uploaded under
    pub file_name: String,
    /// Original bytes
    pub contents: Vec<u8>,
    /// Requested compression level
    pub compression: Compression,
}

/// Something that turns image bytes into optimized image bytes.
///
/// [`OptidashClient`] is the production implementation. Futures must be
/// `Send` so a stage can run on a multi-threaded runtime.
pub trait Transformer: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn optimize(
        &self,
        request: TransformRequest,
    ) -> impl Future<Output = Result<OptimizedImage, Self::Error>> + Send;
}

impl Transformer for OptidashClient {
    type Error = ApiError;

    async fn optimize(&self, request: TransformRequest) -> Result<OptimizedImage, ApiError> {
        self.upload(request.file_name, request.contents)
            .compression(request.compression)
            .to_buffer()
            .await
    }
}
