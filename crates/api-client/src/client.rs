//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::upload::ErrorBody;
use crate::endpoints::{OptimizationMeta, OptimizedImage, UploadRequest, META_HEADER};
use crate::error::{ApiError, ApiResult, ErrorContext};
use optidash_image::{detect_format, ImageFormat};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Optidash API client with retry and request correlation
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct OptidashClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl OptidashClient {
    /// Create a new client with configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Start an upload of `data` under `file_name`
    #[must_use]
    pub fn upload(&self, file_name: impl Into<String>, data: Vec<u8>) -> UploadRequest {
        UploadRequest::new(self.clone(), file_name.into(), data)
    }

    /// Execute an upload with retry
    #[instrument(skip(self, request), fields(file = %request.file_name(), bytes = request.data().len()))]
    pub(crate) async fn send_upload(&self, request: &UploadRequest) -> ApiResult<OptimizedImage> {
        let url = self.config.upload_url();
        let request_id = Uuid::new_v4().to_string();

        let result = self.execute_with_retry(&request_id, &url, request).await;

        if let Err(ref e) = result {
            let context = ErrorContext {
                request_id: Some(request_id),
                endpoint: url,
                method: "POST".to_string(),
            };
            warn!(context = %context, error = %e, "Upload failed");
        }

        result
    }

    /// Execute request with retry logic
    async fn execute_with_retry(
        &self,
        request_id: &str,
        url: &str,
        request: &UploadRequest,
    ) -> ApiResult<OptimizedImage> {
        let retry_config = &self.config.retry;
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..retry_config.max_attempts {
            // Wait before retry (except first attempt)
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self.execute_single_upload(request_id, url, request).await;
            let elapsed = start.elapsed();

            match result {
                Ok(value) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => {
                    if e.is_retryable() && retry_config.has_attempts_left(attempt + 1) {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Request failed, will retry"
                        );
                        last_error = Some(e);
                    } else {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Request failed, not retrying"
                        );
                        return Err(e);
                    }
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: retry_config.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single upload without retry
    async fn execute_single_upload(
        &self,
        request_id: &str,
        url: &str,
        request: &UploadRequest,
    ) -> ApiResult<OptimizedImage> {
        let form = build_form(request)?;
        let api_key = self.config.api_key.as_deref().ok_or(ApiError::MissingApiKey)?;

        let response = self
            .inner
            .post(url)
            .header(X_REQUEST_ID, request_id)
            .basic_auth(api_key, None::<&str>)
            .multipart(form)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Split a binary-mode response into metadata and bytes
    async fn handle_response(&self, response: Response) -> ApiResult<OptimizedImage> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| {
                    if text.is_empty() {
                        status.canonical_reason().unwrap_or("Unknown error").to_string()
                    } else {
                        text
                    }
                });
            return Err(ApiError::api_response(status.as_u16(), message));
        }

        let meta = response
            .headers()
            .get(META_HEADER)
            .ok_or(ApiError::MissingMetadata(META_HEADER))?
            .to_str()
            .map_err(|_| ApiError::MissingMetadata(META_HEADER))
            .and_then(OptimizationMeta::from_header)?;

        if !meta.success {
            let message = meta
                .message
                .unwrap_or_else(|| "Service reported a failed optimization".to_string());
            return Err(ApiError::api_response(meta.code.unwrap_or(status.as_u16()), message));
        }

        let data = response.bytes().await?.to_vec();

        Ok(OptimizedImage { meta, data })
    }
}

/// Build the multipart body for one attempt
fn build_form(request: &UploadRequest) -> ApiResult<Form> {
    let mime = ImageFormat::from_path(request.file_name())
        .or_else(|| detect_format(request.data()).ok())
        .map_or("application/octet-stream", |format| format.mime_type());

    let file = Part::bytes(request.data().to_vec())
        .file_name(request.file_name().to_string())
        .mime_str(mime)?;
    let data = Part::text(serde_json::to_string(request.options())?).mime_str("application/json")?;

    Ok(Form::new().part("file", file).part("data", data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use optidash_core::Compression;

    #[test]
    fn test_client_requires_api_key() {
        let result = OptidashClient::with_config(ClientConfig::default());
        assert!(matches!(result, Err(ApiError::MissingApiKey)));
    }

    #[test]
    fn test_client_creation() {
        let client = OptidashClient::with_config(ClientConfig::default().with_api_key("key"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_upload_builder() {
        let client = OptidashClient::with_config(ClientConfig::default().with_api_key("key")).unwrap();
        let request = client
            .upload("img/a.png", vec![1, 2, 3])
            .compression(Compression::High);

        assert_eq!(request.file_name(), "img/a.png");
        assert_eq!(request.data(), &[1u8, 2, 3][..]);
        assert_eq!(request.options().optimize.compression, Compression::High);
        assert!(build_form(&request).is_ok());
    }
}
