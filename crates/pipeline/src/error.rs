//! Stage errors

use optidash_api_client::ApiError;
use optidash_core::ErrorCode;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for stage operations
pub type StageResult<T> = Result<T, StageError>;

/// Boxed cause of a failed remote transform
pub type TransformCause = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a stage.
///
/// Files the stage does not handle (no content, foreign extension) are passed
/// through and never surface here.
#[derive(Debug, Error)]
pub enum StageError {
    /// Invalid options; raised before the stage exists
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Item content is an incremental stream
    #[error("Streams are not supported: {}", path.display())]
    UnsupportedInputKind {
        /// Offending item
        path: PathBuf,
    },

    /// The remote optimization call failed
    #[error("Failed to optimize {}: {source}", path.display())]
    RemoteTransformFailure {
        /// Offending item
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: TransformCause,
    },

    /// The downstream receiver went away before the stage finished
    #[error("Downstream consumer closed before the stage finished")]
    DownstreamClosed,
}

impl StageError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a remote failure for `path`
    pub fn remote(path: &Path, source: impl Into<TransformCause>) -> Self {
        Self::RemoteTransformFailure {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    /// Path of the item that caused the failure, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::UnsupportedInputKind { path } | Self::RemoteTransformFailure { path, .. } => {
                Some(path)
            }
            Self::Configuration(_) | Self::DownstreamClosed => None,
        }
    }

    /// Map onto the shared error code table
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Configuration(_) => ErrorCode::MissingApiKey,
            Self::UnsupportedInputKind { .. } => ErrorCode::UnsupportedInputKind,
            Self::RemoteTransformFailure { .. } => ErrorCode::RemoteTransformFailed,
            Self::DownstreamClosed => ErrorCode::DownstreamClosed,
        }
    }
}

impl From<StageError> for optidash_core::Error {
    fn from(err: StageError) -> Self {
        let code = err.error_code();
        let path = err.path().map(|p| p.display().to_string());
        let message = err.to_string();

        let mut converted = match err {
            StageError::Configuration(_) => optidash_core::Error::missing_api_key(),
            StageError::RemoteTransformFailure { source, .. } => {
                let code = source
                    .downcast_ref::<ApiError>()
                    .map_or(code, ApiError::error_code);
                let mut converted = optidash_core::Error::new(code, message);
                if code == ErrorCode::Unauthorized {
                    converted = converted.with_suggestion("Check that the Optidash API key is valid");
                }
                converted.with_source(source)
            }
            _ => optidash_core::Error::new(code, message),
        };

        if let Some(path) = path {
            converted = converted.with_context(format!("While processing {path}"));
        }
        converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_failure_carries_path_and_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "503 from upstream");
        let err = StageError::remote(Path::new("img/a.jpg"), cause);

        assert_eq!(err.path(), Some(Path::new("img/a.jpg")));
        assert_eq!(err.error_code(), ErrorCode::RemoteTransformFailed);
        assert!(err.to_string().contains("img/a.jpg"));
        assert!(err.to_string().contains("503 from upstream"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_conversion_to_core_error() {
        let err: optidash_core::Error = StageError::UnsupportedInputKind {
            path: PathBuf::from("video.png"),
        }
        .into();

        assert_eq!(err.code, ErrorCode::UnsupportedInputKind);
        assert_eq!(err.context.as_deref(), Some("While processing video.png"));
        assert_eq!(err.exit_code(), optidash_core::error::exit_codes::INPUT_ERROR);
    }

    #[test]
    fn test_api_error_code_is_kept() {
        let err: optidash_core::Error =
            StageError::remote(Path::new("a.png"), ApiError::api_response(401, "Invalid API Key")).into();

        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert!(err.suggestion.is_some());
        assert_eq!(err.exit_code(), optidash_core::error::exit_codes::REMOTE_ERROR);
    }

    #[test]
    fn test_configuration_maps_to_missing_key() {
        let err: optidash_core::Error = StageError::configuration("no key").into();
        assert_eq!(err.code, ErrorCode::MissingApiKey);
        assert!(err.suggestion.is_some());
    }
}
