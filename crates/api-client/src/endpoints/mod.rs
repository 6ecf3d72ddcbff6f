//! Endpoint-specific request builders and response types
//!
//! | Module | Endpoint | Description |
//! |--------|----------|-------------|
//! | `upload` | `POST /upload` | Optimize an image sent as multipart upload |

pub mod upload;

pub use upload::{
    InputMeta, OptimizationMeta, OptimizeOptions, OptimizedImage, OutputMeta, RequestOptions,
    ResponseMode, UploadRequest, META_HEADER,
};
