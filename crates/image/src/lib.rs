//! Image format helpers for optidash tools.
//!
//! This crate provides:
//! - The set of formats the optimization service accepts
//! - Case-insensitive lookup by file extension
//! - MIME types for uploads
//! - Format detection from magic bytes

#![warn(missing_docs)]

mod detect;
mod error;

pub use detect::{detect_format, is_optimizable, ImageFormat};
pub use error::{ImageError, Result};
