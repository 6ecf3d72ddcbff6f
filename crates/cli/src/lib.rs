//! Terminal output helpers for optidash tools
//!
//! - Status lines and per-file savings lines
//! - Durations
//! - Progress bars for file batches

#![warn(missing_docs)]

pub mod output;
pub mod progress;
