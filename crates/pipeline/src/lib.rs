//! Bounded-concurrency image optimization stage
//!
//! [`OptimizeStage`] consumes a stream of [`WorkItem`]s and forwards each one
//! downstream:
//!
//! - items without content pass through
//! - items whose extension is not an optimizable image pass through with a notice
//! - streamed items abort the run
//! - image items are replaced by the optimized bytes; a failed transform aborts the run
//!
//! At most `concurrency` transforms run at once. After upstream is exhausted
//! and every transform has finished, the stage reports one summary of the
//! bytes saved.
//!
//! # Example
//!
//! ```rust,no_run
//! use futures::stream;
//! use optidash_pipeline::{OptimizeStage, StageOptions, WorkItem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stage = OptimizeStage::new(StageOptions::new().api_key("key").concurrency(4))?;
//!
//!     let items = vec![WorkItem::buffer("logo.png", std::fs::read("logo.png")?)];
//!     let (mut rx, handle) = stage.spawn(stream::iter(items), 16);
//!
//!     while let Some(item) = rx.recv().await {
//!         println!("{}", item.path().display());
//!     }
//!
//!     let summary = handle.await??;
//!     println!("{}", summary.message());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod item;
pub mod options;
pub mod report;
pub mod stage;
pub mod stats;
pub mod transform;

pub use error::{StageError, StageResult};
pub use item::{ContentKind, Contents, WorkItem};
pub use options::{StageConfig, StageOptions};
pub use report::{ItemOutcome, Reporter, SilentReporter, TracingReporter};
pub use stage::{OptimizeStage, DEFAULT_CHANNEL_CAPACITY};
pub use stats::{RunStatistics, RunSummary, SharedStatistics};
pub use transform::{TransformRequest, Transformer};
