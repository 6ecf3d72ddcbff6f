//! Bounded-concurrency optimization stage
//!
//! Items are admitted one at a time, each admission holding a permit from a
//! semaphore sized to the concurrency limit. Upstream is only polled while a
//! permit is available, so at most `concurrency` transforms are ever in flight.
//!
//! Empty and unsupported items are admitted the same way: while every permit
//! is held by a transform they wait in upstream like any other item. Once
//! classified they give their permit back immediately and never occupy a
//! transform slot.
//!
//! Results are forwarded in completion order, not input order.

use crate::error::{StageError, StageResult};
use crate::item::{Contents, WorkItem};
use crate::options::{StageConfig, StageOptions};
use crate::report::{ItemOutcome, Reporter, TracingReporter};
use crate::stats::{RunSummary, SharedStatistics};
use crate::transform::{TransformRequest, Transformer};
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use optidash_api_client::OptidashClient;
use optidash_image::is_optimizable;
use std::pin::pin;
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Default capacity of the channel created by [`OptimizeStage::spawn`]
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// What to do with an admitted item
enum Admission {
    /// Forward unchanged
    PassThrough(WorkItem),
    /// Forward unchanged after a notice
    Skip(WorkItem),
    /// Send through the transformer
    Optimize(WorkItem, Vec<u8>),
}

/// Optimizes image items through a [`Transformer`] with bounded concurrency
pub struct OptimizeStage<T = OptidashClient, R = TracingReporter> {
    config: StageConfig,
    transformer: T,
    reporter: R,
    stats: SharedStatistics,
}

impl OptimizeStage {
    /// Build a stage backed by the Optidash API
    ///
    /// Fails with [`StageError::Configuration`] when the API key is missing
    /// or the client settings are invalid.
    pub fn new(options: StageOptions) -> StageResult<Self> {
        let config = options.validate()?;
        let client = OptidashClient::with_config(config.client_config())
            .map_err(|e| StageError::configuration(e.to_string()))?;

        Ok(Self::from_parts(config, client, TracingReporter))
    }
}

impl<T: Transformer> OptimizeStage<T> {
    /// Build a stage around a custom transformer
    pub fn with_transformer(options: StageOptions, transformer: T) -> StageResult<Self> {
        let config = options.validate()?;
        Ok(Self::from_parts(config, transformer, TracingReporter))
    }
}

impl<T: Transformer, R: Reporter> OptimizeStage<T, R> {
    fn from_parts(config: StageConfig, transformer: T, reporter: R) -> Self {
        Self {
            config,
            transformer,
            reporter,
            stats: SharedStatistics::new(),
        }
    }

    /// Replace the diagnostic sink
    pub fn with_reporter<R2: Reporter>(self, reporter: R2) -> OptimizeStage<T, R2> {
        OptimizeStage {
            config: self.config,
            transformer: self.transformer,
            reporter,
            stats: self.stats,
        }
    }

    /// Validated configuration
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Live handle on the running totals
    pub fn statistics(&self) -> SharedStatistics {
        self.stats.clone()
    }

    /// Drive `input` to completion, forwarding every emitted item to `downstream`.
    ///
    /// Returns the run summary once upstream is exhausted and every in-flight
    /// transform has finished. The first stream item or failed transform aborts
    /// the run; transforms still in flight are dropped and nothing more is
    /// forwarded. `downstream` is dropped on return, which signals completion
    /// to the receiver.
    #[instrument(skip_all, fields(concurrency = self.config.concurrency()))]
    pub async fn run<S>(self, input: S, downstream: mpsc::Sender<WorkItem>) -> StageResult<RunSummary>
    where
        S: Stream<Item = WorkItem> + Send,
    {
        let limiter = Arc::new(Semaphore::new(self.config.concurrency()));
        let mut input = pin!(input.fuse());
        let mut in_flight = FuturesUnordered::new();
        let mut exhausted = false;

        loop {
            tokio::select! {
                biased;

                Some(done) = in_flight.next(), if !in_flight.is_empty() => {
                    forward(&downstream, done?).await?;
                }

                admitted = admit(&limiter, &mut input), if !exhausted => {
                    let Some((item, permit)) = admitted else {
                        debug!("Upstream exhausted");
                        exhausted = true;
                        continue;
                    };

                    match classify(item)? {
                        Admission::PassThrough(item) => {
                            drop(permit);
                            forward(&downstream, item).await?;
                        }
                        Admission::Skip(item) => {
                            drop(permit);
                            self.reporter.skipped(&item);
                            forward(&downstream, item).await?;
                        }
                        Admission::Optimize(item, bytes) => {
                            in_flight.push(self.optimize(item, bytes, permit));
                        }
                    }
                }

                else => break,
            }
        }

        Ok(self.flush())
    }

    /// Run on a spawned task with a fresh channel of `capacity` items
    pub fn spawn<S>(
        self,
        input: S,
        capacity: usize,
    ) -> (mpsc::Receiver<WorkItem>, JoinHandle<StageResult<RunSummary>>)
    where
        S: Stream<Item = WorkItem> + Send + 'static,
        T: 'static,
        R: 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(self.run(input, tx));
        (rx, handle)
    }

    async fn optimize(
        &self,
        mut item: WorkItem,
        contents: Vec<u8>,
        _permit: OwnedSemaphorePermit,
    ) -> StageResult<WorkItem> {
        let request = TransformRequest {
            path: item.path().to_path_buf(),
            file_name: item.file_name(),
            contents,
            compression: self.config.compression(),
        };

        let optimized = self
            .transformer
            .optimize(request)
            .await
            .map_err(|e| StageError::remote(item.path(), e))?;

        let outcome = ItemOutcome::from(&optimized.meta);
        self.stats.record(outcome.input_bytes, outcome.output_bytes);
        item.set_contents(Contents::Buffer(optimized.data));
        self.reporter.optimized(&item, &outcome);

        Ok(item)
    }

    fn flush(&self) -> RunSummary {
        let summary = self.stats.snapshot().summary();
        self.reporter.finished(&summary);
        summary
    }
}

/// Wait for a permit, then for the next upstream item.
///
/// Both awaits are cancel-safe: losing the select race drops the permit and
/// leaves the item in upstream. A closed limiter ends admission the same way
/// an exhausted upstream does.
async fn admit<S>(limiter: &Arc<Semaphore>, input: &mut S) -> Option<(WorkItem, OwnedSemaphorePermit)>
where
    S: Stream<Item = WorkItem> + Unpin,
{
    let permit = Arc::clone(limiter).acquire_owned().await.ok()?;
    input.next().await.map(|item| (item, permit))
}

fn classify(mut item: WorkItem) -> StageResult<Admission> {
    match item.contents() {
        Contents::Empty => Ok(Admission::PassThrough(item)),
        Contents::Stream(_) => Err(StageError::UnsupportedInputKind {
            path: item.path().to_path_buf(),
        }),
        Contents::Buffer(_) if !is_optimizable(item.path()) => Ok(Admission::Skip(item)),
        Contents::Buffer(_) => match item.take_buffer() {
            Some(bytes) => Ok(Admission::Optimize(item, bytes)),
            None => Ok(Admission::PassThrough(item)),
        },
    }
}

async fn forward(downstream: &mpsc::Sender<WorkItem>, item: WorkItem) -> StageResult<()> {
    downstream
        .send(item)
        .await
        .map_err(|_| StageError::DownstreamClosed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ContentKind;

    #[test]
    fn test_classify() {
        assert!(matches!(
            classify(WorkItem::empty("a.png")),
            Ok(Admission::PassThrough(_))
        ));
        assert!(matches!(
            classify(WorkItem::stream("a.png", &b"x"[..])),
            Err(StageError::UnsupportedInputKind { .. })
        ));
        assert!(matches!(
            classify(WorkItem::buffer("notes.txt", vec![1])),
            Ok(Admission::Skip(_))
        ));
        assert!(matches!(
            classify(WorkItem::buffer("noext", vec![1])),
            Ok(Admission::Skip(_))
        ));

        match classify(WorkItem::buffer("Photo.JPG", vec![1, 2])) {
            Ok(Admission::Optimize(item, bytes)) => {
                assert_eq!(bytes, vec![1, 2]);
                assert_eq!(item.kind(), ContentKind::Empty);
            }
            _ => panic!("expected an optimizable item"),
        }
    }

    #[tokio::test]
    async fn test_admit_holds_permit() {
        let limiter = Arc::new(Semaphore::new(1));
        let mut input = futures::stream::iter(vec![WorkItem::empty("a.png")]);

        let (item, permit) = admit(&limiter, &mut input).await.unwrap();
        assert_eq!(item.path(), std::path::Path::new("a.png"));
        assert_eq!(limiter.available_permits(), 0);

        drop(permit);
        assert_eq!(limiter.available_permits(), 1);
        assert!(admit(&limiter, &mut input).await.is_none());
    }

    #[tokio::test]
    async fn test_admit_stops_on_closed_limiter() {
        let limiter = Arc::new(Semaphore::new(1));
        limiter.close();
        let mut input = futures::stream::iter(vec![WorkItem::empty("a.png")]);

        assert!(admit(&limiter, &mut input).await.is_none());
        assert!(input.next().await.is_some());
    }

    #[test]
    fn test_new_requires_key() {
        assert!(matches!(
            OptimizeStage::new(StageOptions::new()),
            Err(StageError::Configuration(_))
        ));
        assert!(OptimizeStage::new(StageOptions::new().api_key("k")).is_ok());
    }
}
