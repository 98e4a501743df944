//! Single-flight dataset cache
//!
//! Owns the one [`Dataset`] of the process. The first [`DatasetCache::load`]
//! runs the fetch → parse → classify pipeline; overlapping callers wait on
//! that same run and receive its result, success or failure. Every later
//! caller gets the cached `Arc` without I/O.
//!
//! ## Lifecycle
//!
//! `Uninitialized → Loading → Ready`. A failed run (dataset unreachable,
//! unparsable header) goes back to `Uninitialized` so the next `load()`
//! tries again; failures are never cached. If the caller driving a run drops
//! its future, the run is abandoned and a waiting caller starts a new one.

use crate::config::{ColumnMapping, DashboardConfig};
use crate::constants::SLOW_PIPELINE_MS;
use crate::data::csv_parser::parse_records_with;
use crate::data::error::DataResult;
use crate::data::source::{DatasetSource, RemoteSource};
use crate::perf::ScopedTimer;
use crate::types::{Dataset, EntityRoster};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Where the cache is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState {
    Uninitialized,
    Loading,
    Ready,
}

/// Outcome of a run, `None` until the run finishes
type RunOutcome = Option<DataResult<Arc<Dataset>>>;

enum Slot {
    Idle,
    Loading {
        run: usize,
        done: watch::Receiver<RunOutcome>,
    },
    Ready(Arc<Dataset>),
}

enum Role {
    Lead(usize, watch::Sender<RunOutcome>),
    Wait(usize, watch::Receiver<RunOutcome>),
}

pub struct DatasetCache {
    source: Arc<dyn DatasetSource>,
    columns: ColumnMapping,
    slot: Mutex<Slot>,
    pipeline_runs: AtomicUsize,
}

impl DatasetCache {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            columns: ColumnMapping::default(),
            slot: Mutex::new(Slot::Idle),
            pipeline_runs: AtomicUsize::new(0),
        }
    }

    /// Cache over a [`RemoteSource`] built from the config
    pub fn from_config(config: &DashboardConfig) -> DataResult<Self> {
        let source = RemoteSource::from_config(config)?;
        Ok(Self::new(Arc::new(source)).with_columns(config.columns.clone()))
    }

    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Resolve the dataset, running the pipeline only if nothing is cached.
    ///
    /// Concurrent callers share one in-flight run and all see its outcome.
    /// Once a run succeeds the pipeline never runs again for the lifetime of
    /// this cache.
    pub async fn load(&self) -> DataResult<Arc<Dataset>> {
        loop {
            let role = {
                let mut slot = self.slot.lock();
                let in_flight = match &*slot {
                    Slot::Ready(dataset) => return Ok(Arc::clone(dataset)),
                    Slot::Loading { run, done } => Some(Role::Wait(*run, done.clone())),
                    Slot::Idle => None,
                };
                in_flight.unwrap_or_else(|| {
                    let run = self.pipeline_runs.fetch_add(1, Ordering::SeqCst) + 1;
                    let (tx, rx) = watch::channel(None);
                    *slot = Slot::Loading { run, done: rx };
                    Role::Lead(run, tx)
                })
            };

            match role {
                Role::Lead(run, done) => return self.lead(run, done).await,
                Role::Wait(run, mut done) => {
                    let outcome = done.wait_for(Option::is_some).await.map(|o| (*o).clone());
                    if let Ok(Some(result)) = outcome {
                        return result;
                    }
                    debug!(run, "Dataset load abandoned, retrying");
                    self.abandon(run);
                }
            }
        }
    }

    /// Owned variant of [`load`](Self::load) for callers that need a `'static` future.
    pub fn subscribe(
        self: &Arc<Self>,
    ) -> impl Future<Output = DataResult<Arc<Dataset>>> + Send + 'static {
        let cache = Arc::clone(self);
        async move { cache.load().await }
    }

    /// The dataset if a load already completed
    pub fn current(&self) -> Option<Arc<Dataset>> {
        match &*self.slot.lock() {
            Slot::Ready(dataset) => Some(Arc::clone(dataset)),
            _ => None,
        }
    }

    pub fn state(&self) -> CacheState {
        match &*self.slot.lock() {
            Slot::Idle => CacheState::Uninitialized,
            Slot::Loading { .. } => CacheState::Loading,
            Slot::Ready(_) => CacheState::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == CacheState::Ready
    }

    /// Number of times the pipeline has started
    pub fn pipeline_runs(&self) -> usize {
        self.pipeline_runs.load(Ordering::SeqCst)
    }

    /// Drive run `run` and publish its outcome to everyone waiting on it
    async fn lead(&self, run: usize, done: watch::Sender<RunOutcome>) -> DataResult<Arc<Dataset>> {
        let mut leading = LeadGuard {
            cache: self,
            run,
            finished: false,
        };
        let result = self.run_pipeline(run).await;

        // The slot is settled before waiters wake, so `state()` and
        // `current()` always agree.
        *self.slot.lock() = match &result {
            Ok(dataset) => Slot::Ready(Arc::clone(dataset)),
            Err(_) => Slot::Idle,
        };
        leading.finished = true;
        done.send_replace(Some(result.clone()));
        result
    }

    /// Reset the slot if it still belongs to `run`
    fn abandon(&self, run: usize) {
        let mut slot = self.slot.lock();
        if matches!(&*slot, Slot::Loading { run: current, .. } if *current == run) {
            *slot = Slot::Idle;
        }
    }

    async fn run_pipeline(&self, run: usize) -> DataResult<Arc<Dataset>> {
        let _timer = ScopedTimer::new("dataset_pipeline", SLOW_PIPELINE_MS);

        let (text, roster) = tokio::join!(self.source.fetch_dataset(), self.source.fetch_roster());

        let text = text.inspect_err(|err| warn!(run, error = %err, "Dataset fetch failed"))?;
        let roster = roster.unwrap_or_else(|err| {
            warn!(
                run,
                error = %err,
                "Roster unavailable, classifying every entity as a region"
            );
            EntityRoster::empty()
        });

        let outcome = parse_records_with(&text, &self.columns)
            .inspect_err(|err| warn!(run, error = %err, "Dataset parse failed"))?;
        let dataset = Dataset::from_records(outcome.records, &roster);

        info!(
            run,
            records = dataset.len(),
            dropped = outcome.report.dropped(),
            countries = dataset.countries().len(),
            regions = dataset.regions().len(),
            years = dataset.years().len(),
            "Dataset ready"
        );

        Ok(Arc::new(dataset))
    }
}

/// Releases the slot if the leading caller drops its future mid-run.
struct LeadGuard<'a> {
    cache: &'a DatasetCache,
    run: usize,
    finished: bool,
}

impl Drop for LeadGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.cache.abandon(self.run);
        }
    }
}
