use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::filter::FilterContext;

/// Loads one logical dataset for a filter context.
///
/// A view implements this once per endpoint it shows (usually by forwarding
/// to a `StatsProvider`); the polling source takes care of when to call it
/// and whether the result may still be committed.
#[async_trait]
pub trait DatasetLoader: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Fetch the dataset for `filter`.
    ///
    /// Return `CoreError::Cancelled` to report an expected abort; the cycle
    /// is then recorded as cancelled, never as a failure.
    async fn load(&self, filter: &FilterContext) -> Result<Self::Output, CoreError>;
}

/// Where a data source is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Not fetching: never started, stopped, or just superseded.
    Idle,
    /// A fetch generation is in flight. A previous dataset may still be shown.
    Fetching,
    /// The latest fetch committed its dataset.
    Ready,
    /// The latest fetch failed; the previous dataset (if any) is retained.
    Errored,
}

/// What became of one fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Committed,
    Failed,
    /// Superseded before it could commit. Expected, never an error.
    Cancelled,
}

/// Point-in-time summary of one data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: String,
    pub status: SourceStatus,
    pub error: Option<String>,
    pub last_fetched: Option<DateTime<Utc>>,
}

/// Identifies the fetch generation a cycle belongs to. Taking a new token
/// cancels every older one: their results can no longer be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken {
    generation: u64,
}

impl FetchToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct SourceState<T> {
    dataset: Option<T>,
    filter: FilterContext,
    status: SourceStatus,
    generation: u64,
    last_error: Option<String>,
    last_fetched: Option<DateTime<Utc>>,
}

struct Shared<L: DatasetLoader> {
    loader: L,
    state: Mutex<SourceState<L::Output>>,
}

impl<L: DatasetLoader> Shared<L> {
    fn lock(&self) -> MutexGuard<'_, SourceState<L::Output>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Invalidate every outstanding token.
    fn cancel_outstanding(state: &mut SourceState<L::Output>) {
        state.generation += 1;
    }

    fn begin_cycle(&self) -> (FetchToken, FilterContext) {
        let mut state = self.lock();
        Self::cancel_outstanding(&mut state);
        state.status = SourceStatus::Fetching;
        (
            FetchToken {
                generation: state.generation,
            },
            state.filter.clone(),
        )
    }

    async fn run_cycle(&self) -> CycleOutcome {
        let (token, filter) = self.begin_cycle();
        debug!(
            source = self.loader.name(),
            generation = token.generation,
            %filter,
            "Fetch cycle started"
        );
        let result = self.loader.load(&filter).await;
        self.commit(token, &filter, result)
    }

    /// Write a cycle's result, but only if its token is still current.
    /// The check and the write happen under the same lock.
    fn commit(
        &self,
        token: FetchToken,
        filter: &FilterContext,
        result: Result<L::Output, CoreError>,
    ) -> CycleOutcome {
        let mut state = self.lock();
        if state.generation != token.generation {
            debug!(
                source = self.loader.name(),
                generation = token.generation,
                current = state.generation,
                "Discarding superseded fetch result"
            );
            return CycleOutcome::Cancelled;
        }

        match result {
            Ok(dataset) => {
                state.dataset = Some(dataset);
                state.status = SourceStatus::Ready;
                state.last_error = None;
                state.last_fetched = Some(Utc::now());
                debug!(source = self.loader.name(), generation = token.generation, "Dataset committed");
                CycleOutcome::Committed
            }
            Err(e) if e.is_cancellation() => {
                state.status = SourceStatus::Idle;
                debug!(source = self.loader.name(), generation = token.generation, "Fetch cancelled");
                CycleOutcome::Cancelled
            }
            Err(e) => {
                warn!(
                    source = self.loader.name(),
                    generation = token.generation,
                    %filter,
                    error = %e,
                    "Fetch failed, keeping previous dataset"
                );
                state.status = SourceStatus::Errored;
                state.last_error = Some(e.to_string());
                CycleOutcome::Failed
            }
        }
    }
}

/// Owns the fetch / poll / cancel lifecycle of one dataset for one view.
///
/// - `start` fetches immediately, then every `interval`.
/// - `supersede` cancels whatever is in flight, clears the dataset (stale
///   data must never show under a new filter), and restarts polling.
/// - `stop` cancels and stops polling; nothing commits afterwards.
///
/// At most one fetch generation is current at any time. A slow response of
/// an older generation is discarded when it finally arrives.
pub struct PollingDataSource<L: DatasetLoader> {
    shared: Arc<Shared<L>>,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<L: DatasetLoader> PollingDataSource<L> {
    pub fn new(loader: L, interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                loader,
                state: Mutex::new(SourceState {
                    dataset: None,
                    filter: FilterContext::default(),
                    status: SourceStatus::Idle,
                    generation: 0,
                    last_error: None,
                    last_fetched: None,
                }),
            }),
            interval,
            task: Mutex::new(None),
        }
    }

    /// Begin polling for `filter`. A no-op if already polling the same filter.
    pub fn start(&self, filter: FilterContext) {
        if self.is_polling() && self.filter() == filter {
            return;
        }
        self.supersede(filter);
    }

    /// Switch to a new filter context.
    ///
    /// The in-flight request is cancelled before the new fetch begins, so a
    /// late response for the old filter can never overwrite the new one.
    pub fn supersede(&self, filter: FilterContext) {
        self.reset(filter);
        self.spawn_poller();
    }

    /// Cancel everything, clear the dataset and adopt `filter` without
    /// fetching. Used by views that show nothing for some filters.
    pub fn reset(&self, filter: FilterContext) {
        self.abort_task();
        let mut state = self.shared.lock();
        Shared::<L>::cancel_outstanding(&mut state);
        state.dataset = None;
        state.last_error = None;
        state.last_fetched = None;
        state.status = SourceStatus::Idle;
        debug!(source = self.shared.loader.name(), %filter, "Filter context superseded");
        state.filter = filter;
    }

    /// Cancel the in-flight request and stop polling. The last dataset stays readable.
    pub fn stop(&self) {
        self.abort_task();
        let mut state = self.shared.lock();
        Shared::<L>::cancel_outstanding(&mut state);
        if state.status == SourceStatus::Fetching {
            state.status = SourceStatus::Idle;
        }
        debug!(source = self.shared.loader.name(), "Polling stopped");
    }

    /// Run one fetch cycle now, on the caller's task, for the current filter.
    ///
    /// The cycle takes a fresh token, so it supersedes anything in flight;
    /// it is itself discarded if a newer cycle starts before it finishes.
    pub async fn refresh(&self) -> CycleOutcome {
        self.shared.run_cycle().await
    }

    /// Stop polling and run a single cycle for `filter` on the caller's task.
    /// The dataset is kept if the filter is unchanged.
    pub async fn fetch_once(&self, filter: FilterContext) -> CycleOutcome {
        if self.filter() != filter {
            self.reset(filter);
        } else {
            self.abort_task();
        }
        self.refresh().await
    }

    /// Status summary for logs and CLI output.
    pub fn report(&self) -> SourceReport {
        let state = self.shared.lock();
        SourceReport {
            source: self.shared.loader.name().to_string(),
            status: state.status,
            error: state.last_error.clone(),
            last_fetched: state.last_fetched,
        }
    }

    /// A copy of the current dataset; `None` means "still loading".
    pub fn snapshot(&self) -> Option<L::Output> {
        self.shared.lock().dataset.clone()
    }

    pub fn status(&self) -> SourceStatus {
        self.shared.lock().status
    }

    pub fn filter(&self) -> FilterContext {
        self.shared.lock().filter.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.shared.lock().last_error.clone()
    }

    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.shared.lock().last_fetched
    }

    /// Current fetch generation. Increases on every cycle and every cancellation.
    pub fn generation(&self) -> u64 {
        self.shared.lock().generation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_polling(&self) -> bool {
        self.task_slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn abort_task(&self) {
        if let Some(handle) = self.task_slot().take() {
            // Dropping the poll future drops the in-flight request with it.
            handle.abort();
        }
    }

    /// Start the poll task for the current filter. Callers reset first.
    pub(crate) fn spawn_poller(&self) {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!(
                    source = self.shared.loader.name(),
                    "No async runtime available, polling not started"
                );
                return;
            }
        };
        let handle = runtime.spawn(poll_loop(Arc::clone(&self.shared), self.interval));
        *self.task_slot() = Some(handle);
    }
}

impl<L: DatasetLoader> Drop for PollingDataSource<L> {
    fn drop(&mut self) {
        self.abort_task();
    }
}

/// Fetch immediately, then once per tick. A tick that arrives while a cycle
/// is still pending abandons that cycle and starts a fresh one.
async fn poll_loop<L: DatasetLoader>(shared: Arc<Shared<L>>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        let cycle = shared.run_cycle();
        tokio::pin!(cycle);
        tokio::select! {
            _ = &mut cycle => {
                ticker.tick().await;
            }
            _ = ticker.tick() => {
                debug!(source = shared.loader.name(), "Poll tick superseded a pending fetch");
            }
        }
    }
}
