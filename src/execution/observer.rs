use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Execution events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted {
        operation: &'static str,
        rows: usize,
    },
    ThrottleWaited {
        duration: Duration,
    },
    ChunkStarted {
        start_row: usize,
        row_count: usize,
    },
    ChunkFinished {
        output_rows: usize,
    },
    GroupsMerged {
        groups: usize,
    },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Forwards execution events to `tracing`.
///
/// Run boundaries log at `debug`, per-chunk events at `trace`.
#[derive(Debug, Default)]
pub struct TracingExecutionObserver;

impl ExecutionObserver for TracingExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::RunStarted { operation, rows } => {
                tracing::debug!(target: "execution", operation, rows, "run started");
            }
            ExecutionEvent::RunFinished { elapsed, metrics } => {
                tracing::debug!(target: "execution", ?elapsed, %metrics, "run finished");
            }
            ExecutionEvent::GroupsMerged { groups } => {
                tracing::debug!(target: "execution", groups, "merged partial groups");
            }
            other => tracing::trace!(target: "execution", event = ?other),
        }
    }
}

/// Live counters for the engine's most recent run.
///
/// The engine resets them when a run starts and updates them from worker threads as chunks
/// complete. [`ExecutionMetrics::snapshot`] may be called from any thread, mid-run included.
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    started_at: Mutex<Option<Instant>>,
    elapsed_ns: AtomicU64,
    rows: RowCounters,
    chunks: ChunkCounters,
}

#[derive(Debug, Default)]
struct RowCounters {
    read: AtomicU64,
    emitted: AtomicU64,
}

#[derive(Debug, Default)]
struct ChunkCounters {
    started: AtomicU64,
    finished: AtomicU64,
    throttle_wait_ns: AtomicU64,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

impl ExecutionMetrics {
    /// Metrics with no run recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// When the current run began, if any run has started.
    pub fn run_started(&self) -> Option<Instant> {
        *self.started_at.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
            rows_processed: self.rows.read.load(Ordering::SeqCst),
            rows_emitted: self.rows.emitted.load(Ordering::SeqCst),
            chunks_started: self.chunks.started.load(Ordering::SeqCst),
            chunks_finished: self.chunks.finished.load(Ordering::SeqCst),
            throttle_wait: Duration::from_nanos(self.chunks.throttle_wait_ns.load(Ordering::SeqCst)),
            max_active_chunks: self.chunks.peak_active.load(Ordering::SeqCst),
        }
    }

    /// Bump the run id, stamp the start time and zero every counter.
    pub(crate) fn start_run(&self) {
        self.run_id.fetch_add(1, Ordering::SeqCst);
        *self.started_at.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        self.elapsed_ns.store(0, Ordering::SeqCst);
        for counter in [
            &self.rows.read,
            &self.rows.emitted,
            &self.chunks.started,
            &self.chunks.finished,
            &self.chunks.throttle_wait_ns,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
        self.chunks.active.store(0, Ordering::SeqCst);
        self.chunks.peak_active.store(0, Ordering::SeqCst);
    }

    pub(crate) fn finish_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(saturating_nanos(elapsed), Ordering::SeqCst);
    }

    /// A chunk acquired its permit and is about to run.
    pub(crate) fn record_chunk_started(&self) {
        self.chunks.started.fetch_add(1, Ordering::SeqCst);
        let active = self.chunks.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.chunks.peak_active.fetch_max(active, Ordering::SeqCst);
    }

    /// A chunk of `rows_in` input rows finished, producing `rows_out` items.
    pub(crate) fn record_chunk_finished(&self, rows_in: usize, rows_out: usize) {
        self.rows.read.fetch_add(rows_in as u64, Ordering::SeqCst);
        self.rows.emitted.fetch_add(rows_out as u64, Ordering::SeqCst);
        self.chunks.finished.fetch_add(1, Ordering::SeqCst);
        self.chunks.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn record_throttle_wait(&self, waited: Duration) {
        self.chunks.throttle_wait_ns.fetch_add(saturating_nanos(waited), Ordering::SeqCst);
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Point-in-time copy of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    /// Increments once per engine run.
    pub run_id: u64,
    /// Wall time of the last finished run; `None` while a run is in progress.
    pub elapsed: Option<Duration>,
    /// Input rows consumed by finished chunks.
    pub rows_processed: u64,
    /// Items produced by finished chunks: kept rows for a filter, partial groups for an
    /// aggregation.
    pub rows_emitted: u64,
    pub chunks_started: u64,
    pub chunks_finished: u64,
    /// Total time chunks spent waiting for an in-flight permit.
    pub throttle_wait: Duration,
    /// Highest number of chunks running at once.
    pub max_active_chunks: usize,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run {}: {} rows in, {} out, {}/{} chunks, peak {} active, waited {:?}",
            self.run_id,
            self.rows_processed,
            self.rows_emitted,
            self.chunks_finished,
            self.chunks_started,
            self.max_active_chunks,
            self.throttle_wait,
        )?;
        if let Some(elapsed) = self.elapsed {
            write!(f, ", took {elapsed:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ExecutionMetrics;
    use std::time::Duration;

    #[test]
    fn counters_reset_between_runs() {
        let metrics = ExecutionMetrics::new();
        metrics.start_run();
        metrics.record_chunk_started();
        metrics.record_chunk_started();
        metrics.record_chunk_finished(10, 4);
        metrics.record_chunk_finished(5, 5);
        metrics.record_throttle_wait(Duration::from_millis(2));
        metrics.finish_run(Duration::from_millis(7));

        let first = metrics.snapshot();
        assert_eq!(first.run_id, 1);
        assert_eq!(first.rows_processed, 15);
        assert_eq!(first.rows_emitted, 9);
        assert_eq!(first.max_active_chunks, 2);
        assert_eq!(first.throttle_wait, Duration::from_millis(2));
        assert_eq!(first.elapsed, Some(Duration::from_millis(7)));
        assert_eq!(
            first.to_string(),
            "run 1: 15 rows in, 9 out, 2/2 chunks, peak 2 active, waited 2ms, took 7ms"
        );

        metrics.start_run();
        let second = metrics.snapshot();
        assert_eq!(second.run_id, 2);
        assert_eq!(second.rows_processed, 0);
        assert_eq!(second.elapsed, None);
        assert!(metrics.run_started().is_some());
    }
}
