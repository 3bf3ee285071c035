//! Chunk-parallel execution of the row transformations.
//!
//! This module sits "above" [`crate::processing`] and provides:
//!
//! - Parallel (chunked) filter and group-by aggregation on a dedicated rayon pool
//! - Throttling of in-flight chunks
//! - Real-time metrics + observer hooks for monitoring
//!
//! Results are identical to the sequential functions: filtered rows keep input order and
//! aggregated groups keep first-seen order.

mod observer;
mod semaphore;

use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ExecutionError;
use crate::processing::aggregate::Grouping;
use crate::processing::{AggregationSpec, FilterClause};
use crate::types::Row;

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, TracingExecutionObserver,
};

use semaphore::Semaphore;

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Number of rows per chunk.
    pub chunk_size: usize,
    /// Upper bound on concurrently executing chunks.
    ///
    /// This is an additional throttle on top of `num_threads`.
    pub max_in_flight_chunks: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = available_threads();
        Self {
            num_threads: Some(n),
            chunk_size: 4_096,
            max_in_flight_chunks: n,
        }
    }
}

fn available_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// A configurable execution engine for large row collections.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("opts", &self.opts)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size == 0`, `max_in_flight_chunks == 0`, or `num_threads == Some(0)`.
    pub fn new(opts: ExecutionOptions) -> Result<Self, ExecutionError> {
        assert!(opts.chunk_size > 0, "chunk_size must be > 0");
        assert!(
            opts.max_in_flight_chunks > 0,
            "max_in_flight_chunks must be > 0"
        );
        if let Some(n) = opts.num_threads {
            assert!(n > 0, "num_threads must be > 0 when set");
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(opts.num_threads.unwrap_or_else(available_threads))
            .build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events.
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Parallel [`crate::processing::filter_data`].
    pub fn filter_parallel(&self, rows: &[Row], clauses: &[FilterClause]) -> Vec<Row> {
        let per_chunk = self.run_chunks("filter", rows, |chunk| {
            let out: Vec<Row> = chunk
                .iter()
                .filter(|row| clauses.iter().all(|c| c.matches(row)))
                .cloned()
                .collect();
            let n = out.len();
            (out, n)
        });
        let out: Vec<Row> = per_chunk.into_iter().flatten().collect();
        self.finish_run();
        out
    }

    /// Parallel [`crate::processing::aggregate_data`].
    ///
    /// Each chunk folds into partial group accumulators which are merged in chunk order.
    pub fn aggregate_parallel(&self, rows: &[Row], group_by: &str, specs: &[AggregationSpec]) -> Vec<Row> {
        let partials = self.run_chunks("aggregate", rows, |chunk| {
            let partial = Grouping::fold(chunk, group_by, specs);
            let n = partial.len();
            (partial, n)
        });
        let merged = partials
            .into_iter()
            .reduce(|acc, next| acc.merge(next, specs))
            .unwrap_or_default();
        self.emit(ExecutionEvent::GroupsMerged { groups: merged.len() });
        let out = merged.finish(group_by, specs);
        self.finish_run();
        out
    }

    /// Run `work` over every chunk of `rows` on the pool, returning per-chunk results in chunk
    /// order. `work` returns its result and the number of output items it produced.
    fn run_chunks<T, F>(&self, operation: &'static str, rows: &[Row], work: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&[Row]) -> (T, usize) + Send + Sync,
    {
        self.metrics.start_run();
        self.emit(ExecutionEvent::RunStarted {
            operation,
            rows: rows.len(),
        });

        let sem = Semaphore::new(self.opts.max_in_flight_chunks);
        let ranges = chunk_ranges(rows.len(), self.opts.chunk_size);

        self.pool.install(|| {
            ranges
                .into_par_iter()
                .map(|range| {
                    let (waited, _permit) = sem.acquire();
                    if waited > Duration::ZERO {
                        self.metrics.record_throttle_wait(waited);
                        self.emit(ExecutionEvent::ThrottleWaited { duration: waited });
                    }

                    self.metrics.record_chunk_started();
                    self.emit(ExecutionEvent::ChunkStarted {
                        start_row: range.start,
                        row_count: range.len(),
                    });

                    let chunk = &rows[range];
                    let (out, output_rows) = work(chunk);

                    self.emit(ExecutionEvent::ChunkFinished { output_rows });
                    self.metrics.record_chunk_finished(chunk.len(), output_rows);
                    out
                })
                .collect()
        })
    }

    fn finish_run(&self) {
        let elapsed = self.run_elapsed();
        self.metrics.finish_run(elapsed);
        self.emit(ExecutionEvent::RunFinished {
            elapsed,
            metrics: self.metrics.snapshot(),
        });
    }

    fn run_elapsed(&self) -> Duration {
        self.metrics.run_started().map_or(Duration::ZERO, |t: Instant| t.elapsed())
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn chunk_ranges(row_count: usize, chunk_size: usize) -> Vec<Range<usize>> {
    (0..row_count)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(row_count))
        .collect()
}
