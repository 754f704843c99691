//! Worker Pool Scheduler
//!
//! Runs exactly `worker_count` workers on a dedicated rayon pool, one chunk
//! per worker for the lifetime of the run (no work stealing between chunks:
//! each chunk is one parallel task executed sequentially inside). The
//! `collect` over the parallel iterator is the barrier: nothing is aggregated
//! until every chunk has completed or failed.
//!
//! Failures are isolated per chunk. The outcome keeps every successful chunk
//! alongside every failure, so diagnostics can report which chunk failed and
//! why without dropping the surviving results silently. Aggregation only ever
//! consumes a fully successful outcome.

use crate::error::RunError;
use crate::observer::RunObserver;
use crate::worker::{ChunkFailure, ChunkResult, WorkerConfig, run_chunk};
use dockstat_core::{RunContext, UnitExecutor, partition};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

/// Fixed-size scheduler for one run.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    worker_count: usize,
}

/// Everything the barrier join produced.
#[derive(Debug)]
pub struct ScheduleOutcome {
    /// Chunks that ran to completion, in ascending start order.
    pub completed: Vec<ChunkResult>,
    /// Chunks that failed, in ascending start order.
    pub failed: Vec<ChunkFailure>,
}

impl ScheduleOutcome {
    /// Whether every chunk completed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Units that produced a sample, including progress inside failed chunks.
    pub fn succeeded_units(&self) -> usize {
        let completed: usize = self.completed.iter().map(|c| c.samples.len()).sum();
        let partial: usize = self.failed.iter().map(|f| f.completed_units).sum();
        completed + partial
    }
}

impl Scheduler {
    /// Scheduler with a pool of `worker_count` workers.
    pub fn new(worker_count: usize) -> Scheduler {
        Scheduler { worker_count }
    }

    /// Partition `total_units` and run every chunk to completion or failure.
    ///
    /// Blocks until all workers are done; this is the run's only blocking
    /// point. Returns `Err` only when the run cannot start (bad partition,
    /// pool construction); per-chunk failures are reported in the outcome.
    pub fn run(
        &self,
        total_units: usize,
        executor: &dyn UnitExecutor,
        ctx: &RunContext,
        cfg: &WorkerConfig,
        observer: &dyn RunObserver,
    ) -> Result<ScheduleOutcome, RunError> {
        let chunks = partition(total_units, self.worker_count)?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.worker_count)
            .build()
            .map_err(|e| RunError::Pool(e.to_string()))?;

        // Barrier join: collect waits for every chunk.
        let outcomes: Vec<Result<ChunkResult, ChunkFailure>> = pool.install(|| {
            chunks
                .par_iter()
                .map(|chunk| run_chunk(*chunk, executor, ctx, cfg, observer))
                .collect()
        });

        let mut completed = Vec::new();
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(result) => completed.push(result),
                Err(failure) => {
                    observer.chunk_failed(failure.chunk.worker, &failure.error.to_string());
                    failed.push(failure);
                }
            }
        }
        completed.sort_by_key(|c| c.chunk.start);
        failed.sort_by_key(|f| f.chunk.start);

        Ok(ScheduleOutcome { completed, failed })
    }
}
