//! Replication Pipeline
//!
//! The simulation-study driver: partition the replications, run them on the
//! worker pool, merge, aggregate per (measure, time step), and write one
//! aggregate table per measure. Per-unit trajectory tables are written by
//! the workers as replications finish.
//!
//! Per-unit failures mark the run failed but never abort the barrier; the
//! returned summary accounts for partial progress and carries the first
//! error detail per failure class. Only configuration problems (partition,
//! pool, output directories) abort before any work is done.

use crate::error::RunError;
use crate::merger::merge;
use crate::observer::RunObserver;
use crate::scheduler::Scheduler;
use crate::worker::{TrajectoryOutput, WorkerConfig};
use dockstat_core::{RunContext, UnitExecutor};
use dockstat_report::{RunSummary, TableError, write_measure_aggregate};
use dockstat_stats::StatGrid;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Configuration of one replication run.
#[derive(Debug, Clone)]
pub struct ReplicationConfig {
    /// Number of independent replications.
    pub replications: usize,
    /// Worker pool size; must divide `replications` evenly.
    pub worker_count: usize,
    /// Base seed; replication `i` runs with `base_seed + i`.
    pub base_seed: u64,
    /// Directory for per-replication trajectory tables (`Traj<unit>.csv`).
    pub traces_dir: PathBuf,
    /// Directory for per-measure aggregate tables (`<measure>.csv`).
    pub results_dir: PathBuf,
}

fn ensure_dir(dir: &Path) -> Result<(), RunError> {
    std::fs::create_dir_all(dir).map_err(|source| {
        RunError::Table(TableError::Io {
            path: dir.to_path_buf(),
            source,
        })
    })
}

/// Run a full replication study and return its summary.
///
/// The summary's status is `Failed` if any unit failed, if the merged
/// samples were inconsistent, or if an aggregate table could not be written;
/// sibling outputs that were already written stay intact.
pub fn run_replications(
    cfg: &ReplicationConfig,
    executor: &dyn UnitExecutor,
    ctx: &RunContext,
    observer: &dyn RunObserver,
) -> Result<RunSummary, RunError> {
    ensure_dir(&cfg.traces_dir)?;
    ensure_dir(&cfg.results_dir)?;

    let started = Instant::now();
    let mut summary = RunSummary::new(cfg.replications);

    let worker_cfg = WorkerConfig {
        base_seed: cfg.base_seed,
        trajectories: Some(TrajectoryOutput {
            dir: cfg.traces_dir.clone(),
        }),
    };

    let outcome = Scheduler::new(cfg.worker_count).run(
        cfg.replications,
        executor,
        ctx,
        &worker_cfg,
        observer,
    )?;

    summary.succeeded_units = outcome.succeeded_units();
    summary.failed_units = cfg.replications - summary.succeeded_units;

    if !outcome.is_success() {
        // Nothing from a failed chunk is aggregated; report and stop.
        for failure in &outcome.failed {
            summary.record_failure(failure.error.failure_class(), failure.error.to_string());
        }
        summary.elapsed_seconds = started.elapsed().as_secs_f64();
        return Ok(summary);
    }

    let merged = match merge(outcome.completed) {
        Ok(merged) => merged,
        Err(e) => {
            // Inconsistent cells cannot be averaged; abort aggregation.
            let error = RunError::from(e);
            summary.record_failure(error.failure_class(), error.to_string());
            summary.elapsed_seconds = started.elapsed().as_secs_f64();
            return Ok(summary);
        }
    };

    summary.mean_unit_seconds = merged.mean_unit_duration().map(|d| d.as_secs_f64());

    let grid = StatGrid::accumulate(
        merged.units(),
        merged.measures.len(),
        merged.steps,
        |unit, measure, step| merged.value(unit, measure, step),
    );

    for (index, measure) in merged.measures.iter().enumerate() {
        let path = cfg.results_dir.join(format!("{}.csv", measure.name()));
        if let Err(e) = write_measure_aggregate(&path, &grid.row_summaries(index), &ctx.time) {
            // One unwritable table must not corrupt sibling outputs.
            let error = RunError::from(e);
            summary.record_failure(error.failure_class(), error.to_string());
        }
    }

    summary.elapsed_seconds = started.elapsed().as_secs_f64();
    Ok(summary)
}
