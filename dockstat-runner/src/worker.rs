//! Replication Worker
//!
//! Executes one chunk sequentially by increasing unit index. Each unit gets
//! the deterministic seed `base_seed + unit`, so a replication reproduces
//! identically regardless of which worker thread ran it. Spatial series are
//! routed into a per-unit station trajectory and persisted immediately, so
//! the raw spatial arrays never outlive the unit that produced them.
//!
//! A failing unit stops its chunk; sibling chunks are unaffected. The chunk
//! failure records how many units had already completed, so diagnostics can
//! account for partial progress without aggregating it.

use crate::error::RunError;
use crate::observer::RunObserver;
use dockstat_core::{
    Chunk, ConsistencyError, ExecutionError, RunContext, Sample, StationTrajectory, UnitExecutor,
    UnitIndex,
};
use dockstat_report::write_trajectory;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Where per-unit trajectory tables go.
#[derive(Debug, Clone)]
pub struct TrajectoryOutput {
    /// Directory receiving `Traj<unit>.csv` files.
    pub dir: PathBuf,
}

impl TrajectoryOutput {
    /// Path of the trajectory file for `unit`.
    ///
    /// Files are partitioned by unit index, so no two workers ever write the
    /// same file.
    pub fn unit_path(&self, unit: UnitIndex) -> PathBuf {
        self.dir.join(format!("Traj{unit}.csv"))
    }
}

/// Per-worker execution settings, identical for every worker in a run.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Seed base; unit `i` executes with seed `base_seed + i`.
    pub base_seed: u64,
    /// Trajectory persistence; `None` for runs without spatial output
    /// (e.g. parameter sweeps).
    pub trajectories: Option<TrajectoryOutput>,
}

/// Immutable result of one chunk: samples in ascending unit order.
#[derive(Debug)]
pub struct ChunkResult {
    /// The chunk that was executed.
    pub chunk: Chunk,
    /// One sample per unit, index `i` holding unit `chunk.start + i`.
    pub samples: Vec<Sample>,
    /// Wall-clock execution time per unit (diagnostic).
    pub unit_durations: Vec<Duration>,
}

/// A chunk that did not run to completion.
#[derive(Debug)]
pub struct ChunkFailure {
    /// The chunk that failed.
    pub chunk: Chunk,
    /// Units of this chunk that completed before the failure.
    pub completed_units: usize,
    /// What went wrong.
    pub error: RunError,
}

/// Execute one chunk with the supplied unit executor.
pub fn run_chunk(
    chunk: Chunk,
    executor: &dyn UnitExecutor,
    ctx: &RunContext,
    cfg: &WorkerConfig,
    observer: &dyn RunObserver,
) -> Result<ChunkResult, ChunkFailure> {
    let mut samples = Vec::with_capacity(chunk.len);
    let mut unit_durations = Vec::with_capacity(chunk.len);

    for unit in chunk.units() {
        let fail = |error: RunError, completed: usize| ChunkFailure {
            chunk,
            completed_units: completed,
            error,
        };

        let seed = cfg.base_seed.wrapping_add(unit as u64);
        let started = Instant::now();
        let sample = executor
            .execute(unit, seed, ctx)
            .map_err(|source| fail(ExecutionError { unit, source }.into(), samples.len()))?;
        unit_durations.push(started.elapsed());

        if let Some(output) = &cfg.trajectories {
            if sample.has_spatial() {
                let trajectory = spatial_trajectory(unit, &sample, ctx)
                    .map_err(|e| fail(e.into(), samples.len()))?;
                write_trajectory(
                    &output.unit_path(unit),
                    &trajectory,
                    &ctx.capacities(),
                    &ctx.time,
                )
                .map_err(|e| fail(e.into(), samples.len()))?;
                observer.trajectory_saved(unit);
                // trajectory buffer dropped here; only the sample is kept
            }
        }

        samples.push(sample);
        observer.unit_completed(unit);
    }

    Ok(ChunkResult {
        chunk,
        samples,
        unit_durations,
    })
}

/// Collect a sample's spatial series into one station trajectory.
fn spatial_trajectory(
    unit: UnitIndex,
    sample: &Sample,
    ctx: &RunContext,
) -> Result<StationTrajectory, ConsistencyError> {
    let stations = ctx.stations.len();
    let spatial: Vec<_> = sample
        .series
        .iter()
        .filter_map(|s| s.kind.station().map(|station| (station, &s.values)))
        .collect();

    let steps = spatial
        .first()
        .map(|(_, values)| values.len())
        .unwrap_or(0);
    let mut trajectory = StationTrajectory::new(stations, steps);

    for (station, values) in spatial {
        if station >= stations {
            return Err(ConsistencyError::UnknownStation {
                unit,
                station,
                stations,
            });
        }
        if values.len() != steps {
            return Err(ConsistencyError::SeriesLength {
                unit,
                measure: format!("Available{station}"),
                got: values.len(),
                expected: steps,
            });
        }
        trajectory.set_row(station, values);
    }

    Ok(trajectory)
}
