#![warn(missing_docs)]
//! Dockstat Core Data Model
//!
//! Shared vocabulary for the replication harness:
//! - Unit indexing and equal-size work partitioning
//! - The `Sample` produced by executing one unit, with per-series
//!   scalar/spatial classification
//! - Station trajectories and recorded trajectory signals
//! - The read-only run context shared by all workers
//! - The error taxonomy (configuration, execution, consistency)

mod context;
mod error;
mod sample;
mod trajectory;
mod unit;

pub use context::{RunContext, Station, TimeAxis};
pub use error::{ConfigError, ConsistencyError, ExecutionError};
pub use sample::{MeasureKind, Sample, Series};
pub use trajectory::{RecordedTrajectory, StationTrajectory};
pub use unit::{Chunk, UnitIndex, partition};

/// Contract between the harness and an external unit executor.
///
/// One call executes one independent unit of work: a stochastic simulation
/// replication, or the evaluation of every parameter setting against one
/// pre-recorded trajectory. The executor receives a deterministic per-unit
/// seed (`base_seed + unit`) so results are reproducible regardless of which
/// worker thread ran the unit.
///
/// Executors wrap external engines, so failures cross the boundary as
/// [`anyhow::Error`]; the harness attributes them to the failing unit.
pub trait UnitExecutor: Sync {
    /// Execute one unit and return its indexed sample.
    fn execute(&self, unit: UnitIndex, seed: u64, ctx: &RunContext) -> anyhow::Result<Sample>;
}
