//! Error Taxonomy
//!
//! Three classes cross crate boundaries:
//! - [`ConfigError`]: the run cannot start (bad partition, missing inputs)
//! - [`ExecutionError`]: one unit's executor failed; isolated to that unit
//! - [`ConsistencyError`]: units disagree on measure names/order or series
//!   length; fatal for aggregation since mismatched cells cannot be averaged
//!
//! Table I/O errors live in `dockstat-report`.

use crate::unit::UnitIndex;
use thiserror::Error;

/// A run configuration that cannot be executed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Worker count of zero.
    #[error("worker count must be at least 1")]
    NoWorkers,

    /// Unit count of zero.
    #[error("unit count must be at least 1")]
    NoUnits,

    /// Unit count not evenly divisible by worker count.
    #[error("{total_units} units cannot be split evenly across {worker_count} workers")]
    UnevenPartition {
        /// Total units requested.
        total_units: usize,
        /// Configured worker count.
        worker_count: usize,
    },

    /// Any other invalid configuration (missing inputs, bad values).
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure of a single unit's executor, attributed to its unit index.
#[derive(Debug, Error)]
#[error("unit {unit} failed: {source}")]
pub struct ExecutionError {
    /// The unit whose executor failed.
    pub unit: UnitIndex,
    /// The executor's error.
    #[source]
    pub source: anyhow::Error,
}

/// Structural disagreement between unit samples.
#[derive(Debug, Error)]
pub enum ConsistencyError {
    /// A unit produced a different number of series than unit 0.
    #[error("unit {unit} produced {got} measure series, expected {expected}")]
    SeriesCount {
        /// Offending unit.
        unit: UnitIndex,
        /// Series count observed.
        got: usize,
        /// Series count of unit 0.
        expected: usize,
    },

    /// A unit's series names/order differ from unit 0.
    #[error("unit {unit} series {index} is measure {got:?}, expected {expected:?}")]
    MeasureMismatch {
        /// Offending unit.
        unit: UnitIndex,
        /// Series position within the sample.
        index: usize,
        /// Measure name observed.
        got: String,
        /// Measure name of unit 0 at this position.
        expected: String,
    },

    /// A series has a different length than the run's time-step count.
    #[error("unit {unit} measure {measure:?} has {got} samples, expected {expected}")]
    SeriesLength {
        /// Offending unit.
        unit: UnitIndex,
        /// Measure name of the offending series.
        measure: String,
        /// Length observed.
        got: usize,
        /// Length of unit 0's series.
        expected: usize,
    },

    /// A spatial measure names a station outside the configured network.
    #[error("unit {unit} names station {station}, but only {stations} stations are configured")]
    UnknownStation {
        /// Offending unit.
        unit: UnitIndex,
        /// Station id parsed from the measure name.
        station: usize,
        /// Number of configured stations.
        stations: usize,
    },
}
