//! Shared Run Context
//!
//! Read-only inputs every worker sees: the station network (ids and
//! capacities) and the sampling time axis. The context is immutable for the
//! duration of a run; workers never share mutable state.

use serde::{Deserialize, Serialize};

/// One docking station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Station id; doubles as the spatial location index.
    pub id: usize,
    /// Total docking slots.
    pub capacity: u32,
}

/// Sampling time axis: `samplings` intervals over `simulation_time`, probed
/// at `samplings + 1` points (t = 0 ..= samplings).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    /// Total simulated time.
    pub simulation_time: f64,
    /// Number of sampling intervals.
    pub samplings: usize,
}

impl TimeAxis {
    /// Length of one sampling interval.
    pub fn interval(&self) -> f64 {
        self.simulation_time / self.samplings as f64
    }

    /// Wall time of probe `step`.
    pub fn time_at(&self, step: usize) -> f64 {
        step as f64 * self.interval()
    }

    /// Number of probes collected per series.
    pub fn probes(&self) -> usize {
        self.samplings + 1
    }
}

/// Immutable inputs shared by all workers for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    /// The station network, indexed by station id.
    pub stations: Vec<Station>,
    /// The sampling time axis.
    pub time: TimeAxis,
}

impl RunContext {
    /// Capacity of `station`, if it exists.
    pub fn capacity_of(&self, station: usize) -> Option<u32> {
        self.stations.get(station).map(|s| s.capacity)
    }

    /// Station capacities in id order.
    pub fn capacities(&self) -> Vec<u32> {
        self.stations.iter().map(|s| s.capacity).collect()
    }
}
