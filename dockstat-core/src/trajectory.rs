//! Station Trajectories
//!
//! A [`StationTrajectory`] is one replication's per-station availability over
//! time: one row per station, one column per time step. A
//! [`RecordedTrajectory`] is the same data read back from a trajectory table,
//! together with the probe times and the remaining-capacity signal, as
//! consumed by the parameter sweep.

/// Dense stations × time-steps matrix of per-station values.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTrajectory {
    stations: usize,
    steps: usize,
    values: Vec<f64>,
}

impl StationTrajectory {
    /// Zero-filled trajectory for `stations` stations over `steps` probes.
    pub fn new(stations: usize, steps: usize) -> StationTrajectory {
        StationTrajectory {
            stations,
            steps,
            values: vec![0.0; stations * steps],
        }
    }

    /// Number of stations (rows).
    pub fn stations(&self) -> usize {
        self.stations
    }

    /// Number of time steps (columns).
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Value for `station` at time step `step`.
    pub fn get(&self, station: usize, step: usize) -> f64 {
        self.values[station * self.steps + step]
    }

    /// Set the value for `station` at time step `step`.
    pub fn set(&mut self, station: usize, step: usize, value: f64) {
        self.values[station * self.steps + step] = value;
    }

    /// Copy a whole station row from a series.
    ///
    /// Panics if the series length differs from the trajectory's step count;
    /// callers validate series lengths before routing.
    pub fn set_row(&mut self, station: usize, series: &[f64]) {
        assert_eq!(series.len(), self.steps, "series length mismatch");
        let offset = station * self.steps;
        self.values[offset..offset + self.steps].copy_from_slice(series);
    }

    /// One station's values over time.
    pub fn row(&self, station: usize) -> &[f64] {
        &self.values[station * self.steps..(station + 1) * self.steps]
    }
}

/// A trajectory read back from disk, as evaluated by the parameter sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTrajectory {
    /// Probe times, ascending, one per time step.
    pub times: Vec<f64>,
    /// Bikes available per station per step.
    pub available: StationTrajectory,
    /// Free docking slots per station per step (capacity remaining).
    pub free_slots: StationTrajectory,
}

impl RecordedTrajectory {
    /// Number of stations (spatial locations).
    pub fn locations(&self) -> usize {
        self.available.stations()
    }

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        self.times.len()
    }
}
