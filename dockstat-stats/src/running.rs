//! Running Statistics
//!
//! Welford's online algorithm: a single pass yields mean, min, max and the
//! sum of squared deviations, from which sample standard deviation
//! (N−1 denominator) and standard error follow. Samples can be folded in and
//! discarded, so no raw value needs to stay resident.
//!
//! Policy for small groups: mean is defined from N = 1, but standard
//! deviation and standard error are reported as 0.0 until N ≥ 2 (Bessel's
//! correction is undefined for a single observation). This is deliberate and
//! covered by tests.

use serde::{Deserialize, Serialize};

/// Streaming accumulator for one statistics cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Empty accumulator.
    pub fn new() -> RunningStats {
        RunningStats {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Fold one observation in.
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Number of observations folded in.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean; 0.0 for an empty cell.
    pub fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    /// Minimum observation; 0.0 for an empty cell.
    pub fn min(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.min }
    }

    /// Maximum observation; 0.0 for an empty cell.
    pub fn max(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.max }
    }

    /// Sample variance with Bessel's correction; 0.0 when N < 2.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Sample standard deviation; 0.0 when N < 2.
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Standard error of the mean (stddev / sqrt(N)); 0.0 when N < 2.
    pub fn std_err(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.std_dev() / (self.count as f64).sqrt()
        }
    }

    /// Finalized summary of this cell.
    pub fn summary(&self) -> CellSummary {
        CellSummary {
            count: self.count(),
            mean: self.mean(),
            min: self.min(),
            max: self.max(),
            std_dev: self.std_dev(),
            std_err: self.std_err(),
        }
    }
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Finalized statistics for one (group, cell) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSummary {
    /// Observations aggregated into this cell.
    pub count: u64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Minimum observation.
    pub min: f64,
    /// Maximum observation.
    pub max: f64,
    /// Sample standard deviation (N−1); 0.0 when count < 2.
    pub std_dev: f64,
    /// Standard error of the mean; 0.0 when count < 2.
    pub std_err: f64,
}
