#![warn(missing_docs)]
//! Dockstat Statistical Engine
//!
//! Cross-unit statistics over indexed result tensors:
//! - [`RunningStats`]: streaming mean/min/max with Welford variance
//!   (sample variance, N−1 denominator)
//! - [`StatGrid`]: a (row, cell) grid of running statistics, one grid per
//!   grouping key — (measure, time step) for replications,
//!   (parameter setting, location) for sweeps
//!
//! Accumulation is a deterministic fold: every cell folds its units in
//! ascending unit order, rows processed in parallel with rayon.

mod grid;
mod running;

pub use grid::StatGrid;
pub use running::{CellSummary, RunningStats};
