//! Statistics Grid
//!
//! A dense `rows × cells` grid of [`RunningStats`], one accumulator per
//! grouping cell. Replication aggregation uses rows = measures and
//! cells = time steps; sweep aggregation uses rows = parameter settings and
//! cells = locations. Rows are independent, so they accumulate in parallel
//! with rayon; within a row every cell folds units in ascending unit order,
//! keeping the result deterministic.

use crate::running::{CellSummary, RunningStats};
use rayon::prelude::*;

/// Grid of running statistics keyed by (row, cell).
#[derive(Debug, Clone)]
pub struct StatGrid {
    rows: usize,
    cells: usize,
    stats: Vec<RunningStats>,
}

impl StatGrid {
    /// Empty grid of `rows × cells` accumulators.
    pub fn new(rows: usize, cells: usize) -> StatGrid {
        StatGrid {
            rows,
            cells,
            stats: vec![RunningStats::new(); rows * cells],
        }
    }

    /// Accumulate `units` observations into a fresh grid.
    ///
    /// `value(unit, row, cell)` supplies the observation for one unit at one
    /// grid position. Every cell sees units 0..units in order.
    pub fn accumulate<F>(units: usize, rows: usize, cells: usize, value: F) -> StatGrid
    where
        F: Fn(usize, usize, usize) -> f64 + Sync,
    {
        // Capture by shared reference: &F crosses threads since F: Sync.
        let value = &value;
        let stats: Vec<RunningStats> = (0..rows)
            .into_par_iter()
            .flat_map_iter(|row| {
                (0..cells).map(move |cell| {
                    let mut acc = RunningStats::new();
                    for unit in 0..units {
                        acc.push(value(unit, row, cell));
                    }
                    acc
                })
            })
            .collect();

        StatGrid { rows, cells, stats }
    }

    /// Number of rows (measures or parameter settings).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cells per row (time steps or locations).
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Fold one observation into a cell.
    pub fn push(&mut self, row: usize, cell: usize, value: f64) {
        self.stats[row * self.cells + cell].push(value);
    }

    /// Accumulator at (row, cell).
    pub fn cell(&self, row: usize, cell: usize) -> &RunningStats {
        &self.stats[row * self.cells + cell]
    }

    /// Finalized summaries for one row, in ascending cell order.
    pub fn row_summaries(&self, row: usize) -> Vec<CellSummary> {
        (0..self.cells)
            .map(|cell| self.cell(row, cell).summary())
            .collect()
    }
}
