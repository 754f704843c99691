//! Unit Indexing and Work Partitioning
//!
//! A run consists of `total_units` independent units of work, identified by
//! index. The partitioner splits the index space into equal-size contiguous
//! chunks, one per worker. Uneven splits are rejected: silently truncating
//! (as `total / workers` integer division would) loses replications.

use crate::error::ConfigError;
use std::ops::Range;

/// Index of one independent unit of work, in `[0, total_units)`.
pub type UnitIndex = usize;

/// A contiguous, non-overlapping slice of the unit index space owned by one
/// worker for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Worker this chunk is assigned to.
    pub worker: usize,
    /// First unit index covered.
    pub start: UnitIndex,
    /// Number of units covered.
    pub len: usize,
}

impl Chunk {
    /// Unit indices covered by this chunk, in execution order.
    pub fn units(&self) -> Range<UnitIndex> {
        self.start..self.end()
    }

    /// One past the last unit index covered.
    pub fn end(&self) -> UnitIndex {
        self.start + self.len
    }
}

/// Split `total_units` into `worker_count` equal chunks.
///
/// Chunk `i` covers `[i * size, (i + 1) * size)` with
/// `size = total_units / worker_count`, so the chunks exactly tile
/// `[0, total_units)`. A unit count that is not evenly divisible by the
/// worker count is a configuration error.
pub fn partition(total_units: usize, worker_count: usize) -> Result<Vec<Chunk>, ConfigError> {
    if worker_count == 0 {
        return Err(ConfigError::NoWorkers);
    }
    if total_units == 0 {
        return Err(ConfigError::NoUnits);
    }
    if total_units % worker_count != 0 {
        return Err(ConfigError::UnevenPartition {
            total_units,
            worker_count,
        });
    }

    let len = total_units / worker_count;
    Ok((0..worker_count)
        .map(|worker| Chunk {
            worker,
            start: worker * len,
            len,
        })
        .collect())
}
