//! Run Observer
//!
//! Workers report progress through an injected observer instead of printing
//! to a global sink, so parallel workers stay decoupled from the terminal.
//! Implementations must be `Sync`; callbacks arrive from worker threads in
//! no particular global order.

use dockstat_core::UnitIndex;

/// Progress callbacks for a running study.
pub trait RunObserver: Sync {
    /// One unit finished executing.
    fn unit_completed(&self, _unit: UnitIndex) {}

    /// One unit's trajectory table was written.
    fn trajectory_saved(&self, _unit: UnitIndex) {}

    /// A chunk failed; the run will be reported as failed after the barrier.
    fn chunk_failed(&self, _worker: usize, _message: &str) {}
}

/// Observer that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
