#![warn(missing_docs)]
//! Dockstat Runner
//!
//! The replication-and-aggregation pipeline, used by both study drivers:
//!
//! ```text
//! total units
//!      │
//!      ▼
//! ┌───────────┐
//! │ partition │  equal contiguous chunks, one per worker
//! └─────┬─────┘
//!       │
//!       ▼
//! ┌───────────┐
//! │ scheduler │  fixed rayon pool, barrier join, failure isolation
//! └─────┬─────┘
//!       │  per-chunk immutable results
//!       ▼
//! ┌───────────┐
//! │  merger   │  reindex to global unit order, consistency checks
//! └─────┬─────┘
//!       │
//!       ▼
//! ┌───────────┐
//! │   stats   │  fold into (row, cell) statistics grid
//! └─────┬─────┘
//!       │
//!       ▼
//! ┌───────────┐
//! │  tables   │  delimited aggregate rows + run summary
//! └───────────┘
//! ```
//!
//! ## Modules
//!
//! - [`scheduler`](Scheduler) - fixed worker pool with barrier join
//! - [`worker`](run_chunk) - chunk execution, seeding, trajectory persistence
//! - [`merger`](merge) - global reindex and measure consistency validation
//! - [`pipeline`](run_replications) - the simulation-replication driver
//! - [`sweep`](run_sweep) - the parameter-sweep driver
//! - [`observer`](RunObserver) - injected progress reporting

mod error;
mod merger;
mod observer;
mod pipeline;
mod scheduler;
mod sweep;
mod worker;

pub use error::RunError;
pub use merger::{MergedRun, merge};
pub use observer::{NoopObserver, RunObserver};
pub use pipeline::{ReplicationConfig, run_replications};
pub use scheduler::{ScheduleOutcome, Scheduler};
pub use sweep::{ParameterSetting, SweepConfig, SweepExecutor, run_sweep};
pub use worker::{ChunkFailure, ChunkResult, TrajectoryOutput, WorkerConfig, run_chunk};
