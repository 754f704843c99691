#![warn(missing_docs)]
//! Dockstat Report - Result Tables and Run Summaries
//!
//! Serializes the study's outputs as delimited rows with locale-independent
//! fixed-point formatting, and reads the input tables back:
//! - per-replication station trajectories (`Traces/Traj<unit>.csv`)
//! - per-measure aggregates (`Results/<measure>.csv`)
//! - per-formula sweep aggregates (`Formulas/<formula>.csv`)
//! - the station capacity table (`stations.csv`)
//!
//! Also builds the end-of-run summary: succeeded/failed unit counts and the
//! first error detail per failure class, as human-readable text or JSON.

mod summary;
mod table;

pub use summary::{
    FailureClass, FailureDetail, RunStatus, RunSummary, format_human_summary,
    generate_json_summary,
};
pub use table::{
    TableError, read_stations, read_trajectory, write_measure_aggregate, write_sweep_aggregate,
    write_trajectory,
};
