//! Parameter Sweep Driver
//!
//! Evaluates a property over pre-recorded trajectories for an explicit list
//! of parameter settings and aggregates satisfaction per (setting, location).
//! The sweep reuses the replication machinery: each trajectory is one unit,
//! each setting becomes one series of per-location values, and the same
//! partition / barrier / merge / grid path produces the statistics.
//!
//! Evaluation is deterministic, so sweep units take no seed-dependent input;
//! the per-unit wall-clock times still flow into the summary as the average
//! evaluation cost per trajectory.

use crate::error::RunError;
use crate::merger::merge;
use crate::observer::RunObserver;
use crate::scheduler::Scheduler;
use crate::worker::WorkerConfig;
use dockstat_core::{RecordedTrajectory, RunContext, Sample, UnitExecutor, UnitIndex};
use dockstat_report::{RunSummary, TableError, write_sweep_aggregate};
use dockstat_stats::StatGrid;
use std::path::PathBuf;
use std::time::Instant;

/// One point of the sweep: named parameter assignments.
///
/// An empty setting list sweeps the property once with default parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSetting {
    /// Parameter name/value pairs for this sweep point.
    pub parameters: Vec<(String, f64)>,
}

impl ParameterSetting {
    /// Value of the named parameter, if assigned.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }
}

/// Evaluates one property over one recorded trajectory.
pub trait SweepExecutor: Sync {
    /// Per-location satisfaction values for `setting` over `trajectory`.
    ///
    /// Must return exactly one value per network location.
    fn evaluate(
        &self,
        setting: &ParameterSetting,
        trajectory: &RecordedTrajectory,
        ctx: &RunContext,
    ) -> anyhow::Result<Vec<f64>>;
}

/// Configuration of one sweep run.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Worker pool size; must divide the trajectory count evenly.
    pub worker_count: usize,
    /// Output table, rows `setting,location,mean,min,max,stddev`.
    pub output: PathBuf,
}

/// Adapter presenting sweep evaluation as unit execution: unit index selects
/// the trajectory, and each setting contributes one per-location series.
struct SweepUnitExecutor<'a> {
    trajectories: &'a [RecordedTrajectory],
    settings: &'a [ParameterSetting],
    executor: &'a dyn SweepExecutor,
    default_setting: ParameterSetting,
}

impl SweepUnitExecutor<'_> {
    fn settings(&self) -> impl Iterator<Item = &ParameterSetting> {
        let slice = if self.settings.is_empty() {
            std::slice::from_ref(&self.default_setting)
        } else {
            self.settings
        };
        slice.iter()
    }
}

impl UnitExecutor for SweepUnitExecutor<'_> {
    fn execute(&self, unit: UnitIndex, _seed: u64, ctx: &RunContext) -> anyhow::Result<Sample> {
        let trajectory = &self.trajectories[unit];
        let locations = trajectory.locations();

        let mut series = Vec::new();
        for (k, setting) in self.settings().enumerate() {
            let values = self.executor.evaluate(setting, trajectory, ctx)?;
            if values.len() != locations {
                anyhow::bail!(
                    "setting {k} produced {} values for {locations} locations",
                    values.len()
                );
            }
            series.push((format!("setting{k}"), values));
        }

        Ok(Sample::from_named(series))
    }
}

/// Sweep `settings` over `trajectories` and write the aggregate table.
///
/// The summary's `mean_unit_seconds` is the average wall-clock evaluation
/// time per trajectory across all settings.
pub fn run_sweep(
    cfg: &SweepConfig,
    trajectories: &[RecordedTrajectory],
    settings: &[ParameterSetting],
    executor: &dyn SweepExecutor,
    ctx: &RunContext,
    observer: &dyn RunObserver,
) -> Result<RunSummary, RunError> {
    if let Some(parent) = cfg.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| {
                RunError::Table(TableError::Io {
                    path: parent.to_path_buf(),
                    source,
                })
            })?;
        }
    }

    let started = Instant::now();
    let mut summary = RunSummary::new(trajectories.len());

    let adapter = SweepUnitExecutor {
        trajectories,
        settings,
        executor,
        default_setting: ParameterSetting::default(),
    };
    let worker_cfg = WorkerConfig {
        base_seed: 0,
        trajectories: None,
    };

    let outcome = Scheduler::new(cfg.worker_count).run(
        trajectories.len(),
        &adapter,
        ctx,
        &worker_cfg,
        observer,
    )?;

    summary.succeeded_units = outcome.succeeded_units();
    summary.failed_units = trajectories.len() - summary.succeeded_units;

    if !outcome.is_success() {
        for failure in &outcome.failed {
            summary.record_failure(failure.error.failure_class(), failure.error.to_string());
        }
        summary.elapsed_seconds = started.elapsed().as_secs_f64();
        return Ok(summary);
    }

    let merged = match merge(outcome.completed) {
        Ok(merged) => merged,
        Err(e) => {
            let error = RunError::from(e);
            summary.record_failure(error.failure_class(), error.to_string());
            summary.elapsed_seconds = started.elapsed().as_secs_f64();
            return Ok(summary);
        }
    };

    summary.mean_unit_seconds = merged.mean_unit_duration().map(|d| d.as_secs_f64());

    let rows = settings.len().max(1);
    let grid = StatGrid::accumulate(
        merged.units(),
        rows,
        merged.steps,
        |unit, setting, location| merged.value(unit, setting, location),
    );

    let per_setting: Vec<_> = (0..rows).map(|row| grid.row_summaries(row)).collect();
    if let Err(e) = write_sweep_aggregate(&cfg.output, &per_setting) {
        let error = RunError::from(e);
        summary.record_failure(error.failure_class(), error.to_string());
    }

    summary.elapsed_seconds = started.elapsed().as_secs_f64();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use dockstat_core::{Station, StationTrajectory, TimeAxis};
    use dockstat_report::RunStatus;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Satisfaction is 1.0 iff the location stays above `threshold` at every
    /// probe of the trajectory.
    struct AboveThreshold;

    impl SweepExecutor for AboveThreshold {
        fn evaluate(
            &self,
            setting: &ParameterSetting,
            trajectory: &RecordedTrajectory,
            _ctx: &RunContext,
        ) -> anyhow::Result<Vec<f64>> {
            let threshold = setting.get("threshold").unwrap_or(0.0);
            Ok((0..trajectory.locations())
                .map(|loc| {
                    let ok = (0..trajectory.steps())
                        .all(|step| trajectory.available.get(loc, step) > threshold);
                    if ok { 1.0 } else { 0.0 }
                })
                .collect())
        }
    }

    fn setting(threshold: f64) -> ParameterSetting {
        ParameterSetting {
            parameters: vec![("threshold".to_string(), threshold)],
        }
    }

    fn trajectory(rows: &[&[f64]]) -> RecordedTrajectory {
        let locations = rows.len();
        let steps = rows[0].len();
        let mut available = StationTrajectory::new(locations, steps);
        for (loc, values) in rows.iter().enumerate() {
            available.set_row(loc, values);
        }
        RecordedTrajectory {
            times: (0..steps).map(|s| s as f64).collect(),
            available,
            free_slots: StationTrajectory::new(locations, steps),
        }
    }

    fn ctx(stations: usize) -> RunContext {
        RunContext {
            stations: (0..stations).map(|id| Station { id, capacity: 10 }).collect(),
            time: TimeAxis {
                simulation_time: 1.0,
                samplings: 1,
            },
        }
    }

    fn temp_output(name: &str) -> PathBuf {
        static SEQ: AtomicU64 = AtomicU64::new(0);
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "dockstat-sweep-{}-{seq}-{name}",
            std::process::id()
        ))
    }

    #[test]
    fn test_sweep_aggregates_per_setting_and_location() {
        // Location 0 stays above 1.0 in both trajectories; location 1 drops
        // to 1.0 in the second, so threshold 0.5 passes and 1.5 splits.
        let trajectories = vec![
            trajectory(&[&[3.0, 2.0], &[2.0, 2.0]]),
            trajectory(&[&[4.0, 2.0], &[2.0, 1.0]]),
        ];
        let settings = vec![setting(0.5), setting(1.5)];
        let cfg = SweepConfig {
            worker_count: 2,
            output: temp_output("aggregate.csv"),
        };

        let summary = run_sweep(
            &cfg,
            &trajectories,
            &settings,
            &AboveThreshold,
            &ctx(2),
            &NoopObserver,
        )
        .unwrap();

        assert_eq!(summary.status(), RunStatus::Passed);
        assert_eq!(summary.succeeded_units, 2);
        assert!(summary.mean_unit_seconds.is_some());

        let content = std::fs::read_to_string(&cfg.output).unwrap();
        std::fs::remove_file(&cfg.output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        // setting 0: satisfied everywhere.
        assert_eq!(
            lines[0],
            "0,0,1.0000000000,1.0000000000,1.0000000000,0.0000000000"
        );
        assert_eq!(
            lines[1],
            "0,1,1.0000000000,1.0000000000,1.0000000000,0.0000000000"
        );
        // setting 1, location 1: one of two trajectories drops to 1.0.
        assert!(lines[3].starts_with("1,1,0.5000000000,0.0000000000,1.0000000000,"));
    }

    #[test]
    fn test_empty_settings_evaluate_defaults_once() {
        let trajectories = vec![trajectory(&[&[1.0]]), trajectory(&[&[0.0]])];
        let cfg = SweepConfig {
            worker_count: 1,
            output: temp_output("defaults.csv"),
        };

        let summary = run_sweep(
            &cfg,
            &trajectories,
            &[],
            &AboveThreshold,
            &ctx(1),
            &NoopObserver,
        )
        .unwrap();

        assert_eq!(summary.status(), RunStatus::Passed);
        let content = std::fs::read_to_string(&cfg.output).unwrap();
        std::fs::remove_file(&cfg.output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("0,0,0.5000000000,"));
    }

    #[test]
    fn test_wrong_location_count_fails_the_unit() {
        struct ShortResult;
        impl SweepExecutor for ShortResult {
            fn evaluate(
                &self,
                _setting: &ParameterSetting,
                _trajectory: &RecordedTrajectory,
                _ctx: &RunContext,
            ) -> anyhow::Result<Vec<f64>> {
                Ok(vec![1.0])
            }
        }

        let trajectories = vec![trajectory(&[&[1.0], &[1.0]])];
        let cfg = SweepConfig {
            worker_count: 1,
            output: temp_output("short.csv"),
        };

        let summary = run_sweep(
            &cfg,
            &trajectories,
            &[setting(0.0)],
            &ShortResult,
            &ctx(2),
            &NoopObserver,
        )
        .unwrap();

        assert_eq!(summary.status(), RunStatus::Failed);
        assert_eq!(summary.failed_units, 1);
        assert!(summary.failures[0].detail.contains("2 locations"));
    }
}
