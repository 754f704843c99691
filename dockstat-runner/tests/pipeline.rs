//! End-to-end pipeline tests: replication runs through trajectory and
//! aggregate tables, then a sweep over the trajectories that were written.

use dockstat_core::{
    RecordedTrajectory, RunContext, Sample, Station, TimeAxis, UnitExecutor, UnitIndex,
};
use dockstat_report::{RunStatus, read_trajectory};
use dockstat_runner::{
    NoopObserver, ParameterSetting, ReplicationConfig, RunError, SweepConfig, SweepExecutor,
    run_replications, run_sweep,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

fn temp_dir(name: &str) -> PathBuf {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "dockstat-pipeline-{}-{seq}-{name}",
        std::process::id()
    ))
}

fn ctx() -> RunContext {
    RunContext {
        stations: vec![
            Station { id: 0, capacity: 50 },
            Station { id: 1, capacity: 30 },
        ],
        time: TimeAxis {
            simulation_time: 10.0,
            samplings: 1,
        },
    }
}

/// Deterministic two-station model: station 0 starts at `10 * (unit + 1)`
/// bikes and settles to 5, station 1 stays at 8, and one scalar measure
/// tracks bikes in transit.
struct TwoStationModel;

impl UnitExecutor for TwoStationModel {
    fn execute(&self, unit: UnitIndex, _seed: u64, _ctx: &RunContext) -> anyhow::Result<Sample> {
        Ok(Sample::from_named([
            (
                "Available0".to_string(),
                vec![10.0 * (unit as f64 + 1.0), 5.0],
            ),
            ("Available1".to_string(), vec![8.0, 8.0]),
            ("BikesInTransit".to_string(), vec![2.0, 2.0]),
        ]))
    }
}

struct FailAt(UnitIndex);

impl UnitExecutor for FailAt {
    fn execute(&self, unit: UnitIndex, seed: u64, ctx: &RunContext) -> anyhow::Result<Sample> {
        if unit == self.0 {
            anyhow::bail!("engine rejected the model");
        }
        TwoStationModel.execute(unit, seed, ctx)
    }
}

fn replication_config(root: &PathBuf) -> ReplicationConfig {
    ReplicationConfig {
        replications: 4,
        worker_count: 2,
        base_seed: 1234,
        traces_dir: root.join("Traces"),
        results_dir: root.join("Results"),
    }
}

#[test]
fn test_replication_run_writes_aggregates_and_trajectories() {
    let root = temp_dir("run");
    let cfg = replication_config(&root);
    let ctx = ctx();

    let summary = run_replications(&cfg, &TwoStationModel, &ctx, &NoopObserver).unwrap();

    assert_eq!(summary.status(), RunStatus::Passed);
    assert_eq!(summary.succeeded_units, 4);
    assert_eq!(summary.failed_units, 0);
    assert!(summary.mean_unit_seconds.is_some());

    // One aggregate table per measure, rows time,mean,stddev,stderr.
    let available0 = std::fs::read_to_string(cfg.results_dir.join("Available0.csv")).unwrap();
    let lines: Vec<&str> = available0.lines().collect();
    assert_eq!(lines.len(), 2);
    // Step 0 sees 10, 20, 30, 40 across the four replications.
    assert_eq!(lines[0], "0.000000,25.000000,12.909944,6.454972");
    assert_eq!(lines[1], "10.000000,5.000000,0.000000,0.000000");

    let transit = std::fs::read_to_string(cfg.results_dir.join("BikesInTransit.csv")).unwrap();
    assert_eq!(
        transit.lines().next().unwrap(),
        "0.000000,2.000000,0.000000,0.000000"
    );

    // One trajectory per replication, readable back as a sweep input.
    for unit in 0..4 {
        let path = cfg.traces_dir.join(format!("Traj{unit}.csv"));
        let recorded = read_trajectory(&path, 2).unwrap();
        assert_eq!(recorded.locations(), 2);
        assert_eq!(recorded.steps(), 2);
        assert_eq!(recorded.available.get(0, 0), 10.0 * (unit as f64 + 1.0));
        assert_eq!(recorded.available.get(1, 1), 8.0);
        // capacity_remaining column round-trips as free slots
        assert_eq!(recorded.free_slots.get(1, 0), 22.0);
    }

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_failed_chunk_is_isolated_and_reported() {
    let root = temp_dir("failure");
    let cfg = replication_config(&root);
    let ctx = ctx();

    // Unit 2 fails, taking its 2-unit chunk down; the other chunk survives.
    let summary = run_replications(&cfg, &FailAt(2), &ctx, &NoopObserver).unwrap();

    assert_eq!(summary.status(), RunStatus::Failed);
    assert_eq!(summary.succeeded_units, 2);
    assert_eq!(summary.failed_units, 2);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].detail.contains("unit 2"));
    assert!(summary.failures[0].detail.contains("engine rejected"));

    // Nothing from the failed run is aggregated.
    assert!(!cfg.results_dir.join("Available0.csv").exists());
    // Survivor trajectories were persisted before the failure surfaced.
    assert!(cfg.traces_dir.join("Traj0.csv").exists());
    assert!(cfg.traces_dir.join("Traj1.csv").exists());

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_uneven_partition_rejected_before_any_work() {
    let root = temp_dir("uneven");
    let mut cfg = replication_config(&root);
    cfg.replications = 10;
    cfg.worker_count = 3;

    let err = run_replications(&cfg, &TwoStationModel, &ctx(), &NoopObserver).unwrap_err();
    assert!(matches!(err, RunError::Config(_)));
    assert!(!cfg.traces_dir.join("Traj0.csv").exists());

    std::fs::remove_dir_all(&root).unwrap();
}

/// Satisfied iff the station keeps both a bike and a free slot at every probe.
struct WindowAvailability;

impl SweepExecutor for WindowAvailability {
    fn evaluate(
        &self,
        setting: &ParameterSetting,
        trajectory: &RecordedTrajectory,
        _ctx: &RunContext,
    ) -> anyhow::Result<Vec<f64>> {
        let min_bikes = setting.get("min_bikes").unwrap_or(0.0);
        Ok((0..trajectory.locations())
            .map(|loc| {
                let ok = (0..trajectory.steps()).all(|step| {
                    trajectory.available.get(loc, step) > min_bikes
                        && trajectory.free_slots.get(loc, step) > 0.0
                });
                if ok { 1.0 } else { 0.0 }
            })
            .collect())
    }
}

#[test]
fn test_sweep_over_recorded_trajectories() {
    let root = temp_dir("sweep");
    let cfg = replication_config(&root);
    let ctx = ctx();
    run_replications(&cfg, &TwoStationModel, &ctx, &NoopObserver).unwrap();

    let trajectories: Vec<RecordedTrajectory> = (0..4)
        .map(|unit| read_trajectory(&cfg.traces_dir.join(format!("Traj{unit}.csv")), 2).unwrap())
        .collect();

    let settings = vec![
        ParameterSetting {
            parameters: vec![("min_bikes".to_string(), 0.0)],
        },
        ParameterSetting {
            parameters: vec![("min_bikes".to_string(), 6.0)],
        },
    ];
    let sweep_cfg = SweepConfig {
        worker_count: 2,
        output: root.join("Formulas").join("window_availability.csv"),
    };

    let summary = run_sweep(
        &sweep_cfg,
        &trajectories,
        &settings,
        &WindowAvailability,
        &ctx,
        &NoopObserver,
    )
    .unwrap();

    assert_eq!(summary.status(), RunStatus::Passed);
    assert_eq!(summary.succeeded_units, 4);

    let content = std::fs::read_to_string(&sweep_cfg.output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    // min_bikes 0: every station always has bikes and free slots.
    assert_eq!(
        lines[0],
        "0,0,1.0000000000,1.0000000000,1.0000000000,0.0000000000"
    );
    assert_eq!(
        lines[1],
        "0,1,1.0000000000,1.0000000000,1.0000000000,0.0000000000"
    );
    // min_bikes 6: station 0 settles to 5 bikes, so no trajectory satisfies.
    assert_eq!(
        lines[2],
        "1,0,0.0000000000,0.0000000000,0.0000000000,0.0000000000"
    );
    // station 1 holds 8 bikes throughout.
    assert_eq!(
        lines[3],
        "1,1,1.0000000000,1.0000000000,1.0000000000,0.0000000000"
    );

    std::fs::remove_dir_all(&root).unwrap();
}
