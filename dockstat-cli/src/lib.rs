#![warn(missing_docs)]
//! Dockstat CLI Library
//!
//! Command-line front end for the replication harness: loads `dockstat.toml`,
//! assembles the station network and time axis, and drives either a
//! replication run (`simulate`) or a formula sweep over previously recorded
//! trajectories (`sweep`). Progress is reported through an indicatif-backed
//! observer; a run that fails exits non-zero after printing its summary.

mod config;
mod model;

pub use config::{DockstatConfig, ModelConfig, OutputConfig, RunnerConfig, SweepSectionConfig};
pub use model::{StationFlowModel, WindowAvailability};

use clap::{Parser, Subcommand};
use dockstat_core::{ConfigError, RunContext, Station, TimeAxis, UnitIndex};
use dockstat_report::{
    RunStatus, RunSummary, format_human_summary, generate_json_summary, read_stations,
    read_trajectory,
};
use dockstat_runner::{
    ParameterSetting, ReplicationConfig, RunObserver, SweepConfig, run_replications, run_sweep,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Dockstat CLI arguments
#[derive(Parser, Debug)]
#[command(name = "dockstat")]
#[command(author, version, about = "Dockstat - parallel replication studies for station networks")]
pub struct Cli {
    /// Subcommand; defaults to Simulate
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (default: discover dockstat.toml upwards)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the number of replications
    #[arg(long)]
    pub replications: Option<usize>,

    /// Override the worker pool size
    #[arg(long, short = 'j')]
    pub workers: Option<usize>,

    /// Override the base seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the output root directory
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the replication study (default)
    Simulate,
    /// Sweep the formula settings over recorded trajectories
    Sweep,
    /// Write a default dockstat.toml to the current directory
    Init,
}

/// Run the Dockstat CLI with the given arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Dockstat CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if matches!(cli.command, Some(Commands::Init)) {
        return init_config();
    }

    let config = match &cli.config {
        Some(path) => DockstatConfig::load(path)?,
        None => DockstatConfig::discover().unwrap_or_default(),
    };

    let ctx = build_context(&config)?;
    let output_root = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));

    let summary = match cli.command {
        Some(Commands::Sweep) => sweep(&cli, &config, &ctx, &output_root)?,
        Some(Commands::Simulate) | None => simulate(&cli, &config, &ctx, &output_root)?,
        Some(Commands::Init) => unreachable!("handled above"),
    };

    print!("{}", format_human_summary(&summary));

    if config.output.save_summary {
        let path = output_root.join("summary.json");
        std::fs::write(&path, generate_json_summary(&summary)?)?;
        println!("Summary written to: {}", path.display());
    }

    if summary.status() == RunStatus::Failed {
        std::process::exit(1);
    }
    Ok(())
}

fn init_config() -> anyhow::Result<()> {
    let path = Path::new("dockstat.toml");
    if path.exists() {
        return Err(anyhow::anyhow!("dockstat.toml already exists"));
    }
    std::fs::write(path, DockstatConfig::default_toml())?;
    println!("Wrote dockstat.toml");
    Ok(())
}

/// Assemble the run context: the station network and the sampling time axis.
fn build_context(config: &DockstatConfig) -> anyhow::Result<RunContext> {
    // Probe times are step * simulation_time / samplings; both must be usable.
    if config.runner.samplings == 0 {
        return Err(ConfigError::Invalid("samplings must be at least 1".to_string()).into());
    }
    if !(config.runner.simulation_time > 0.0) {
        return Err(ConfigError::Invalid(format!(
            "simulation_time must be positive, got {}",
            config.runner.simulation_time
        ))
        .into());
    }

    let stations = match &config.model.stations_file {
        Some(path) => read_stations(Path::new(path))?,
        None => (0..config.model.stations)
            .map(|id| Station {
                id,
                capacity: config.model.capacity,
            })
            .collect(),
    };
    if stations.is_empty() {
        return Err(anyhow::anyhow!("the station network is empty"));
    }

    Ok(RunContext {
        stations,
        time: TimeAxis {
            simulation_time: config.runner.simulation_time,
            samplings: config.runner.samplings,
        },
    })
}

fn simulate(
    cli: &Cli,
    config: &DockstatConfig,
    ctx: &RunContext,
    output_root: &Path,
) -> anyhow::Result<RunSummary> {
    let replications = cli.replications.unwrap_or(config.runner.replications);
    let workers = cli.workers.unwrap_or(config.runner.workers);
    let base_seed = cli.seed.unwrap_or(config.runner.base_seed);

    let run_cfg = ReplicationConfig {
        replications,
        worker_count: workers,
        base_seed,
        traces_dir: output_root.join("Traces"),
        results_dir: output_root.join("Results"),
    };
    let model = StationFlowModel {
        max_move: config.model.max_move,
    };

    println!(
        "Running {} replications on {} workers ({} stations, {} probes)...",
        replications,
        workers,
        ctx.stations.len(),
        ctx.time.probes()
    );

    let observer = ProgressObserver::new(replications as u64, cli.quiet);
    let summary = run_replications(&run_cfg, &model, ctx, &observer)?;
    observer.finish();
    Ok(summary)
}

fn sweep(
    cli: &Cli,
    config: &DockstatConfig,
    ctx: &RunContext,
    output_root: &Path,
) -> anyhow::Result<RunSummary> {
    let traces_dir = output_root.join("Traces");
    let paths = discover_trajectories(&traces_dir)?;
    if paths.is_empty() {
        return Err(anyhow::anyhow!(
            "no trajectories found in {} (run `dockstat simulate` first)",
            traces_dir.display()
        ));
    }

    let trajectories = paths
        .iter()
        .map(|path| read_trajectory(path, ctx.stations.len()))
        .collect::<Result<Vec<_>, _>>()?;

    let settings = sweep_settings(&config.sweep);
    let sweep_cfg = SweepConfig {
        worker_count: cli.workers.unwrap_or(config.runner.workers),
        output: output_root
            .join("Formulas")
            .join(format!("{}.csv", config.sweep.formula)),
    };

    println!(
        "Sweeping {} settings over {} trajectories ({} locations)...",
        settings.len(),
        trajectories.len(),
        ctx.stations.len()
    );

    let observer = ProgressObserver::new(trajectories.len() as u64, cli.quiet);
    let summary = run_sweep(
        &sweep_cfg,
        &trajectories,
        &settings,
        &WindowAvailability,
        ctx,
        &observer,
    )?;
    observer.finish();
    Ok(summary)
}

/// One setting per configured threshold, sharing the configured time window.
fn sweep_settings(sweep: &SweepSectionConfig) -> Vec<ParameterSetting> {
    sweep
        .min_bikes
        .iter()
        .map(|&min_bikes| {
            let mut parameters = vec![("min_bikes".to_string(), min_bikes)];
            if let Some(start) = sweep.window_start {
                parameters.push(("window_start".to_string(), start));
            }
            if let Some(end) = sweep.window_end {
                parameters.push(("window_end".to_string(), end));
            }
            ParameterSetting { parameters }
        })
        .collect()
}

/// Trajectory tables in `dir`, ordered by ascending unit index.
fn discover_trajectories(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut units: Vec<usize> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        if let Some(unit) = name
            .strip_prefix("Traj")
            .and_then(|rest| rest.strip_suffix(".csv"))
            .and_then(|unit| unit.parse::<usize>().ok())
        {
            units.push(unit);
        }
    }
    units.sort_unstable();
    Ok(units
        .into_iter()
        .map(|unit| dir.join(format!("Traj{unit}.csv")))
        .collect())
}

/// Progress bar observer for interactive runs.
struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(total: u64, quiet: bool) -> ProgressObserver {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total)
        };
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        ProgressObserver { bar }
    }

    fn finish(&self) {
        self.bar.finish_with_message("Complete");
    }
}

impl RunObserver for ProgressObserver {
    fn unit_completed(&self, unit: UnitIndex) {
        self.bar.set_message(format!("unit {unit}"));
        self.bar.inc(1);
    }

    fn chunk_failed(&self, worker: usize, message: &str) {
        self.bar.println(format!("worker {worker} failed: {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_settings_carry_window() {
        let section = SweepSectionConfig {
            formula: "window_availability".to_string(),
            min_bikes: vec![0.0, 2.0],
            window_start: Some(420.0),
            window_end: Some(600.0),
        };
        let settings = sweep_settings(&section);

        assert_eq!(settings.len(), 2);
        assert_eq!(settings[0].get("min_bikes"), Some(0.0));
        assert_eq!(settings[1].get("min_bikes"), Some(2.0));
        assert_eq!(settings[1].get("window_start"), Some(420.0));
        assert_eq!(settings[1].get("window_end"), Some(600.0));
    }

    #[test]
    fn test_synthetic_network_from_config() {
        let mut config = DockstatConfig::default();
        config.model.stations = 3;
        config.model.capacity = 12;

        let ctx = build_context(&config).unwrap();
        assert_eq!(ctx.stations.len(), 3);
        assert_eq!(ctx.stations[2], Station { id: 2, capacity: 12 });
        assert_eq!(ctx.time.probes(), config.runner.samplings + 1);
    }

    #[test]
    fn test_degenerate_time_axis_rejected() {
        let mut config = DockstatConfig::default();
        config.runner.samplings = 0;
        let err = build_context(&config).unwrap_err();
        assert!(err.to_string().contains("samplings"));

        let mut config = DockstatConfig::default();
        config.runner.simulation_time = 0.0;
        let err = build_context(&config).unwrap_err();
        assert!(err.to_string().contains("simulation_time"));

        config.runner.simulation_time = f64::NAN;
        assert!(build_context(&config).is_err());
    }

    #[test]
    fn test_discover_trajectories_sorted_numerically() {
        let dir = std::env::temp_dir().join(format!("dockstat-cli-discover-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for unit in [10, 2, 0] {
            std::fs::write(dir.join(format!("Traj{unit}.csv")), "").unwrap();
        }
        std::fs::write(dir.join("notes.txt"), "").unwrap();

        let paths = discover_trajectories(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Traj0.csv", "Traj2.csv", "Traj10.csv"]);
    }
}
