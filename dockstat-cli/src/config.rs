//! Configuration loading from dockstat.toml
//!
//! Dockstat configuration can be specified in a `dockstat.toml` file in the
//! study's root directory. The configuration is automatically discovered by
//! walking up from the current directory; CLI flags override file values.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Dockstat configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DockstatConfig {
    /// Replication runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output layout configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Built-in station flow model configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Parameter sweep configuration
    #[serde(default)]
    pub sweep: SweepSectionConfig,
}

/// Replication runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of independent replications
    #[serde(default = "default_replications")]
    pub replications: usize,
    /// Worker pool size; must divide the replication count evenly
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Base seed; replication i runs with base_seed + i
    #[serde(default = "default_base_seed")]
    pub base_seed: u64,
    /// Total simulated time
    #[serde(default = "default_simulation_time")]
    pub simulation_time: f64,
    /// Number of sampling intervals (series hold samplings + 1 probes)
    #[serde(default = "default_samplings")]
    pub samplings: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            replications: default_replications(),
            workers: default_workers(),
            base_seed: default_base_seed(),
            simulation_time: default_simulation_time(),
            samplings: default_samplings(),
        }
    }
}

fn default_replications() -> usize {
    100
}
fn default_workers() -> usize {
    4
}
fn default_base_seed() -> u64 {
    1
}
fn default_simulation_time() -> f64 {
    1440.0
}
fn default_samplings() -> usize {
    288
}

/// Output layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for all study outputs
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Save the run summary as JSON next to the result tables
    #[serde(default)]
    pub save_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_summary: false,
        }
    }
}

fn default_output_dir() -> String {
    "target/dockstat".to_string()
}

/// Built-in station flow model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Station capacity table (header row, capacity at column 3);
    /// when unset, a synthetic network is generated
    #[serde(default)]
    pub stations_file: Option<String>,
    /// Synthetic network size, used when no station table is given
    #[serde(default = "default_stations")]
    pub stations: usize,
    /// Synthetic station capacity
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Largest per-interval change in a station's available bikes
    #[serde(default = "default_max_move")]
    pub max_move: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            stations_file: None,
            stations: default_stations(),
            capacity: default_capacity(),
            max_move: default_max_move(),
        }
    }
}

fn default_stations() -> usize {
    10
}
fn default_capacity() -> u32 {
    20
}
fn default_max_move() -> u32 {
    2
}

/// Parameter sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSectionConfig {
    /// Output table name, written under `<output>/Formulas/<formula>.csv`
    #[serde(default = "default_formula")]
    pub formula: String,
    /// Minimum-bikes thresholds; one sweep setting per value
    #[serde(default = "default_min_bikes")]
    pub min_bikes: Vec<f64>,
    /// Start of the evaluated time window; defaults to the trajectory start
    #[serde(default)]
    pub window_start: Option<f64>,
    /// End of the evaluated time window; defaults to the trajectory end
    #[serde(default)]
    pub window_end: Option<f64>,
}

impl Default for SweepSectionConfig {
    fn default() -> Self {
        Self {
            formula: default_formula(),
            min_bikes: default_min_bikes(),
            window_start: None,
            window_end: None,
        }
    }
}

fn default_formula() -> String {
    "window_availability".to_string()
}
fn default_min_bikes() -> Vec<f64> {
    vec![0.0, 1.0, 2.0]
}

impl DockstatConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("dockstat.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Dockstat Configuration

[runner]
# Number of independent replications
replications = 100
# Worker pool size; must divide the replication count evenly
workers = 4
# Base seed; replication i runs with base_seed + i
base_seed = 1
# Total simulated time (minutes)
simulation_time = 1440.0
# Sampling intervals; each series holds samplings + 1 probes
samplings = 288

[output]
# Root directory for Traces/, Results/ and Formulas/
directory = "target/dockstat"
# Save the run summary as JSON next to the result tables
save_summary = false

[model]
# Station capacity table (uncomment to load a real network)
# stations_file = "stations.csv"
# Synthetic network, used when no station table is given
stations = 10
capacity = 20
# Largest per-interval change in a station's available bikes
max_move = 2

[sweep]
# Output table name, written under <output>/Formulas/
formula = "window_availability"
# Minimum-bikes thresholds; one sweep setting per value
min_bikes = [0.0, 1.0, 2.0]
# Evaluated time window (uncomment to restrict)
# window_start = 420.0
# window_end = 600.0
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DockstatConfig::default();
        assert_eq!(config.runner.replications, 100);
        assert_eq!(config.runner.workers, 4);
        assert_eq!(config.runner.samplings, 288);
        assert_eq!(config.output.directory, "target/dockstat");
        assert!(config.model.stations_file.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            replications = 8
            workers = 2

            [sweep]
            min_bikes = [0.0, 5.0]
        "#;

        let config: DockstatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.replications, 8);
        assert_eq!(config.runner.workers, 2);
        assert_eq!(config.sweep.min_bikes, vec![0.0, 5.0]);
        // Defaults should still apply
        assert_eq!(config.runner.base_seed, 1);
        assert_eq!(config.model.stations, 10);
    }

    #[test]
    fn test_default_toml_parses() {
        let default_toml = DockstatConfig::default_toml();
        let config: DockstatConfig = toml::from_str(&default_toml).unwrap();
        assert_eq!(config.runner.replications, 100);
        assert_eq!(config.sweep.formula, "window_availability");
    }
}
