//! Delimited Result Tables
//!
//! All tables are comma-delimited with `.`-decimal fixed-point numbers, so
//! files are byte-stable across locales. Row order is deterministic:
//! ascending time, then ascending location, then ascending setting index.
//!
//! Formats:
//! - trajectory rows: `time,location,available,capacity_remaining`
//! - measure aggregate rows: `time,mean,stddev,stderr`
//! - sweep aggregate rows: `setting,location,mean,min,max,stddev`
//! - station table (read only): header row, then one row per station with
//!   the capacity at column 3

use dockstat_core::{RecordedTrajectory, Station, StationTrajectory, TimeAxis};
use dockstat_stats::CellSummary;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure reading or writing a result table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Underlying file I/O failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// OS error.
        #[source]
        source: std::io::Error,
    },

    /// A row did not match the expected format.
    #[error("{path}:{line}: {message}")]
    Parse {
        /// File involved.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

impl TableError {
    fn io(path: &Path, source: std::io::Error) -> TableError {
        TableError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn parse(path: &Path, line: usize, message: impl Into<String>) -> TableError {
        TableError::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

/// Write one replication's station trajectory.
///
/// Rows are ordered by ascending time, then ascending station. The fourth
/// column is the remaining capacity (`capacity - available`).
pub fn write_trajectory(
    path: &Path,
    trajectory: &StationTrajectory,
    capacities: &[u32],
    time: &TimeAxis,
) -> Result<(), TableError> {
    let file = File::create(path).map_err(|e| TableError::io(path, e))?;
    let mut out = BufWriter::new(file);

    for step in 0..trajectory.steps() {
        for station in 0..trajectory.stations() {
            let available = trajectory.get(station, step);
            let remaining = capacities[station] as f64 - available;
            writeln!(
                out,
                "{:.6},{},{:.6},{:.6}",
                time.time_at(step),
                station,
                available,
                remaining
            )
            .map_err(|e| TableError::io(path, e))?;
        }
    }

    out.flush().map_err(|e| TableError::io(path, e))
}

/// Read a trajectory table back as a sweep input signal.
///
/// `locations` is the number of stations the network has; the file must hold
/// a whole number of time frames of exactly that many rows.
pub fn read_trajectory(path: &Path, locations: usize) -> Result<RecordedTrajectory, TableError> {
    let file = File::open(path).map_err(|e| TableError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut rows: Vec<(usize, f64, usize, f64, f64)> = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TableError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 4 {
            return Err(TableError::parse(
                path,
                i + 1,
                format!("expected 4 fields, got {}", fields.len()),
            ));
        }
        let parse_f64 = |s: &str, what: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| TableError::parse(path, i + 1, format!("invalid {what}: {s:?}")))
        };
        let station = fields[1]
            .trim()
            .parse::<usize>()
            .map_err(|_| TableError::parse(path, i + 1, format!("invalid location: {:?}", fields[1])))?;
        if station >= locations {
            return Err(TableError::parse(
                path,
                i + 1,
                format!("location {station} out of range (network has {locations})"),
            ));
        }
        rows.push((
            i + 1,
            parse_f64(fields[0], "time")?,
            station,
            parse_f64(fields[2], "available")?,
            parse_f64(fields[3], "capacity_remaining")?,
        ));
    }

    if rows.is_empty() || rows.len() % locations != 0 {
        return Err(TableError::parse(
            path,
            rows.len(),
            format!(
                "{} rows is not a whole number of {locations}-location frames",
                rows.len()
            ),
        ));
    }

    let steps = rows.len() / locations;
    let mut times = vec![0.0; steps];
    let mut available = StationTrajectory::new(locations, steps);
    let mut free_slots = StationTrajectory::new(locations, steps);

    // Each frame must cover every station exactly once; the row count alone
    // cannot catch a duplicate paired with an omission.
    let mut seen = vec![false; locations];
    for (r, (line, time, station, avail, remaining)) in rows.into_iter().enumerate() {
        let step = r / locations;
        if r % locations == 0 {
            seen.fill(false);
        }
        if seen[station] {
            return Err(TableError::parse(
                path,
                line,
                format!("location {station} appears twice in the frame at time {time}"),
            ));
        }
        seen[station] = true;
        times[step] = time;
        available.set(station, step, avail);
        free_slots.set(station, step, remaining);
    }

    Ok(RecordedTrajectory {
        times,
        available,
        free_slots,
    })
}

/// Write one measure's cross-replication aggregate.
///
/// Rows are `time,mean,stddev,stderr`, ascending time.
pub fn write_measure_aggregate(
    path: &Path,
    summaries: &[CellSummary],
    time: &TimeAxis,
) -> Result<(), TableError> {
    let file = File::create(path).map_err(|e| TableError::io(path, e))?;
    let mut out = BufWriter::new(file);

    for (step, cell) in summaries.iter().enumerate() {
        writeln!(
            out,
            "{:.6},{:.6},{:.6},{:.6}",
            time.time_at(step),
            cell.mean,
            cell.std_dev,
            cell.std_err
        )
        .map_err(|e| TableError::io(path, e))?;
    }

    out.flush().map_err(|e| TableError::io(path, e))
}

/// Write one formula's sweep aggregate.
///
/// Rows are `setting,location,mean,min,max,stddev`, ascending setting index
/// then ascending location. Ten decimals, as satisfaction statistics are
/// probabilities with small spreads.
pub fn write_sweep_aggregate(
    path: &Path,
    per_setting: &[Vec<CellSummary>],
) -> Result<(), TableError> {
    let file = File::create(path).map_err(|e| TableError::io(path, e))?;
    let mut out = BufWriter::new(file);

    for (setting, locations) in per_setting.iter().enumerate() {
        for (location, cell) in locations.iter().enumerate() {
            writeln!(
                out,
                "{},{},{:.10},{:.10},{:.10},{:.10}",
                setting, location, cell.mean, cell.min, cell.max, cell.std_dev
            )
            .map_err(|e| TableError::io(path, e))?;
        }
    }

    out.flush().map_err(|e| TableError::io(path, e))
}

/// Read the station capacity table.
///
/// The first row is a header; every following row describes one station with
/// its capacity at column 3. Station ids are assigned in row order.
pub fn read_stations(path: &Path) -> Result<Vec<Station>, TableError> {
    let file = File::open(path).map_err(|e| TableError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut stations = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TableError::io(path, e))?;
        if i == 0 || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 4 {
            return Err(TableError::parse(
                path,
                i + 1,
                format!("expected at least 4 fields, got {}", fields.len()),
            ));
        }
        let capacity = fields[3].trim().parse::<u32>().map_err(|_| {
            TableError::parse(path, i + 1, format!("invalid capacity: {:?}", fields[3]))
        })?;
        stations.push(Station {
            id: stations.len(),
            capacity,
        });
    }

    Ok(stations)
}
