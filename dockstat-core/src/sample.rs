//! Samples and Measure Classification
//!
//! A [`Sample`] is the output of executing one unit: an ordered list of named
//! series, each a sequence of doubles indexed by time step (or, for sweeps,
//! by location). Series names following the `Available<id>` convention denote
//! a specific station; classification happens once, when the sample is built,
//! so downstream consumers route on a tag rather than re-parsing strings.

use serde::{Deserialize, Serialize};

/// Classification of one measure series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureKind {
    /// A global measure; the series is a single scalar per time step.
    Scalar(String),
    /// A per-station measure; the series is that station's trajectory.
    Spatial {
        /// Station id parsed from the measure name.
        station: usize,
        /// The full measure name, kept for output file naming.
        name: String,
    },
}

impl MeasureKind {
    /// Classify a measure name.
    ///
    /// `Available<id>` (e.g. `Available3`) is a spatial measure for station
    /// `<id>`; anything else is a scalar measure.
    pub fn classify(name: &str) -> MeasureKind {
        match name
            .strip_prefix("Available")
            .filter(|rest| !rest.is_empty())
            .and_then(|rest| rest.parse::<usize>().ok())
        {
            Some(station) => MeasureKind::Spatial {
                station,
                name: name.to_string(),
            },
            None => MeasureKind::Scalar(name.to_string()),
        }
    }

    /// The full measure name.
    pub fn name(&self) -> &str {
        match self {
            MeasureKind::Scalar(name) => name,
            MeasureKind::Spatial { name, .. } => name,
        }
    }

    /// The station id, for spatial measures.
    pub fn station(&self) -> Option<usize> {
        match self {
            MeasureKind::Scalar(_) => None,
            MeasureKind::Spatial { station, .. } => Some(*station),
        }
    }
}

/// One named series of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Classified measure identity.
    pub kind: MeasureKind,
    /// Values indexed by time step (replications) or location (sweeps).
    pub values: Vec<f64>,
}

/// The indexed result of executing one unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sample {
    /// Series in the order the executor produced them.
    pub series: Vec<Series>,
}

impl Sample {
    /// Build a sample from named series, classifying each name once.
    pub fn from_named(series: impl IntoIterator<Item = (String, Vec<f64>)>) -> Sample {
        Sample {
            series: series
                .into_iter()
                .map(|(name, values)| Series {
                    kind: MeasureKind::classify(&name),
                    values,
                })
                .collect(),
        }
    }

    /// Whether any series is a spatial (per-station) measure.
    pub fn has_spatial(&self) -> bool {
        self.series
            .iter()
            .any(|s| matches!(s.kind, MeasureKind::Spatial { .. }))
    }

    /// Measure kinds in series order.
    pub fn measures(&self) -> Vec<MeasureKind> {
        self.series.iter().map(|s| s.kind.clone()).collect()
    }
}
