//! Result Merger
//!
//! Reassembles per-chunk sample lists into one collection in global unit
//! order. This is a pure reindex using each chunk's start offset, not a
//! reduction; merging chunks that are already in order is a no-op.
//!
//! The measure-name-to-index mapping is taken from unit 0 and every other
//! unit must match it exactly (same names, same order, same series length).
//! A mismatch means the cells cannot be averaged and aborts aggregation.

use dockstat_core::{ConsistencyError, MeasureKind, Sample};
use std::time::Duration;

use crate::worker::ChunkResult;

/// All samples of a successful run, in global unit order.
#[derive(Debug)]
pub struct MergedRun {
    /// Measure identities, in series order, as produced by unit 0.
    pub measures: Vec<MeasureKind>,
    /// Time-step count shared by every series.
    pub steps: usize,
    /// One sample per unit, index = unit index.
    pub samples: Vec<Sample>,
    /// Wall-clock execution time per unit (diagnostic).
    pub unit_durations: Vec<Duration>,
}

impl MergedRun {
    /// Number of units merged.
    pub fn units(&self) -> usize {
        self.samples.len()
    }

    /// Observation for `unit` at (`measure`, `step`).
    pub fn value(&self, unit: usize, measure: usize, step: usize) -> f64 {
        self.samples[unit].series[measure].values[step]
    }

    /// Mean wall-clock execution time per unit.
    pub fn mean_unit_duration(&self) -> Option<Duration> {
        if self.unit_durations.is_empty() {
            None
        } else {
            let total: Duration = self.unit_durations.iter().sum();
            Some(total / self.unit_durations.len() as u32)
        }
    }
}

/// Merge per-chunk results back into global unit order and validate that
/// every unit agrees on measure identity and series length.
pub fn merge(mut chunks: Vec<ChunkResult>) -> Result<MergedRun, ConsistencyError> {
    chunks.sort_by_key(|c| c.chunk.start);

    let mut samples = Vec::new();
    let mut unit_durations = Vec::new();
    for result in chunks {
        // The partitioner guarantees tiling; a gap here is a harness bug.
        assert_eq!(
            result.chunk.start,
            samples.len(),
            "chunk results must tile the unit index space"
        );
        samples.extend(result.samples);
        unit_durations.extend(result.unit_durations);
    }

    let reference = samples.first().map(|s| s.measures()).unwrap_or_default();
    let steps = samples
        .first()
        .and_then(|s| s.series.first())
        .map(|series| series.values.len())
        .unwrap_or(0);

    for (unit, sample) in samples.iter().enumerate() {
        if sample.series.len() != reference.len() {
            return Err(ConsistencyError::SeriesCount {
                unit,
                got: sample.series.len(),
                expected: reference.len(),
            });
        }
        for (index, series) in sample.series.iter().enumerate() {
            if series.kind != reference[index] {
                return Err(ConsistencyError::MeasureMismatch {
                    unit,
                    index,
                    got: series.kind.name().to_string(),
                    expected: reference[index].name().to_string(),
                });
            }
            if series.values.len() != steps {
                return Err(ConsistencyError::SeriesLength {
                    unit,
                    measure: series.kind.name().to_string(),
                    got: series.values.len(),
                    expected: steps,
                });
            }
        }
    }

    Ok(MergedRun {
        measures: reference,
        steps,
        samples,
        unit_durations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockstat_core::Chunk;

    fn chunk_result(worker: usize, start: usize, values: &[f64]) -> ChunkResult {
        ChunkResult {
            chunk: Chunk {
                worker,
                start,
                len: values.len(),
            },
            samples: values
                .iter()
                .map(|&v| Sample::from_named([("Load".to_string(), vec![v, v + 1.0])]))
                .collect(),
            unit_durations: vec![Duration::from_millis(10); values.len()],
        }
    }

    #[test]
    fn test_merge_restores_global_order() {
        // Workers finish out of order; merge reindexes by start offset.
        let chunks = vec![
            chunk_result(1, 2, &[30.0, 40.0]),
            chunk_result(0, 0, &[10.0, 20.0]),
        ];
        let merged = merge(chunks).unwrap();

        assert_eq!(merged.units(), 4);
        assert_eq!(merged.steps, 2);
        let values: Vec<f64> = (0..4).map(|u| merged.value(u, 0, 0)).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_merge_in_order_is_identity() {
        let chunks = vec![
            chunk_result(0, 0, &[1.0, 2.0]),
            chunk_result(1, 2, &[3.0, 4.0]),
        ];
        let merged = merge(chunks).unwrap();
        let values: Vec<f64> = (0..4).map(|u| merged.value(u, 0, 0)).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_measure_mismatch_is_fatal() {
        let mut bad = chunk_result(1, 1, &[2.0]);
        bad.samples[0] = Sample::from_named([("Other".to_string(), vec![2.0, 3.0])]);
        let chunks = vec![chunk_result(0, 0, &[1.0]), bad];

        let err = merge(chunks).unwrap_err();
        assert!(matches!(
            err,
            ConsistencyError::MeasureMismatch { unit: 1, .. }
        ));
    }

    #[test]
    fn test_series_length_mismatch_is_fatal() {
        let mut bad = chunk_result(1, 1, &[2.0]);
        bad.samples[0] = Sample::from_named([("Load".to_string(), vec![2.0])]);
        let chunks = vec![chunk_result(0, 0, &[1.0]), bad];

        let err = merge(chunks).unwrap_err();
        assert!(matches!(
            err,
            ConsistencyError::SeriesLength { unit: 1, got: 1, expected: 2, .. }
        ));
    }

    #[test]
    fn test_mean_unit_duration() {
        let merged = merge(vec![chunk_result(0, 0, &[1.0, 2.0])]).unwrap();
        assert_eq!(merged.mean_unit_duration(), Some(Duration::from_millis(10)));
    }
}
