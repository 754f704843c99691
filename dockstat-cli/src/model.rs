//! Built-in Station Flow Model
//!
//! A self-contained stochastic bike-share model, so a study can be run
//! without wiring up an external simulation engine. Bikes leave stations
//! into transit and arrive from transit into free slots; the total bike
//! count is conserved across the network.
//!
//! Also provides the matching sweep property: a station satisfies
//! "window availability" when it keeps more than `min_bikes` bikes and at
//! least one free slot at every probe of the evaluated time window.

use dockstat_core::{RecordedTrajectory, RunContext, Sample, UnitIndex};
use dockstat_runner::{ParameterSetting, SweepExecutor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stochastic station flow model; one replication per unit.
#[derive(Debug, Clone, Copy)]
pub struct StationFlowModel {
    /// Largest per-interval change in a station's available bikes.
    pub max_move: u32,
}

impl dockstat_core::UnitExecutor for StationFlowModel {
    fn execute(&self, _unit: UnitIndex, seed: u64, ctx: &RunContext) -> anyhow::Result<Sample> {
        let mut rng = StdRng::seed_from_u64(seed);
        let stations = ctx.stations.len();
        let probes = ctx.time.probes();

        // Every station starts half full; the rest of the fleet is parked.
        let mut available: Vec<u32> = ctx.stations.iter().map(|s| s.capacity / 2).collect();
        let mut transit: u32 = 0;

        let mut per_station: Vec<Vec<f64>> = vec![Vec::with_capacity(probes); stations];
        let mut in_transit: Vec<f64> = Vec::with_capacity(probes);

        for step in 0..probes {
            for (station, series) in per_station.iter_mut().enumerate() {
                series.push(available[station] as f64);
            }
            in_transit.push(transit as f64);

            if step + 1 == probes {
                break;
            }

            // Departures: bikes leave stations into transit.
            for avail in available.iter_mut() {
                let departures = rng.gen_range(0..=self.max_move).min(*avail);
                *avail -= departures;
                transit += departures;
            }
            // Arrivals: transit bikes dock where slots are free.
            for (station, avail) in available.iter_mut().enumerate() {
                let free = ctx.stations[station].capacity - *avail;
                let arrivals = rng.gen_range(0..=self.max_move).min(transit).min(free);
                *avail += arrivals;
                transit -= arrivals;
            }
        }

        let mut series: Vec<(String, Vec<f64>)> = per_station
            .into_iter()
            .enumerate()
            .map(|(station, values)| (format!("Available{station}"), values))
            .collect();
        series.push(("BikesInTransit".to_string(), in_transit));

        Ok(Sample::from_named(series))
    }
}

/// Window availability property for the parameter sweep.
///
/// Parameters: `min_bikes` (default 0), `window_start` and `window_end`
/// (default: the whole trajectory).
#[derive(Debug, Clone, Copy)]
pub struct WindowAvailability;

impl SweepExecutor for WindowAvailability {
    fn evaluate(
        &self,
        setting: &ParameterSetting,
        trajectory: &RecordedTrajectory,
        _ctx: &RunContext,
    ) -> anyhow::Result<Vec<f64>> {
        let min_bikes = setting.get("min_bikes").unwrap_or(0.0);
        let start = setting.get("window_start").unwrap_or(f64::NEG_INFINITY);
        let end = setting.get("window_end").unwrap_or(f64::INFINITY);

        Ok((0..trajectory.locations())
            .map(|loc| {
                let ok = (0..trajectory.steps())
                    .filter(|&step| {
                        let t = trajectory.times[step];
                        t >= start && t <= end
                    })
                    .all(|step| {
                        trajectory.available.get(loc, step) > min_bikes
                            && trajectory.free_slots.get(loc, step) > 0.0
                    });
                if ok { 1.0 } else { 0.0 }
            })
            .collect())
    }
}
