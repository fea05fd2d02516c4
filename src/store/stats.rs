//! Query aggregator: freshness count, frequency fractions, radius histogram

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::ReadingAggregate;
use crate::store::{AirportRegistry, RequestFrequencyTracker};

/// Largest radius assumed when no radius has been recorded yet
const DEFAULT_MAX_RADIUS: f64 = 1000.0;

/// Health snapshot served by the query ping endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub datasize: usize,
    pub iata_freq: HashMap<String, f64>,
    pub radius_freq: Vec<u64>,
}

/// Number of aggregates holding data that were updated within the last 24 hours
pub fn data_size<'a>(
    readings: impl IntoIterator<Item = &'a ReadingAggregate>,
    now: DateTime<Utc>,
) -> usize {
    readings
        .into_iter()
        .filter(|reading| reading.has_data() && reading.is_fresh(now))
        .count()
}

/// Share of queries per registered airport.
///
/// The denominator is the number of distinct airports ever queried, not the
/// total query count. Queries for unregistered codes add one shared key to
/// it but never get an entry of their own. Nothing is emitted until at least
/// one query has been recorded.
#[must_use]
pub fn iata_frequency_fractions(
    registry: &AirportRegistry,
    tracker: &RequestFrequencyTracker,
) -> HashMap<String, f64> {
    let distinct = tracker.distinct_airports();
    if distinct == 0 {
        return HashMap::new();
    }
    registry
        .iter()
        .map(|airport| {
            let fraction = tracker.airport_count(&airport.iata) as f64 / distinct as f64;
            (airport.iata.clone(), fraction)
        })
        .collect()
}

/// Histogram sized by the largest recorded radius, bucketed by `floor(radius) mod 10`.
///
/// Radii are non-negative by the time they reach the tracker, so every bucket
/// index is at most `floor(max)` and fits.
#[must_use]
pub fn radius_histogram(tracker: &RequestFrequencyTracker) -> Vec<u64> {
    let counts = tracker.radius_counts();
    let max = counts
        .iter()
        .map(|(radius, _)| *radius)
        .reduce(f64::max)
        .unwrap_or(DEFAULT_MAX_RADIUS);

    let mut hist = vec![0u64; max.floor() as usize + 1];
    for (radius, count) in counts {
        let idx = (radius.floor() as i64 % 10) as usize;
        match hist.get_mut(idx) {
            Some(bucket) => *bucket += count,
            None => warn!(radius, "radius bucket outside histogram"),
        }
    }
    hist
}
