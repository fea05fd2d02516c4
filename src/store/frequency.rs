//! Request frequency tracker: per-airport and per-radius query counters

use std::collections::HashMap;

/// Hashable key for a radius value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RadiusKey(u64);

impl RadiusKey {
    fn new(radius: f64) -> Self {
        // -0.0 and 0.0 share a bucket
        let radius = if radius == 0.0 { 0.0 } else { radius };
        Self(radius.to_bits())
    }

    fn radius(self) -> f64 {
        f64::from_bits(self.0)
    }
}

/// Query counters. Both maps only grow until cleared.
#[derive(Debug, Default, Clone)]
pub struct RequestFrequencyTracker {
    airport_counts: HashMap<String, u64>,
    /// Queries naming a code that is not registered share one bucket
    unresolved_count: u64,
    radius_counts: HashMap<RadiusKey, u64>,
}

impl RequestFrequencyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one query against `airport` (if it resolved) and observe `radius`.
    ///
    /// The first observation of a radius stores 0; only repeats increment it.
    pub fn record(&mut self, airport: Option<&str>, radius: f64) {
        match airport {
            Some(iata) => *self.airport_counts.entry(iata.to_string()).or_insert(0) += 1,
            None => self.unresolved_count += 1,
        }
        self.radius_counts
            .entry(RadiusKey::new(radius))
            .and_modify(|count| *count += 1)
            .or_insert(0);
    }

    #[must_use]
    pub fn airport_count(&self, iata: &str) -> u64 {
        self.airport_counts.get(iata).copied().unwrap_or(0)
    }

    /// Number of distinct airports ever queried. Unresolved queries count as
    /// one extra key once any has been recorded.
    #[must_use]
    pub fn distinct_airports(&self) -> usize {
        self.airport_counts.len() + usize::from(self.unresolved_count > 0)
    }

    /// Queries whose code did not resolve to a registered airport
    #[must_use]
    pub fn unresolved_count(&self) -> u64 {
        self.unresolved_count
    }

    #[must_use]
    pub fn airport_counts(&self) -> HashMap<String, u64> {
        self.airport_counts.clone()
    }

    /// (radius, count) pairs in no particular order
    #[must_use]
    pub fn radius_counts(&self) -> Vec<(f64, u64)> {
        self.radius_counts
            .iter()
            .map(|(key, count)| (key.radius(), *count))
            .collect()
    }

    pub fn clear(&mut self) {
        self.airport_counts.clear();
        self.unresolved_count = 0;
        self.radius_counts.clear();
    }
}
