//! In-memory weather store
//!
//! `WeatherStore` owns the airport registry, the per-airport readings and the
//! query counters behind a single mutex. Every public operation takes the lock
//! once, so validate-then-apply and record-then-query sequences are atomic.
//! Collections are returned as owned snapshots.

pub mod frequency;
pub mod policy;
pub mod readings;
pub mod registry;
pub mod stats;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{Field, WeatherError};
use crate::geo;
use crate::models::{AirportEntry, Measurement, ReadingAggregate};

pub use frequency::RequestFrequencyTracker;
pub use readings::ReadingStore;
pub use registry::AirportRegistry;
pub use stats::StoreStats;

/// Half the equatorial circumference; no two airports are further apart
pub const DEFAULT_MAX_RADIUS_KM: f64 = 20_037.5;

#[derive(Debug, Default)]
struct StoreState {
    registry: AirportRegistry,
    readings: ReadingStore,
    frequency: RequestFrequencyTracker,
}

impl StoreState {
    fn add(&mut self, entry: AirportEntry) -> crate::Result<AirportEntry> {
        let stored = self.registry.add(entry)?;
        self.readings.create(&stored.iata);
        Ok(stored)
    }
}

/// Thread-safe airport weather repository
#[derive(Debug)]
pub struct WeatherStore {
    state: Mutex<StoreState>,
    max_radius_km: f64,
}

impl Default for WeatherStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_radius(DEFAULT_MAX_RADIUS_KM)
    }

    /// Create an empty store accepting query radii up to `max_radius_km`.
    ///
    /// The cap never exceeds [`DEFAULT_MAX_RADIUS_KM`]; the radius histogram
    /// is sized by the largest recorded radius.
    #[must_use]
    pub fn with_max_radius(max_radius_km: f64) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            max_radius_km: max_radius_km.min(DEFAULT_MAX_RADIUS_KM),
        }
    }

    /// Register every entry in order, stopping at the first invalid one
    pub fn seed(&self, entries: impl IntoIterator<Item = AirportEntry>) -> crate::Result<usize> {
        let mut state = self.state.lock();
        let mut added = 0;
        for entry in entries {
            state.add(entry)?;
            added += 1;
        }
        info!(added, "seeded airport registry");
        Ok(added)
    }

    pub fn add_airport(
        &self,
        iata: &str,
        latitude: f64,
        longitude: f64,
    ) -> crate::Result<AirportEntry> {
        self.add_airport_entry(AirportEntry::new(iata, latitude, longitude))
    }

    /// Register a fully described airport and start an empty reading for it
    pub fn add_airport_entry(&self, entry: AirportEntry) -> crate::Result<AirportEntry> {
        let stored = self.state.lock().add(entry)?;
        info!(iata = %stored.iata, "airport added");
        Ok(stored)
    }

    #[must_use]
    pub fn find_airport(&self, iata: &str) -> Option<AirportEntry> {
        self.state.lock().registry.find(iata).cloned()
    }

    #[must_use]
    pub fn airport_index(&self, iata: &str) -> Option<usize> {
        self.state.lock().registry.index_of(iata)
    }

    /// Remove an airport and its reading.
    ///
    /// Returns `Ok(false)` when the code is well-formed but not registered.
    pub fn remove_airport(&self, iata: &str) -> crate::Result<bool> {
        let mut state = self.state.lock();
        match state.registry.remove(iata)? {
            Some(_) => {
                state.readings.remove(iata);
                info!(iata, "airport removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[must_use]
    pub fn list_airports(&self) -> Vec<AirportEntry> {
        self.state.lock().registry.list()
    }

    #[must_use]
    pub fn list_iata_codes(&self) -> Vec<String> {
        self.state
            .lock()
            .registry
            .iter()
            .map(|a| a.iata.clone())
            .collect()
    }

    #[must_use]
    pub fn get_reading(&self, iata: &str) -> Option<ReadingAggregate> {
        self.state.lock().readings.get(iata).cloned()
    }

    /// Every reading, in registry order
    #[must_use]
    pub fn list_readings(&self) -> Vec<ReadingAggregate> {
        let state = self.state.lock();
        state.readings.list_all(&state.registry)
    }

    pub fn apply_measurement(
        &self,
        iata: &str,
        point_type: &str,
        measurement: Measurement,
    ) -> crate::Result<ReadingAggregate> {
        self.apply_measurement_at(iata, point_type, measurement, Utc::now())
    }

    /// Validate `measurement` for `point_type` and store it on `iata`'s reading,
    /// stamping the update with `now`
    pub fn apply_measurement_at(
        &self,
        iata: &str,
        point_type: &str,
        measurement: Measurement,
        now: DateTime<Utc>,
    ) -> crate::Result<ReadingAggregate> {
        let mut state = self.state.lock();
        let current = state
            .readings
            .get(iata)
            .ok_or_else(|| WeatherError::not_found(iata))?;
        let updated = policy::apply(current, point_type, measurement, now)?;
        state.readings.put(iata, updated.clone());
        debug!(iata, point_type, mean = measurement.mean, "measurement applied");
        Ok(updated)
    }

    /// Record one query for `iata` at `radius`
    pub fn record_query(&self, iata: &str, radius: f64) -> crate::Result<()> {
        self.check_radius(radius)?;
        let mut state = self.state.lock();
        Self::record_locked(&mut state, iata, radius);
        Ok(())
    }

    /// Readings around `iata`, recording the query first.
    ///
    /// A radius of 0 returns the airport's own reading, even when empty.
    /// Otherwise every airport within `radius` km contributes its reading if it
    /// holds any data. An empty result is `NotFound`.
    pub fn query_weather(&self, iata: &str, radius: f64) -> crate::Result<Vec<ReadingAggregate>> {
        self.check_radius(radius)?;
        let mut state = self.state.lock();
        Self::record_locked(&mut state, iata, radius);

        if radius == 0.0 {
            return state
                .readings
                .get(iata)
                .map(|reading| vec![reading.clone()])
                .ok_or_else(|| WeatherError::not_found(iata));
        }

        let center = state
            .registry
            .find(iata)
            .ok_or_else(|| WeatherError::not_found(iata))?;
        let nearby: Vec<ReadingAggregate> = state
            .registry
            .iter()
            .filter(|airport| geo::distance(center, airport) <= radius)
            .filter_map(|airport| state.readings.get(&airport.iata))
            .filter(|reading| reading.has_data())
            .cloned()
            .collect();
        debug!(iata, radius, found = nearby.len(), "radius query");

        if nearby.is_empty() {
            return Err(WeatherError::not_found(iata));
        }
        Ok(nearby)
    }

    #[must_use]
    pub fn data_size(&self) -> usize {
        self.data_size_at(Utc::now())
    }

    #[must_use]
    pub fn data_size_at(&self, now: DateTime<Utc>) -> usize {
        stats::data_size(self.state.lock().readings.values(), now)
    }

    #[must_use]
    pub fn iata_frequency_fractions(&self) -> HashMap<String, f64> {
        let state = self.state.lock();
        stats::iata_frequency_fractions(&state.registry, &state.frequency)
    }

    #[must_use]
    pub fn radius_histogram(&self) -> Vec<u64> {
        stats::radius_histogram(&self.state.lock().frequency)
    }

    /// Query counts per IATA code
    #[must_use]
    pub fn request_frequency(&self) -> HashMap<String, u64> {
        self.state.lock().frequency.airport_counts()
    }

    /// Recorded (radius, count) pairs
    #[must_use]
    pub fn radius_frequency(&self) -> Vec<(f64, u64)> {
        self.state.lock().frequency.radius_counts()
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        self.stats_at(Utc::now())
    }

    /// All statistics from one consistent view of the store
    #[must_use]
    pub fn stats_at(&self, now: DateTime<Utc>) -> StoreStats {
        let state = self.state.lock();
        StoreStats {
            datasize: stats::data_size(state.readings.values(), now),
            iata_freq: stats::iata_frequency_fractions(&state.registry, &state.frequency),
            radius_freq: stats::radius_histogram(&state.frequency),
        }
    }

    /// Drop all airports, readings and counters
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.registry.clear();
        state.readings.clear();
        state.frequency.clear();
        info!("store cleared");
    }

    fn check_radius(&self, radius: f64) -> crate::Result<()> {
        if radius.is_finite() && (0.0..=self.max_radius_km).contains(&radius) {
            Ok(())
        } else {
            Err(WeatherError::validation(
                Field::Radius,
                format!("Radius must be between 0 and {} km", self.max_radius_km),
            ))
        }
    }

    fn record_locked(state: &mut StoreState, iata: &str, radius: f64) {
        let resolved = state.registry.find(iata).map(|a| a.iata.as_str());
        state.frequency.record(resolved, radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;
    use std::thread;

    fn wind(mean: i32) -> Measurement {
        Measurement::builder()
            .with_count(10)
            .with_first(10)
            .with_median(20)
            .with_last(30)
            .with_mean(mean)
            .build()
    }

    fn seeded() -> WeatherStore {
        let store = WeatherStore::new();
        store
            .seed([
                AirportEntry::new("BOS", 42.364347, -71.005181),
                AirportEntry::new("EWR", 40.6925, -74.168667),
                AirportEntry::new("JFK", 40.639751, -73.778925),
                AirportEntry::new("LGA", 40.777245, -73.872608),
                AirportEntry::new("MMU", 40.79935, -74.4148747),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_add_round_trip() {
        let store = WeatherStore::new();
        let added = store.add_airport("BSV", 1.2, 2.3).unwrap();
        assert_eq!(store.find_airport(&added.iata), Some(added));
        assert_eq!(store.get_reading("BSV"), Some(ReadingAggregate::default()));
    }

    #[test]
    fn test_add_validation_cites_field() {
        let store = WeatherStore::new();
        assert_eq!(store.add_airport("", 1.2, 2.3).unwrap_err().field(), Some(Field::Iata));
        assert_eq!(store.add_airport("AAA", 0.0, 2.0).unwrap_err().field(), Some(Field::Latitude));
        assert_eq!(store.add_airport("AAA", 1.0, 0.0).unwrap_err().field(), Some(Field::Longitude));
        assert!(store.list_airports().is_empty());
    }

    #[test]
    fn test_remove_unknown_twice() {
        let store = seeded();
        assert!(!store.remove_airport("ZZZ").unwrap());
        assert!(!store.remove_airport("ZZZ").unwrap());
        assert!(store.remove_airport("ZZZZ").unwrap_err().is_validation());
        assert_eq!(store.list_airports().len(), 5);
    }

    #[test]
    fn test_remove_drops_reading() {
        let store = seeded();
        assert!(store.remove_airport("BOS").unwrap());
        assert!(store.get_reading("BOS").is_none());
        assert_eq!(store.list_readings().len(), 4);
        assert_eq!(store.airport_index("EWR"), Some(0));
    }

    #[test]
    fn test_apply_unknown_airport() {
        let store = seeded();
        let err = store.apply_measurement("XXX", "wind", wind(5)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_apply_rejected_keeps_reading() {
        let store = seeded();
        store.apply_measurement("BOS", "wind", wind(5)).unwrap();
        assert!(store.apply_measurement("BOS", "temperature", wind(100)).is_err());

        let reading = store.get_reading("BOS").unwrap();
        assert_eq!(reading.wind, Some(wind(5)));
        assert!(reading.temperature.is_none());
    }

    #[test]
    fn test_query_radius_zero_returns_empty_reading() {
        let store = seeded();
        let readings = store.query_weather("MMU", 0.0).unwrap();
        assert_eq!(readings, vec![ReadingAggregate::default()]);
    }

    #[test]
    fn test_query_nearby() {
        let store = seeded();
        for iata in ["BOS", "JFK", "EWR", "LGA"] {
            store.apply_measurement(iata, "wind", wind(22)).unwrap();
        }
        // BOS sits at ~203 km from JFK under the distance formula
        assert_eq!(store.query_weather("JFK", 200.0).unwrap().len(), 3);
        assert_eq!(store.query_weather("JFK", 205.0).unwrap().len(), 4);
    }

    #[test]
    fn test_query_without_data_is_not_found() {
        let store = seeded();
        assert!(store.query_weather("JFK", 50.0).unwrap_err().is_not_found());
        assert!(store.query_weather("XXX", 0.0).unwrap_err().is_not_found());
        assert!(store.query_weather("XXX", 10.0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_query_unknown_airport_records_radius_only() {
        let store = seeded();
        let _ = store.query_weather("XXX", 10.0);
        assert!(store.request_frequency().is_empty());
        assert_eq!(store.radius_frequency(), vec![(10.0, 0)]);
    }

    #[test]
    fn test_unknown_airport_query_raises_fraction_denominator() {
        let store = WeatherStore::new();
        store.add_airport("BOS", 42.364347, -71.005181).unwrap();
        store.add_airport("JFK", 40.639751, -73.778925).unwrap();

        assert!(store.query_weather("XXX", 0.0).unwrap_err().is_not_found());
        store.query_weather("BOS", 0.0).unwrap();

        let fractions = store.iata_frequency_fractions();
        assert_eq!(fractions.len(), 2);
        assert_eq!(fractions["BOS"], 0.5);
        assert_eq!(fractions["JFK"], 0.0);
        assert!(!fractions.contains_key("XXX"));
    }

    #[test]
    fn test_max_radius_is_clamped() {
        let store = WeatherStore::with_max_radius(1e15);
        store.add_airport("BOS", 42.364347, -71.005181).unwrap();

        let err = store.query_weather("BOS", 1e15).unwrap_err();
        assert_eq!(err.field(), Some(Field::Radius));

        store.record_query("BOS", DEFAULT_MAX_RADIUS_KM).unwrap();
        assert_eq!(store.radius_histogram().len(), 20_038);
    }

    #[test]
    fn test_radius_validation() {
        let store = seeded();
        for radius in [-1.0, f64::NAN, f64::INFINITY, 30_000.0] {
            let err = store.query_weather("BOS", radius).unwrap_err();
            assert_eq!(err.field(), Some(Field::Radius));
        }
        assert!(store.radius_frequency().is_empty());
    }

    #[test]
    fn test_data_size_window() {
        let store = seeded();
        let now = Utc::now();
        let day = Duration::milliseconds(86_400_000);
        store
            .apply_measurement_at("BOS", "wind", wind(1), now - day - Duration::milliseconds(1))
            .unwrap();
        store
            .apply_measurement_at("JFK", "wind", wind(1), now - day + Duration::milliseconds(1))
            .unwrap();
        assert_eq!(store.data_size_at(now), 1);
    }

    #[test]
    fn test_stats_snapshot() {
        let store = seeded();
        store.apply_measurement("BOS", "wind", wind(22)).unwrap();
        store.query_weather("BOS", 0.0).unwrap();

        let stats = store.stats();
        assert_eq!(stats.datasize, 1);
        assert_eq!(stats.iata_freq.len(), 5);
        assert_eq!(stats.iata_freq["BOS"], 1.0);
        assert_eq!(stats.radius_freq, vec![0]);
    }

    #[test]
    fn test_clear() {
        let store = seeded();
        store.query_weather("BOS", 0.0).unwrap();
        store.clear();
        assert!(store.list_airports().is_empty());
        assert!(store.list_readings().is_empty());
        assert!(store.request_frequency().is_empty());
        assert_eq!(store.radius_histogram().len(), 1001);
    }

    #[test]
    fn test_concurrent_updates_and_queries() {
        let store = Arc::new(seeded());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..50 {
                        store.apply_measurement("BOS", "wind", wind(i * 100 + j)).unwrap();
                        store.record_query("BOS", 1.0).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.request_frequency()["BOS"], 400);
        assert_eq!(store.radius_frequency(), vec![(1.0, 399)]);
        assert!(store.get_reading("BOS").unwrap().wind.is_some());
    }
}
