//! Atmospheric reading store: one aggregate per registered airport

use std::collections::HashMap;

use crate::models::ReadingAggregate;
use crate::store::AirportRegistry;

#[derive(Debug, Default, Clone)]
pub struct ReadingStore {
    readings: HashMap<String, ReadingAggregate>,
}

impl ReadingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, iata: &str) -> Option<&ReadingAggregate> {
        self.readings.get(iata)
    }

    /// Replace the aggregate for `iata` wholesale
    pub fn put(&mut self, iata: &str, aggregate: ReadingAggregate) {
        self.readings.insert(iata.to_string(), aggregate);
    }

    /// Start an empty aggregate for a newly registered airport
    pub fn create(&mut self, iata: &str) {
        self.put(iata, ReadingAggregate::default());
    }

    pub fn remove(&mut self, iata: &str) -> Option<ReadingAggregate> {
        self.readings.remove(iata)
    }

    /// Snapshot of every aggregate in `registry` order, so index `i` belongs to
    /// the registry's `i`th airport
    #[must_use]
    pub fn list_all(&self, registry: &AirportRegistry) -> Vec<ReadingAggregate> {
        registry
            .iter()
            .map(|airport| self.readings.get(&airport.iata).cloned().unwrap_or_default())
            .collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &ReadingAggregate> {
        self.readings.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}
