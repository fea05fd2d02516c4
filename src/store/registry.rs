//! Airport registry: the canonical, ordered set of airports

use tracing::debug;

use crate::error::{Field, WeatherError};
use crate::models::{AirportEntry, validate_iata};

/// Airports in insertion order, keyed by IATA code.
///
/// Iteration order is load-bearing: the reading store lists aggregates in the
/// same order so positions correlate.
#[derive(Debug, Default, Clone)]
pub struct AirportRegistry {
    airports: Vec<AirportEntry>,
}

impl AirportRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a copy of `entry`, returning the stored copy
    pub fn add(&mut self, entry: AirportEntry) -> crate::Result<AirportEntry> {
        entry.validate()?;
        if self.find(&entry.iata).is_some() {
            return Err(WeatherError::validation(
                Field::Iata,
                format!("Airport with iata=[{}] already exists", entry.iata),
            ));
        }
        debug!(iata = %entry.iata, "registering airport");
        self.airports.push(entry.clone());
        Ok(entry)
    }

    #[must_use]
    pub fn find(&self, iata: &str) -> Option<&AirportEntry> {
        self.airports.iter().find(|a| a.iata == iata)
    }

    /// Position of `iata` in iteration order
    #[must_use]
    pub fn index_of(&self, iata: &str) -> Option<usize> {
        self.airports.iter().position(|a| a.iata == iata)
    }

    /// Remove an airport. `Ok(None)` for a well-formed but unknown code.
    pub fn remove(&mut self, iata: &str) -> crate::Result<Option<AirportEntry>> {
        validate_iata(iata)?;
        Ok(self.index_of(iata).map(|idx| self.airports.remove(idx)))
    }

    /// Snapshot of all airports in iteration order
    #[must_use]
    pub fn list(&self) -> Vec<AirportEntry> {
        self.airports.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AirportEntry> {
        self.airports.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn clear(&mut self) {
        self.airports.clear();
    }
}
