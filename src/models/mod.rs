//! Domain models for the airport weather store
//!
//! - Airport: registry entry keyed by IATA code
//! - Measurement: quartile/mean summary of one sensor stream
//! - Reading: per-airport bundle of the latest measurements

pub mod airport;
pub mod measurement;
pub mod reading;

pub use airport::{AirportEntry, IATA_CODE_LEN, validate_iata};
pub use measurement::{Measurement, MeasurementBuilder};
pub use reading::{Category, FRESHNESS_WINDOW_MS, ReadingAggregate};
