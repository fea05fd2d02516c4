//! Airport weather - in-memory repository and query engine
//!
//! Holds a registry of airports and their latest atmospheric readings,
//! answers radius queries and reports usage statistics. The HTTP transport,
//! bootstrap loader and reference client are thin layers over [`WeatherStore`].

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod geo;
pub mod loader;
pub mod logging;
pub mod models;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use client::WeatherClient;
pub use config::AppConfig;
pub use error::{Field, WeatherError};
pub use models::{AirportEntry, Category, Measurement, MeasurementBuilder, ReadingAggregate};
pub use store::{StoreStats, WeatherStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;
