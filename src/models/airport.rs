//! Airport model: identity and location of a registered airport

use serde::{Deserialize, Serialize};

use crate::error::{Field, WeatherError};

/// Number of characters in an IATA code
pub const IATA_CODE_LEN: usize = 3;

/// A registered airport.
///
/// The IATA code is the primary key. Entries are never mutated once stored;
/// the registry hands out clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportEntry {
    /// Three letter IATA code
    pub iata: String,
    /// Latitude in decimal degrees
    #[serde(default)]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(default)]
    pub longitude: f64,
    /// Airport name
    #[serde(default)]
    pub name: Option<String>,
    /// Main city served by the airport
    #[serde(default)]
    pub city: Option<String>,
    /// Country or territory
    #[serde(default)]
    pub country: Option<String>,
    /// Four letter ICAO code
    #[serde(default)]
    pub icao: Option<String>,
    /// Hours offset from UTC, fractional hours as decimals (e.g. "5.5")
    #[serde(default)]
    pub timezone: Option<String>,
    /// DST region: E, A, S, O, Z, N or U
    #[serde(default)]
    pub dst: Option<String>,
}

impl AirportEntry {
    /// Create an airport with only identity and coordinates set
    #[must_use]
    pub fn new(iata: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            iata: iata.into(),
            latitude,
            longitude,
            name: None,
            city: None,
            country: None,
            icao: None,
            timezone: None,
            dst: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn with_icao(mut self, icao: impl Into<String>) -> Self {
        self.icao = Some(icao.into());
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    #[must_use]
    pub fn with_dst(mut self, dst: impl Into<String>) -> Self {
        self.dst = Some(dst.into());
        self
    }

    /// Check the creation invariants: well-formed IATA code, non-zero coordinates.
    ///
    /// 0.0 is treated as "not set", so an airport exactly on the equator or the
    /// prime meridian cannot be registered.
    pub fn validate(&self) -> crate::Result<()> {
        validate_iata(&self.iata)?;
        if self.latitude == 0.0 {
            return Err(WeatherError::validation(
                Field::Latitude,
                "Latitude should be set",
            ));
        }
        if self.longitude == 0.0 {
            return Err(WeatherError::validation(
                Field::Longitude,
                "Longitude should be set",
            ));
        }
        Ok(())
    }
}

/// Check that `iata` is exactly three non-blank characters
pub fn validate_iata(iata: &str) -> crate::Result<()> {
    let well_formed =
        iata.chars().count() == IATA_CODE_LEN && !iata.chars().any(char::is_whitespace);
    if well_formed {
        Ok(())
    } else {
        Err(WeatherError::validation(Field::Iata, "IATA code is incorrect"))
    }
}
