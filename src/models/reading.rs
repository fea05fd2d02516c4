//! Per-airport reading aggregate and measurement categories

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Field, WeatherError};
use crate::models::Measurement;

/// How long a reading counts towards the data size after its last update
pub const FRESHNESS_WINDOW_MS: i64 = 86_400_000;

/// Kind of atmospheric measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Wind,
    Temperature,
    Humidity,
    Pressure,
    CloudCover,
    Precipitation,
}

impl Category {
    pub const fn all() -> &'static [Category] {
        &[
            Category::Wind,
            Category::Temperature,
            Category::Humidity,
            Category::Pressure,
            Category::CloudCover,
            Category::Precipitation,
        ]
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Wind => "wind",
            Category::Temperature => "temperature",
            Category::Humidity => "humidity",
            Category::Pressure => "pressure",
            Category::CloudCover => "cloudcover",
            Category::Precipitation => "precipitation",
        }
    }

    /// Accepted mean range as `[lower, upper)`; `None` means unbounded above
    #[must_use]
    pub fn bounds(&self) -> (f64, Option<f64>) {
        match self {
            Category::Wind => (0.0, None),
            Category::Temperature => (-50.0, Some(100.0)),
            Category::Humidity => (0.0, Some(100.0)),
            Category::Pressure => (650.0, Some(800.0)),
            Category::CloudCover => (0.0, Some(100.0)),
            Category::Precipitation => (0.0, Some(100.0)),
        }
    }

    /// Whether `mean` lies in this category's half-open range
    #[must_use]
    pub fn accepts(&self, mean: f64) -> bool {
        let (lower, upper) = self.bounds();
        mean >= lower && upper.is_none_or(|upper| mean < upper)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = WeatherError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "wind" => Ok(Category::Wind),
            "temperature" => Ok(Category::Temperature),
            // "humidty" is the spelling older collectors send
            "humidity" | "humidty" => Ok(Category::Humidity),
            "pressure" => Ok(Category::Pressure),
            "cloudcover" => Ok(Category::CloudCover),
            "precipitation" => Ok(Category::Precipitation),
            _ => Err(WeatherError::validation(
                Field::Category,
                "could not update atmospheric data",
            )),
        }
    }
}

/// Latest measurement per category for one airport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingAggregate {
    pub wind: Option<Measurement>,
    pub temperature: Option<Measurement>,
    pub humidity: Option<Measurement>,
    pub pressure: Option<Measurement>,
    pub cloud_cover: Option<Measurement>,
    pub precipitation: Option<Measurement>,
    /// Time of the last accepted update, serialised as epoch milliseconds
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_update_time: Option<DateTime<Utc>>,
}

impl ReadingAggregate {
    #[must_use]
    pub fn get(&self, category: Category) -> Option<&Measurement> {
        match category {
            Category::Wind => self.wind.as_ref(),
            Category::Temperature => self.temperature.as_ref(),
            Category::Humidity => self.humidity.as_ref(),
            Category::Pressure => self.pressure.as_ref(),
            Category::CloudCover => self.cloud_cover.as_ref(),
            Category::Precipitation => self.precipitation.as_ref(),
        }
    }

    /// Replace one category and stamp the update time
    pub fn set(&mut self, category: Category, measurement: Measurement, now: DateTime<Utc>) {
        let slot = match category {
            Category::Wind => &mut self.wind,
            Category::Temperature => &mut self.temperature,
            Category::Humidity => &mut self.humidity,
            Category::Pressure => &mut self.pressure,
            Category::CloudCover => &mut self.cloud_cover,
            Category::Precipitation => &mut self.precipitation,
        };
        *slot = Some(measurement);
        self.last_update_time = Some(now);
    }

    /// True if at least one category holds a measurement
    #[must_use]
    pub fn has_data(&self) -> bool {
        Category::all().iter().any(|c| self.get(*c).is_some())
    }

    /// True if the last update happened strictly within the freshness window before `now`
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.last_update_time
            .is_some_and(|updated| updated > now - Duration::milliseconds(FRESHNESS_WINDOW_MS))
    }
}
