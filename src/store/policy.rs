//! Update policy: bounds-checks a measurement before it replaces a category

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{Field, WeatherError};
use crate::models::{Category, Measurement, ReadingAggregate};

const REJECTED: &str = "could not update atmospheric data";

/// Return a copy of `current` with `point_type` replaced by `measurement`.
///
/// `point_type` is matched case-insensitively. An unknown category and an
/// out-of-range mean fail with the same validation error; `current` is never
/// modified.
pub fn apply(
    current: &ReadingAggregate,
    point_type: &str,
    measurement: Measurement,
    now: DateTime<Utc>,
) -> crate::Result<ReadingAggregate> {
    let category: Category = point_type.parse()?;
    if !category.accepts(measurement.mean) {
        warn!(%category, mean = measurement.mean, "measurement out of range");
        return Err(WeatherError::validation(Field::Category, REJECTED));
    }

    let mut updated = current.clone();
    updated.set(category, measurement, now);
    Ok(updated)
}
