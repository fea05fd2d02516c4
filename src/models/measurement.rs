//! Measurement model: quartile/mean/count summary of a sensor stream

use serde::{Deserialize, Serialize};

/// Statistical summary of a stream of sensor samples.
///
/// Replaced as a whole on update; there is no partial field update.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement {
    /// Mean of the observations
    #[serde(default)]
    pub mean: f64,
    /// First quartile, useful as a lower bound
    #[serde(default)]
    pub first: i32,
    /// Second quartile (median)
    #[serde(default)]
    pub second: i32,
    /// Third quartile, a less noisy upper value
    #[serde(default)]
    pub third: i32,
    /// Total number of samples
    #[serde(default)]
    pub count: i32,
}

impl Measurement {
    #[must_use]
    pub fn new(first: i32, median: i32, third: i32, mean: f64, count: i32) -> Self {
        Self {
            mean,
            first,
            second: median,
            third,
            count,
        }
    }

    #[must_use]
    pub fn builder() -> MeasurementBuilder {
        MeasurementBuilder::default()
    }

    /// Median (second quartile)
    #[must_use]
    pub fn median(&self) -> i32 {
        self.second
    }
}

/// Fluent constructor used by collectors and the reference client.
///
/// `with_last` does not carry its value into the built measurement: the
/// third quartile is always 0 through this path. Use [`Measurement::new`] or
/// the JSON form to set it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementBuilder {
    first: i32,
    mean: i32,
    median: i32,
    count: i32,
}

impl MeasurementBuilder {
    #[must_use]
    pub fn with_first(mut self, first: i32) -> Self {
        self.first = first;
        self
    }

    #[must_use]
    pub fn with_mean(mut self, mean: i32) -> Self {
        self.mean = mean;
        self
    }

    #[must_use]
    pub fn with_median(mut self, median: i32) -> Self {
        self.median = median;
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: i32) -> Self {
        self.count = count;
        self
    }

    /// The upper quartile is not stored: `build()` leaves it at 0.
    ///
    /// Mean and median are never swapped on build. `with_mean` lands in `mean`
    /// and `with_median` in `second`.
    // TODO: confirm with product owners whether the upper quartile should be kept
    #[must_use]
    pub fn with_last(self, _last: i32) -> Self {
        self
    }

    #[must_use]
    pub fn build(self) -> Measurement {
        Measurement {
            mean: f64::from(self.mean),
            first: self.first,
            second: self.median,
            third: 0,
            count: self.count,
        }
    }
}
