//! Reference HTTP client for the weather server
//!
//! Shows how collectors and readers talk to the service, and bulk-uploads
//! airport files.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{error, info, instrument, warn};

use crate::error::WeatherError;
use crate::models::{AirportEntry, Measurement, ReadingAggregate};
use crate::store::StoreStats;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Thin async client over the `/collect` and `/query` routes
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    /// Create a new client for the server at `base_url`
    pub fn new(base_url: impl Into<String>) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("airport-weather/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn ping_collect(&self) -> crate::Result<String> {
        let body = self
            .client
            .get(self.url("/collect/ping"))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        info!("collect.ping: {body}");
        Ok(body)
    }

    pub async fn ping_query(&self) -> crate::Result<StoreStats> {
        let stats: StoreStats = self
            .client
            .get(self.url("/query/ping"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!(datasize = stats.datasize, "query.ping");
        Ok(stats)
    }

    /// Send one measurement for `iata`
    #[instrument(skip(self, measurement))]
    pub async fn update_weather(
        &self,
        iata: &str,
        point_type: &str,
        measurement: &Measurement,
    ) -> crate::Result<StatusCode> {
        let response = self
            .client
            .post(self.url(&format!("/collect/weather/{iata}/{point_type}")))
            .json(measurement)
            .send()
            .await?;
        Ok(response.status())
    }

    /// Push a sample wind reading for BOS
    pub async fn populate(&self) -> crate::Result<StatusCode> {
        let measurement = Measurement::builder()
            .with_first(0)
            .with_last(10)
            .with_mean(4)
            .with_median(4)
            .with_count(10)
            .build();
        let status = self.update_weather("BOS", "wind", &measurement).await?;
        info!("populate response status={status}");
        Ok(status)
    }

    pub async fn query(&self, iata: &str, radius: f64) -> crate::Result<Vec<ReadingAggregate>> {
        let response = self
            .client
            .get(self.url(&format!("/query/weather/{iata}/{radius}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(WeatherError::not_found(iata));
        }
        Ok(response.error_for_status()?.json().await?)
    }

    /// POST each airport to the collector.
    ///
    /// Airports the server rejects are logged and skipped; a transport failure
    /// stops the upload. Returns how many were accepted.
    pub async fn upload_airports(&self, airports: &[AirportEntry]) -> crate::Result<usize> {
        let mut accepted = 0;
        for airport in airports {
            let response = self
                .client
                .post(self.url("/collect/airport"))
                .json(airport)
                .send()
                .await
                .map_err(|e| {
                    error!("Connection error. Please check the server is running: {e}");
                    WeatherError::from(e)
                })?;

            if response.status().is_success() {
                accepted += 1;
            } else {
                let status = response.status();
                let reason = response.text().await.unwrap_or_default();
                warn!(iata = %airport.iata, %status, reason = %reason, "airport rejected");
            }
        }
        info!(accepted, total = airports.len(), "airport upload finished");
        Ok(accepted)
    }
}
