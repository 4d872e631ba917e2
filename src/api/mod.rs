//! Forecast API client for `OpenMeteo`
//!
//! One GET per location and date, with transient failures (connection
//! errors, 5xx, 429) retried with exponential backoff by the middleware.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, error, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::{HourlySeries, Location};
use crate::{Result, WindcastError};

pub mod openmeteo;

/// Source of hourly wind series
#[async_trait]
pub trait ForecastClient: Send + Sync {
    /// Fetch the hourly series of one calendar date for one location
    async fn fetch_hourly(&self, location: &Location, date: NaiveDate) -> Result<HourlySeries>;
}

/// HTTP client for the `OpenMeteo` forecast endpoint
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    base_url: String,
    timezone: String,
}

impl OpenMeteoClient {
    /// Create a new client from the weather settings
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("windcast/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timezone: config.timezone.clone(),
        })
    }

    /// Request URL for one location and date
    #[must_use]
    pub fn forecast_url(&self, location: &Location, date: NaiveDate) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&hourly={}&start_date={date}&end_date={date}&timezone={}",
            self.base_url,
            location.latitude,
            location.longitude,
            openmeteo::HOURLY_METRICS,
            urlencoding::encode(&self.timezone),
        )
    }
}

#[async_trait]
impl ForecastClient for OpenMeteoClient {
    #[instrument(skip(self, location), fields(location = %location.id, %date))]
    async fn fetch_hourly(&self, location: &Location, date: NaiveDate) -> Result<HourlySeries> {
        let url = self.forecast_url(location, date);
        debug!("OpenMeteo API request URL: {}", url);
        let start_time = Instant::now();

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Network error for {}: {}", location.name, e);
            WindcastError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("Forecast request for {} failed with {}", location.name, status);
            return Err(WindcastError::api(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let body = response.text().await?;
        let parsed: openmeteo::ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| WindcastError::payload(format!("Failed to parse forecast: {e}")))?;
        let series = parsed.into_series(&location.id, date)?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {} hourly samples for {} in {:.3}s",
            series.len(),
            location.name,
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow forecast API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(series)
    }
}
