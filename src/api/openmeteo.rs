//! `OpenMeteo` API response structures and conversion utilities

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::models::{HourlySample, HourlySeries};
use crate::{Result, WindcastError};

/// Hourly metrics requested from the forecast endpoint
pub const HOURLY_METRICS: &str = "wind_speed_10m,wind_direction_10m";

/// Forecast response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    pub hourly: Option<HourlyData>,
}

/// Hourly data as parallel arrays; numeric entries may be `null`
#[derive(Debug, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_direction_10m: Vec<Option<f64>>,
}

/// Parse a local ISO timestamp such as `2026-10-16T14:00`
pub fn parse_local_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| WindcastError::payload(format!("Invalid timestamp '{value}': {e}")))
}

impl ForecastResponse {
    /// Convert the parallel arrays into an ordered series.
    ///
    /// A missing `hourly` object or an empty `time` array is a payload error.
    /// Missing, negative or non-finite numbers become `None` on the sample.
    pub fn into_series(self, location_id: &str, date: NaiveDate) -> Result<HourlySeries> {
        let hourly = self
            .hourly
            .ok_or_else(|| WindcastError::payload("Response has no hourly data"))?;

        if hourly.time.is_empty() {
            return Err(WindcastError::payload("Hourly time series is empty"));
        }

        let mut samples = Vec::with_capacity(hourly.time.len());
        for (i, raw_time) in hourly.time.iter().enumerate() {
            let time = parse_local_time(raw_time)?;

            let speed = hourly
                .wind_speed_10m
                .get(i)
                .copied()
                .flatten()
                .filter(|s| s.is_finite() && *s >= 0.0);

            let bearing = hourly
                .wind_direction_10m
                .get(i)
                .copied()
                .flatten()
                .filter(|d| d.is_finite());

            samples.push(HourlySample::new(time, speed, bearing));
        }

        Ok(HourlySeries::new(location_id, date, samples))
    }
}
