//! Hourly wind series for one location and one date

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One hour of forecast wind
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlySample {
    /// Local timestamp in the forecast timezone
    pub time: NaiveDateTime,
    /// Wind speed at 10m in km/h
    pub wind_speed_kmh: Option<f64>,
    /// Wind direction at 10m in degrees (0-360, where 0/360 is North)
    pub wind_bearing: Option<f64>,
}

impl HourlySample {
    #[must_use]
    pub fn new(time: NaiveDateTime, wind_speed_kmh: Option<f64>, wind_bearing: Option<f64>) -> Self {
        Self {
            time,
            wind_speed_kmh,
            wind_bearing,
        }
    }

    /// Hour of day, 0-23
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// `HH:MM` label used by the summary and the chart axis
    #[must_use]
    pub fn hour_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// Chronologically ordered samples of one calendar date at one location.
///
/// A series is built once from a single API response and replaced wholesale
/// on the next refresh.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlySeries {
    pub location_id: String,
    pub date: NaiveDate,
    samples: Vec<HourlySample>,
}

impl HourlySeries {
    /// Build a series, sorting the samples chronologically
    #[must_use]
    pub fn new(location_id: impl Into<String>, date: NaiveDate, mut samples: Vec<HourlySample>) -> Self {
        samples.sort_by_key(|s| s.time);
        Self {
            location_id: location_id.into(),
            date,
            samples,
        }
    }

    #[must_use]
    pub fn samples(&self) -> &[HourlySample] {
        &self.samples
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HourlySample> {
        self.samples.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
