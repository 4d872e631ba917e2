//! Picks the representative hour of a series for the summary view

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::models::HourlySeries;
use crate::{Result, WindcastError};

/// Index of the hour to summarize.
///
/// For today's date this is the first sample at or after the current hour,
/// falling back to the last sample once every hour has passed. For any
/// other date it is the first hour of the day. Fails when the series is
/// empty or the selected sample has no wind speed.
pub fn select_hour(
    series: &HourlySeries,
    target_date: NaiveDate,
    reference_now: NaiveDateTime,
) -> Result<usize> {
    if series.is_empty() {
        return Err(WindcastError::no_data(&series.location_id));
    }

    let index = if target_date == reference_now.date() {
        let current_hour = reference_now.hour();
        series
            .samples()
            .iter()
            .position(|sample| sample.hour() >= current_hour)
            .unwrap_or(series.len() - 1)
    } else {
        0
    };

    match series.get(index) {
        Some(sample) if sample.wind_speed_kmh.is_some() => Ok(index),
        _ => Err(WindcastError::missing_sample(&series.location_id, index)),
    }
}
