//! Selected-hour summary and full-day chart series for one location

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::forecast_selector::select_hour;
use crate::models::{HourlySample, HourlySeries, Location};
use crate::wind_analysis::{Cardinal, ScoreRating, wind_score};
use crate::{Result, WindcastError};

/// Conditions at the selected hour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    /// `HH:MM` of the selected sample
    pub hour_label: String,
    /// Quality score 0-10
    pub score: f64,
    pub rating: ScoreRating,
    pub cardinal: Cardinal,
    /// Observed bearing in degrees
    pub bearing: f64,
    /// Speed rounded to whole km/h
    pub speed_kmh: i64,
    pub desired_bearing: f64,
    pub desired_cardinal: Cardinal,
}

/// One hour on the quality chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub hour_label: String,
    pub score: f64,
    pub cardinal: Cardinal,
    pub speed_kmh: i64,
}

/// Hourly score chart for a location and date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityChart {
    pub title: String,
    pub date: NaiveDate,
    pub desired_bearing: f64,
    pub points: Vec<ChartPoint>,
}

/// Everything rendered for one location after a successful fetch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationReport {
    pub current: CurrentConditions,
    pub chart: QualityChart,
}

fn round_speed(speed: f64) -> i64 {
    speed.round() as i64
}

fn chart_point(sample: &HourlySample, desired_bearing: f64) -> Option<ChartPoint> {
    let bearing = sample.wind_bearing?;
    let speed = sample.wind_speed_kmh?;
    Some(ChartPoint {
        hour_label: sample.hour_label(),
        score: wind_score(bearing, desired_bearing),
        cardinal: Cardinal::from_degrees(bearing),
        speed_kmh: round_speed(speed),
    })
}

impl LocationReport {
    /// Score a series against the location's desired bearing.
    ///
    /// Fails with the selector's error when there is nothing to summarize,
    /// and with `MissingSample` when the selected hour has no bearing.
    pub fn build(
        location: &Location,
        series: &HourlySeries,
        target_date: NaiveDate,
        reference_now: NaiveDateTime,
    ) -> Result<Self> {
        let index = select_hour(series, target_date, reference_now)?;
        let sample = series
            .get(index)
            .ok_or_else(|| WindcastError::missing_sample(&location.id, index))?;

        let (Some(bearing), Some(speed)) = (sample.wind_bearing, sample.wind_speed_kmh) else {
            return Err(WindcastError::missing_sample(&location.id, index));
        };

        let score = wind_score(bearing, location.desired_bearing);
        let current = CurrentConditions {
            hour_label: sample.hour_label(),
            score,
            rating: ScoreRating::from_score(score),
            cardinal: Cardinal::from_degrees(bearing),
            bearing,
            speed_kmh: round_speed(speed),
            desired_bearing: location.desired_bearing,
            desired_cardinal: Cardinal::from_degrees(location.desired_bearing),
        };

        let points = series
            .samples()
            .iter()
            .filter_map(|sample| chart_point(sample, location.desired_bearing))
            .collect();

        let chart = QualityChart {
            title: format!("{} - wind score and direction by hour", location.name),
            date: target_date,
            desired_bearing: location.desired_bearing,
            points,
        };

        Ok(Self { current, chart })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn itaipu() -> Location {
        Location::new("itaipu", "Canal de Itaipu", -22.95, -43.06, 56.0)
    }

    fn series(samples: Vec<(u32, Option<f64>, Option<f64>)>) -> HourlySeries {
        HourlySeries::new(
            "itaipu",
            date(),
            samples
                .into_iter()
                .map(|(h, speed, bearing)| {
                    HourlySample::new(date().and_hms_opt(h, 0, 0).unwrap(), speed, bearing)
                })
                .collect(),
        )
    }

    #[test]
    fn test_build_report_for_today() {
        let series = series(vec![
            (9, Some(10.4), Some(236.0)),
            (10, Some(14.6), Some(56.0)),
            (11, Some(18.2), Some(100.0)),
        ]);
        let now = date().and_hms_opt(10, 20, 0).unwrap();

        let report = LocationReport::build(&itaipu(), &series, date(), now).unwrap();
        assert_eq!(report.current.hour_label, "10:00");
        assert_eq!(report.current.score, 10.0);
        assert_eq!(report.current.rating, ScoreRating::Excellent);
        assert_eq!(report.current.cardinal, Cardinal::NE);
        assert_eq!(report.current.speed_kmh, 15);
        assert_eq!(report.current.desired_cardinal, Cardinal::NE);

        let scores: Vec<f64> = report.chart.points.iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![0.0, 10.0, 7.6]);
        let speeds: Vec<i64> = report.chart.points.iter().map(|p| p.speed_kmh).collect();
        assert_eq!(speeds, vec![10, 15, 18]);
        assert_eq!(report.chart.points[2].cardinal, Cardinal::L);
    }

    #[test]
    fn test_chart_skips_hours_without_data() {
        let series = series(vec![
            (0, Some(5.0), Some(56.0)),
            (1, None, Some(56.0)),
            (2, Some(7.0), None),
        ]);
        let tomorrow = date().succ_opt().unwrap();
        let now = date().and_hms_opt(22, 0, 0).unwrap();

        let report = LocationReport::build(&itaipu(), &series, tomorrow, now).unwrap();
        assert_eq!(report.current.hour_label, "00:00");
        assert_eq!(report.chart.points.len(), 1);
    }

    #[test]
    fn test_missing_bearing_at_selected_hour() {
        let series = series(vec![(0, Some(5.0), None)]);
        let tomorrow = date().succ_opt().unwrap();
        let now = date().and_hms_opt(8, 0, 0).unwrap();

        let err = LocationReport::build(&itaipu(), &series, tomorrow, now).unwrap_err();
        assert!(matches!(err, WindcastError::MissingSample { index: 0, .. }));
    }

    #[test]
    fn test_empty_series_has_no_report() {
        let series = series(Vec::new());
        let now = date().and_hms_opt(8, 0, 0).unwrap();
        let err = LocationReport::build(&itaipu(), &series, date(), now).unwrap_err();
        assert!(matches!(err, WindcastError::NoData { .. }));
    }
}
