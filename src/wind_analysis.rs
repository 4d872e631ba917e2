//! Wind direction analysis
//!
//! Converts bearings into compass labels and rates how close an observed
//! wind bearing is to the bearing a spot works best with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Eight-point compass label (Portuguese abbreviations: L = leste, O = oeste)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    N,
    NE,
    L,
    SE,
    S,
    SO,
    O,
    NO,
}

impl Cardinal {
    /// Map a bearing in degrees onto one of eight 45° sectors.
    ///
    /// Sectors are centred on the cardinal and intercardinal points, with an
    /// exclusive lower and inclusive upper bound (`(22.5, 67.5]` is NE). The
    /// north sector wraps: `> 337.5` or `<= 22.5`. Bearings outside `[0, 360)`
    /// are normalized first; non-finite input maps to N.
    #[must_use]
    pub fn from_degrees(bearing: f64) -> Self {
        if !bearing.is_finite() {
            return Cardinal::N;
        }
        match normalize_bearing(bearing) {
            d if d > 337.5 || d <= 22.5 => Cardinal::N,
            d if d <= 67.5 => Cardinal::NE,
            d if d <= 112.5 => Cardinal::L,
            d if d <= 157.5 => Cardinal::SE,
            d if d <= 202.5 => Cardinal::S,
            d if d <= 247.5 => Cardinal::SO,
            d if d <= 292.5 => Cardinal::O,
            _ => Cardinal::NO,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Cardinal::N => "N",
            Cardinal::NE => "NE",
            Cardinal::L => "L",
            Cardinal::SE => "SE",
            Cardinal::S => "S",
            Cardinal::SO => "SO",
            Cardinal::O => "O",
            Cardinal::NO => "NO",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fold any finite bearing into `[0, 360)`
#[must_use]
pub fn normalize_bearing(bearing: f64) -> f64 {
    let normalized = bearing.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Shorter arc between two bearings, 0-180°
#[must_use]
pub fn angular_difference(observed: f64, desired: f64) -> f64 {
    let diff = (normalize_bearing(observed) - normalize_bearing(desired)).abs();
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Quality score 0-10 (one decimal) for an observed bearing against the
/// desired one. Linear in the angular distance: 10 when aligned, 0 when
/// the wind blows from the opposite direction.
#[must_use]
pub fn wind_score(observed: f64, desired: f64) -> f64 {
    let diff = angular_difference(observed, desired);
    let score = 10.0 * (1.0 - diff / 180.0);
    (score * 10.0).round() / 10.0
}

/// Qualitative band for a score, used in the text summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreRating {
    Excellent,
    Good,
    Marginal,
    Poor,
}

impl ScoreRating {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 8.5 => ScoreRating::Excellent,
            s if s >= 6.5 => ScoreRating::Good,
            s if s >= 4.0 => ScoreRating::Marginal,
            _ => ScoreRating::Poor,
        }
    }
}

impl fmt::Display for ScoreRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreRating::Excellent => write!(f, "Excellent"),
            ScoreRating::Good => write!(f, "Good"),
            ScoreRating::Marginal => write!(f, "Marginal"),
            ScoreRating::Poor => write!(f, "Poor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Cardinal::N)]
    #[case(10.0, Cardinal::N)]
    #[case(22.5, Cardinal::N)]
    #[case(22.6, Cardinal::NE)]
    #[case(56.0, Cardinal::NE)]
    #[case(67.5, Cardinal::NE)]
    #[case(67.6, Cardinal::L)]
    #[case(112.5, Cardinal::L)]
    #[case(157.5, Cardinal::SE)]
    #[case(202.5, Cardinal::S)]
    #[case(247.5, Cardinal::SO)]
    #[case(292.5, Cardinal::O)]
    #[case(337.5, Cardinal::NO)]
    #[case(337.6, Cardinal::N)]
    #[case(359.9, Cardinal::N)]
    fn test_cardinal_boundaries(#[case] bearing: f64, #[case] expected: Cardinal) {
        assert_eq!(Cardinal::from_degrees(bearing), expected);
    }

    #[rstest]
    #[case(360.0, Cardinal::N)]
    #[case(-10.0, Cardinal::N)]
    #[case(-90.0, Cardinal::O)]
    #[case(720.0 + 90.0, Cardinal::L)]
    #[case(f64::NAN, Cardinal::N)]
    fn test_cardinal_normalizes_input(#[case] bearing: f64, #[case] expected: Cardinal) {
        assert_eq!(Cardinal::from_degrees(bearing), expected);
    }

    #[test]
    fn test_cardinal_is_total_over_domain() {
        let mut bearing = 0.0;
        while bearing < 360.0 {
            let label = Cardinal::from_degrees(bearing).label();
            assert!(["N", "NE", "L", "SE", "S", "SO", "O", "NO"].contains(&label));
            bearing += 0.5;
        }
    }

    #[test]
    fn test_angular_difference() {
        assert_eq!(angular_difference(0.0, 0.0), 0.0);
        assert_eq!(angular_difference(0.0, 90.0), 90.0);
        assert_eq!(angular_difference(0.0, 180.0), 180.0);
        assert_eq!(angular_difference(0.0, 270.0), 90.0);
        assert_eq!(angular_difference(0.0, 350.0), 10.0);
        assert_eq!(angular_difference(10.0, 350.0), 20.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(90.0)]
    #[case(180.0)]
    #[case(270.0)]
    #[case(359.0)]
    fn test_score_aligned_is_ten(#[case] bearing: f64) {
        assert_eq!(wind_score(bearing, bearing), 10.0);
    }

    #[test]
    fn test_score_antipodal_is_zero() {
        assert_eq!(wind_score(10.0, 190.0), 0.0);
        assert_eq!(wind_score(270.0, 90.0), 0.0);
    }

    #[test]
    fn test_score_examples() {
        assert_eq!(wind_score(10.0, 10.0), 10.0);
        assert_eq!(wind_score(100.0, 10.0), 5.0);
        assert_eq!(wind_score(350.0, 10.0), 8.9);
        assert_eq!(wind_score(56.0, 10.0), 7.4);
    }

    #[test]
    fn test_score_is_symmetric() {
        let bearings = [0.0, 17.0, 56.0, 123.4, 180.0, 222.2, 300.0, 359.9];
        for a in bearings {
            for b in bearings {
                assert_eq!(wind_score(a, b), wind_score(b, a), "a={a} b={b}");
            }
        }
    }

    #[test]
    fn test_score_decreases_with_distance() {
        let mut previous = wind_score(10.0, 10.0);
        for offset in 1..=180 {
            let score = wind_score(10.0 + f64::from(offset), 10.0);
            assert!(score <= previous, "offset {offset}");
            assert!((0.0..=10.0).contains(&score));
            previous = score;
        }
    }

    #[test]
    fn test_score_rating() {
        assert_eq!(ScoreRating::from_score(10.0), ScoreRating::Excellent);
        assert_eq!(ScoreRating::from_score(7.0), ScoreRating::Good);
        assert_eq!(ScoreRating::from_score(4.0), ScoreRating::Marginal);
        assert_eq!(ScoreRating::from_score(1.2), ScoreRating::Poor);
    }
}
