//! Location model for the monitored spots

use serde::{Deserialize, Serialize};

/// A fixed spot with the wind bearing that works best there
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Stable identifier, also used to address the render targets
    pub id: String,
    /// Display name
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Ideal wind bearing in degrees (0 = North, clockwise)
    pub desired_bearing: f64,
    /// Why this bearing works for the spot
    #[serde(default)]
    pub note: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        desired_bearing: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude,
            longitude,
            desired_bearing,
            note: None,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Region identifier of the summary block for this location
    #[must_use]
    pub fn summary_target(&self) -> String {
        format!("{}-status", self.id)
    }

    /// Region identifier of the chart for this location
    #[must_use]
    pub fn chart_target(&self) -> String {
        format!("{}-chart", self.id)
    }
}

/// The two beaches in Niterói the tool was written for
#[must_use]
pub fn default_locations() -> Vec<Location> {
    vec![
        Location::new("itacoatiara", "Praia de Itacoatiara", -22.97, -43.04, 10.0)
            .with_note("Northerly wind, offshore for the Itacoatiara surf break"),
        Location::new("itaipu", "Canal de Itaipu", -22.95, -43.06, 56.0)
            .with_note("North-easterly wind, ideal for kitesurfing in the channel"),
    ]
}
