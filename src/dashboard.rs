//! Per-location render state
//!
//! Every location owns one panel: a summary state and a chart slot. The slot
//! holds at most one chart and is replaced wholesale on each refresh; the
//! previous chart is dropped, never patched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};

use crate::models::Location;
use crate::report::{CurrentConditions, LocationReport, QualityChart};
use crate::{Result, WindcastError};

/// What the summary region of a location currently shows
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelState {
    /// Nothing fetched yet
    Idle,
    /// A fetch for this date is in flight
    Loading { date: NaiveDate },
    Ready {
        date: NaiveDate,
        current: CurrentConditions,
    },
    /// Fetch or data failure, shown inline for this location only
    Error { date: NaiveDate, message: String },
}

/// Exclusively owned chart handle of one location
#[derive(Debug, Default)]
pub struct ChartSlot {
    chart: Option<QualityChart>,
    /// Number of charts installed so far
    generation: u64,
}

impl ChartSlot {
    /// Install a new chart, handing back the one it displaced
    pub fn replace(&mut self, chart: QualityChart) -> Option<QualityChart> {
        self.generation += 1;
        self.chart.replace(chart)
    }

    pub fn clear(&mut self) -> Option<QualityChart> {
        self.chart.take()
    }

    #[must_use]
    pub fn current(&self) -> Option<&QualityChart> {
        self.chart.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Serialized as the current chart alone, or `null`
impl Serialize for ChartSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.chart.serialize(serializer)
    }
}

#[derive(Debug, Serialize)]
pub struct LocationPanel {
    pub location_id: String,
    pub name: String,
    /// Render target of the summary block
    pub summary_target: String,
    /// Render target of the chart
    pub chart_target: String,
    pub state: PanelState,
    #[serde(rename = "chart")]
    chart_slot: ChartSlot,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LocationPanel {
    #[must_use]
    pub fn new(location: &Location) -> Self {
        Self {
            location_id: location.id.clone(),
            name: location.name.clone(),
            summary_target: location.summary_target(),
            chart_target: location.chart_target(),
            state: PanelState::Idle,
            chart_slot: ChartSlot::default(),
            updated_at: None,
        }
    }

    pub fn mark_loading(&mut self, date: NaiveDate) {
        self.state = PanelState::Loading { date };
    }

    /// Apply the outcome of one refresh of this location.
    ///
    /// Success swaps in the new chart; failure clears the chart so no stale
    /// chart is shown next to the error message.
    pub fn apply(&mut self, date: NaiveDate, outcome: Result<LocationReport>) {
        match outcome {
            Ok(report) => {
                self.chart_slot.replace(report.chart);
                self.state = PanelState::Ready {
                    date,
                    current: report.current,
                };
            }
            Err(err) => {
                self.chart_slot.clear();
                self.state = PanelState::Error {
                    date,
                    message: self.error_message(&err),
                };
            }
        }
        self.updated_at = Some(Utc::now());
    }

    fn error_message(&self, err: &WindcastError) -> String {
        match err {
            WindcastError::MissingSample { .. } => err.user_message(),
            _ => format!("Failed to load wind data for {}.", self.name),
        }
    }

    #[must_use]
    pub fn chart(&self) -> Option<&QualityChart> {
        self.chart_slot.current()
    }

    #[must_use]
    pub fn chart_generation(&self) -> u64 {
        self.chart_slot.generation()
    }
}

/// Panels of every configured location, in table order
#[derive(Debug, Serialize)]
pub struct Dashboard {
    selected_date: NaiveDate,
    panels: Vec<LocationPanel>,
}

impl Dashboard {
    #[must_use]
    pub fn new(locations: &[Location], selected_date: NaiveDate) -> Self {
        Self {
            selected_date,
            panels: locations.iter().map(LocationPanel::new).collect(),
        }
    }

    #[must_use]
    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn set_selected_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    #[must_use]
    pub fn panels(&self) -> &[LocationPanel] {
        &self.panels
    }

    #[must_use]
    pub fn panel(&self, location_id: &str) -> Option<&LocationPanel> {
        self.panels.iter().find(|p| p.location_id == location_id)
    }

    pub fn panel_mut(&mut self, location_id: &str) -> Option<&mut LocationPanel> {
        self.panels.iter_mut().find(|p| p.location_id == location_id)
    }
}
