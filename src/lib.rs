//! `windcast` - hourly wind quality forecasts for surf and kitesurf spots
//!
//! This library fetches hourly wind forecasts for a fixed table of
//! locations, scores each hour against the bearing that works best at the
//! spot, and renders a summary of the selected hour plus a full-day chart.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod date_window;
pub mod error;
pub mod forecast_selector;
pub mod logging;
pub mod models;
pub mod presenter;
pub mod refresh;
pub mod report;
pub mod wind_analysis;

// Re-export core types for public API
pub use api::{ForecastClient, OpenMeteoClient};
pub use config::WindcastConfig;
pub use dashboard::{ChartSlot, Dashboard, LocationPanel, PanelState};
pub use date_window::DateWindow;
pub use error::WindcastError;
pub use forecast_selector::select_hour;
pub use models::{HourlySample, HourlySeries, Location};
pub use presenter::{JsonPresenter, Presenter, TextPresenter};
pub use refresh::{RefreshLoop, RefreshSummary, refresh_all};
pub use report::{ChartPoint, CurrentConditions, LocationReport, QualityChart};
pub use wind_analysis::{Cardinal, wind_score};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WindcastError>;
