//! Data models for windcast
//!
//! - Location: a monitored spot and its ideal wind bearing
//! - Forecast: hourly wind samples for one date at one location

pub mod forecast;
pub mod location;

// Re-export all public types for convenient access
pub use forecast::{HourlySample, HourlySeries};
pub use location::{Location, default_locations};
