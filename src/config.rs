//! Configuration management for `windcast`
//!
//! Handles loading configuration from files and environment variables, and
//! validates every setting before the location table is handed to the
//! refresh pipeline.

use crate::WindcastError;
use crate::models::{Location, default_locations};
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindcastConfig {
    /// Forecast API settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Periodic refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Date selection settings
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Monitored spots, built once at startup
    #[serde(default = "default_locations")]
    pub locations: Vec<Location>,
}

/// Forecast API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
    /// IANA timezone the hourly timestamps are expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between automatic refreshes in watch mode
    #[serde(default = "default_refresh_interval")]
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Last selectable day, counted from today
    #[serde(default = "default_max_days_ahead")]
    pub max_days_ahead: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_weather_max_retries() -> u32 {
    3
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

fn default_refresh_interval() -> u64 {
    900
}

fn default_max_days_ahead() -> u32 {
    6
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            max_retries: default_weather_max_retries(),
            timezone: default_timezone(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_refresh_interval(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            max_days_ahead: default_max_days_ahead(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for WindcastConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            refresh: RefreshConfig::default(),
            forecast: ForecastConfig::default(),
            logging: LoggingConfig::default(),
            locations: default_locations(),
        }
    }
}

impl WindcastConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("windcast.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WINDCAST_WEATHER__TIMEZONE=Europe/Lisbon overrides weather.timezone
        builder = builder.add_source(
            Environment::with_prefix("WINDCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WindcastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("windcast").join("config.toml"))
    }

    /// Apply default values to empty or zeroed fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.timezone.is_empty() {
            self.weather.timezone = default_timezone();
        }
        if self.refresh.interval_seconds == 0 {
            self.refresh.interval_seconds = default_refresh_interval();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.locations.is_empty() {
            self.locations = default_locations();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_locations()?;
        Ok(())
    }

    /// Parsed forecast timezone
    pub fn timezone(&self) -> Result<Tz> {
        self.weather.timezone.parse::<Tz>().map_err(|_| {
            anyhow::Error::from(WindcastError::config(format!(
                "Unknown timezone '{}'",
                self.weather.timezone
            )))
        })
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                WindcastError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.weather.max_retries > 10 {
            return Err(WindcastError::config("Weather API max retries cannot exceed 10").into());
        }

        if !(60..=86_400).contains(&self.refresh.interval_seconds) {
            return Err(WindcastError::config(
                "Refresh interval must be between 60 and 86400 seconds",
            )
            .into());
        }

        if self.forecast.max_days_ahead > 15 {
            return Err(WindcastError::config(
                "Forecast window cannot exceed 15 days ahead",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WindcastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WindcastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(WindcastError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        self.timezone()?;

        Ok(())
    }

    fn validate_locations(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for location in &self.locations {
            if location.id.trim().is_empty() {
                return Err(WindcastError::config("Location id cannot be empty").into());
            }
            if !seen.insert(location.id.as_str()) {
                return Err(WindcastError::config(format!(
                    "Duplicate location id '{}'",
                    location.id
                ))
                .into());
            }
            if !(-90.0..=90.0).contains(&location.latitude)
                || !(-180.0..=180.0).contains(&location.longitude)
            {
                return Err(WindcastError::config(format!(
                    "Coordinates out of range for '{}': {}",
                    location.id,
                    location.format_coordinates()
                ))
                .into());
            }
            if !(0.0..360.0).contains(&location.desired_bearing) {
                return Err(WindcastError::config(format!(
                    "Desired bearing for '{}' must be in [0, 360), got {}",
                    location.id, location.desired_bearing
                ))
                .into());
            }
        }
        Ok(())
    }
}
