//! Error types and handling for `windcast`

use thiserror::Error;

/// Main error type for the `windcast` library
#[derive(Error, Debug)]
pub enum WindcastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network failures and non-success HTTP statuses
    #[error("API error: {message}")]
    Api { message: String },

    /// Response body that could not be decoded into an hourly series
    #[error("Malformed payload: {message}")]
    Payload { message: String },

    /// The hourly series holds no samples at all
    #[error("No hourly data for {location_id}")]
    NoData { location_id: String },

    /// The selected hour exists but carries no wind speed
    #[error("Missing wind sample at index {index} for {location_id}")]
    MissingSample { location_id: String, index: usize },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WindcastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new payload error
    pub fn payload<S: Into<String>>(message: S) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }

    pub fn no_data<S: Into<String>>(location_id: S) -> Self {
        Self::NoData {
            location_id: location_id.into(),
        }
    }

    pub fn missing_sample<S: Into<String>>(location_id: S, index: usize) -> Self {
        Self::MissingSample {
            location_id: location_id.into(),
            index,
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WindcastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            WindcastError::Api { .. } => {
                "Unable to reach the forecast service. Please check your internet connection."
                    .to_string()
            }
            WindcastError::Payload { .. } | WindcastError::NoData { .. } => {
                "Hourly wind data not found for the selected date.".to_string()
            }
            WindcastError::MissingSample { .. } => {
                "Wind data unavailable for the selected hour.".to_string()
            }
            WindcastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WindcastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for WindcastError {
    fn from(err: reqwest::Error) -> Self {
        Self::api(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for WindcastError {
    fn from(err: reqwest_middleware::Error) -> Self {
        Self::api(err.to_string())
    }
}
