//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Effective filter directive: `-v` is debug, `-vv` and up is trace
#[must_use]
pub fn level_for(config: &LoggingConfig, verbosity: u8) -> String {
    match verbosity {
        0 => config.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level; output goes to stderr so rendered forecasts stay alone on stdout.
pub fn init(config: &LoggingConfig, verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(config, verbosity)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {e}");
    }
}
