//! Logging Setup
//!
//! The engine only emits `tracing` events; installing a subscriber is left
//! to the host. [`init_logging`] is a convenience for hosts that have none.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives, overriding `LoggingConfig::level`
//!
//! # Usage
//!
//! ```rust,ignore
//! use options_engine::{config::LoggingConfig, telemetry::init_logging};
//!
//! init_logging(&LoggingConfig::default())?;
//! ```

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::{LogFormat, LoggingConfig};

/// Errors from subscriber installation.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("Invalid log level '{level}': {message}")]
    InvalidLevel {
        /// Level that was configured.
        level: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("Failed to install log subscriber: {0}")]
    AlreadyInitialized(String),
}

fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| TelemetryError::InvalidLevel {
        level: config.level.clone(),
        message: e.to_string(),
    })
}

/// Install a global `tracing` subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidLevel`] for an unparsable level and
/// [`TelemetryError::AlreadyInitialized`] when a global subscriber exists.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder.json().with_current_span(config.include_spans).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}
