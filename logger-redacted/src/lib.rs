//! Logging for the hospital billing engine
//!
//! Installs the process-wide `tracing` subscriber and provides [`PiiRedactor`],
//! which scrubs PHI (dates of birth, record numbers, contact details) from
//! clinician-entered free text before it is attached to a log event.
//!
//! ```rust,no_run
//! use logger_redacted::{init_tracing, LoggerConfig};
//!
//! init_tracing(&LoggerConfig::default(), false).expect("tracing");
//! tracing::info!(admission_id = 7, "Bill generated");
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Tracing subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &LoggerConfig, verbose: bool) -> Result<(), LoggerError> {
    let level = if verbose {
        Level::DEBUG.to_string()
    } else {
        config.log_level.clone()
    };

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("{},sqlx=warn", level))
            .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_level(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init(),
    };

    result.map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}
