//! Tracing subscriber setup
//!
//! Installs a registry combining:
//! - **EnvFilter**: Controls log levels via `RUST_LOG`, falling back to the
//!   configured level
//! - **Fmt layer**: Text or JSON output on stdout
//!
//! ```text
//! Registry
//!   ├── EnvFilter (RUST_LOG or config level)
//!   └── Fmt Layer (text | json)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use b3_propagation::config::LoggingConfig;
//! use b3_propagation::logging::init_subscriber;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LoggingConfig {
//!     level: "debug".to_string(),
//!     format: "json".to_string(),
//! };
//!
//! init_subscriber(&config)?;
//! # Ok(())
//! # }
//! ```

use crate::config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Errors that can occur during subscriber installation
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),

    #[error("Global subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Build the level filter, preferring `RUST_LOG` over the configured level
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(config.level.to_lowercase())
            .map_err(|_| LoggingError::InvalidFilter(config.level.clone())),
    }
}

/// Install the global tracing subscriber
///
/// # Returns
///
/// * `Ok(())` - Subscriber is active
/// * `Err(LoggingError)` - If the filter is invalid or a global subscriber
///   is already set
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = env_filter(config)?;

    if config.format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true);

        let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true);

        let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;
    }

    tracing::debug!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_from_config() {
        let config = LoggingConfig::default();
        assert!(env_filter(&config).is_ok());
    }
}
