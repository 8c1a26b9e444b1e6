//! Configuration module for B3 propagation
//!
//! Handles loading and parsing of YAML configuration files with support for
//! environment variable expansion and validation. Expansion runs once over
//! the whole file in [`ConfigLoader`]; values substituted in are not expanded
//! again.
//!
//! # Example
//!
//! ```yaml
//! propagation:
//!   baggage_prefix: "${BAGGAGE_PREFIX:-baggage-}"
//!   baggage_layout: "prefix"
//! logging:
//!   level: "info"
//!   format: "json"
//! ```

use crate::propagation::DEFAULT_BAGGAGE_PREFIX;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand environment variables in a string.
///
/// Supports two syntaxes:
/// - `${VAR_NAME}` - Simple expansion, keeps placeholder if var not found
/// - `${VAR_NAME:-default}` - Expansion with default value
///
/// Variable names must start with an uppercase letter or underscore and
/// contain only uppercase letters, digits, and underscores.
pub(crate) fn expand_env_vars(s: &str) -> String {
    let re = env_var_pattern();
    let mut last_match = 0;
    let mut result = String::with_capacity(s.len());

    for cap in re.captures_iter(s) {
        let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        result.push_str(&s[last_match..full_match.start()]);

        let value = match std::env::var(var_name.as_str()) {
            Ok(val) => val,
            Err(_) => match cap.get(2) {
                Some(default) => default.as_str().to_string(),
                // No env var and no default. Keep the original placeholder.
                None => full_match.as_str().to_string(),
            },
        };
        result.push_str(&value);

        last_match = full_match.end();
    }

    result.push_str(&s[last_match..]);
    result
}

fn env_var_pattern() -> &'static regex_lite::Regex {
    static PATTERN: std::sync::OnceLock<regex_lite::Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]+))?\}")
            .expect("env var pattern is valid")
    })
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub propagation: PropagatorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        ConfigLoader::load(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.propagation.validate()?;
        self.logging.validate()
    }
}

// ============================================================================
// Propagator Configuration
// ============================================================================

/// How injected baggage keys combine the prefix and the item name.
///
/// Extraction always matches `prefix + name`, whatever the layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaggageKeyLayout {
    /// `prefix + name`, re-extractable by the same propagator
    #[default]
    Prefix,
    /// `name + prefix`, matching peers deployed before the layout was fixed.
    /// Output is not recognised by this crate's own extraction.
    LegacySuffix,
}

/// B3 propagator configuration.
///
/// # Example
///
/// ```
/// use b3_propagation::config::{BaggageKeyLayout, PropagatorConfig};
/// use b3_propagation::propagation::B3Propagator;
///
/// let config = PropagatorConfig::default()
///     .with_baggage_prefix("ot-baggage-")
///     .with_baggage_layout(BaggageKeyLayout::Prefix);
///
/// let propagator = B3Propagator::new(config);
/// assert_eq!(propagator.baggage_prefix(), "ot-baggage-");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagatorConfig {
    /// Prefix marking baggage keys in a carrier. Matched case-sensitively,
    /// except on carriers that fold key case such as `HeaderMap`.
    /// Default: "baggage-"
    #[serde(default = "default_baggage_prefix")]
    pub baggage_prefix: String,

    /// Injected baggage key layout. Default: "prefix"
    #[serde(default)]
    pub baggage_layout: BaggageKeyLayout,
}

impl PropagatorConfig {
    /// Set the baggage key prefix
    pub fn with_baggage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.baggage_prefix = prefix.into();
        self
    }

    /// Set the injected baggage key layout
    pub fn with_baggage_layout(mut self, layout: BaggageKeyLayout) -> Self {
        self.baggage_layout = layout;
        self
    }

    /// Validate the propagator configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baggage_prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "Baggage prefix cannot be empty".into(),
            ));
        }

        if self
            .baggage_prefix
            .chars()
            .any(|c| c.is_whitespace() || c == ':')
        {
            return Err(ConfigError::ValidationError(format!(
                "Invalid baggage prefix '{}': must not contain whitespace or ':'",
                self.baggage_prefix
            )));
        }

        Ok(())
    }
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            baggage_prefix: default_baggage_prefix(),
            baggage_layout: BaggageKeyLayout::default(),
        }
    }
}

fn default_baggage_prefix() -> String {
    DEFAULT_BAGGAGE_PREFIX.to_string()
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log output configuration.
///
/// `RUST_LOG` takes precedence over `level` when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level: trace, debug, info, warn, error. Default: "info"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "text" or "json". Default: "text"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl LoggingConfig {
    /// Validate the logging configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level '{}': must be 'trace', 'debug', 'info', 'warn', or 'error'",
                    self.level
                )))
            }
        }

        match self.format.as_str() {
            "text" | "json" => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "Invalid log format '{}': must be 'text' or 'json'",
                self.format
            ))),
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

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.propagation.baggage_prefix, "baggage-");
        assert_eq!(config.propagation.baggage_layout, BaggageKeyLayout::Prefix);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_baggage_prefix_rejected() {
        let config = PropagatorConfig::default().with_baggage_prefix("");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_baggage_prefix_with_whitespace_rejected() {
        let config = PropagatorConfig::default().with_baggage_prefix("bag gage-");
        assert!(config.validate().is_err());

        let config = PropagatorConfig::default().with_baggage_prefix("baggage:");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_logging_rejected() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = LoggingConfig {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_layout_from_yaml() {
        let config: PropagatorConfig =
            serde_yaml::from_str("baggage_layout: legacy_suffix").unwrap();
        assert_eq!(config.baggage_layout, BaggageKeyLayout::LegacySuffix);
        assert_eq!(config.baggage_prefix, "baggage-");
    }

    #[test]
    fn test_expand_env_vars_default_value() {
        let expanded = expand_env_vars("${B3_PROPAGATION_SURELY_UNSET_VAR:-fallback-}");
        assert_eq!(expanded, "fallback-");

        let expanded = expand_env_vars("${B3_PROPAGATION_SURELY_UNSET_VAR}");
        assert_eq!(expanded, "${B3_PROPAGATION_SURELY_UNSET_VAR}");
    }
}
