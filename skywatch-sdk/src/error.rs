//! Error types for the monitor.

use skywatch_types::{RangeError, SchemaVersion};
use thiserror::Error;

/// Errors reported by the weather monitor.
///
/// Expected runtime conditions (unknown parameter names, alert states) are
/// plain return values, not errors; this enum covers misconfiguration and
/// persistence failures only.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// A parameter with this name is already registered.
    #[error("parameter {0:?} is already registered")]
    DuplicateParameter(String),

    /// The range bounds are unusable.
    #[error(transparent)]
    InvalidRange(#[from] RangeError),

    /// A loaded config was written by an incompatible schema.
    #[error("config schema version {}.{} is incompatible with version {}", found.major, found.minor, current.major)]
    IncompatibleConfig {
        /// Version found in the config.
        found: SchemaVersion,
        /// Version this library writes.
        current: SchemaVersion,
    },

    /// Config (de)serialization failed.
    #[error("config serialization failed: {0}")]
    Config(#[from] serde_json::Error),

    /// Reading or writing a config stream failed.
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = WeatherError::DuplicateParameter("WEATHER_WIND_SPEED".into());
        assert_eq!(
            err.to_string(),
            "parameter \"WEATHER_WIND_SPEED\" is already registered"
        );

        let err = WeatherError::IncompatibleConfig {
            found: SchemaVersion::new(9, 2),
            current: SchemaVersion::current(),
        };
        assert!(err.to_string().contains("9.2"));
    }

    #[test]
    fn range_error_converts() {
        let range_err = skywatch_types::ParamRange::new(5.0, 1.0, 0.1).unwrap_err();
        let err: WeatherError = range_err.into();
        assert!(matches!(err, WeatherError::InvalidRange(_)));
    }
}
