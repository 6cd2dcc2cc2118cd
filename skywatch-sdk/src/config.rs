//! Persistable range and critical-set configuration.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use skywatch_types::{ParamRange, SchemaVersion};

use crate::WeatherError;

/// Persisted configuration for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamConfig {
    /// The safety range.
    pub range: ParamRange,

    /// Whether the parameter feeds the aggregate station state.
    #[serde(default)]
    pub critical: bool,
}

/// The monitor's persistable configuration: ranges, critical set, polling
/// period, and override flag.
///
/// The host owns the config store; this type only defines the schema and
/// the serialization. Written as JSON by
/// [`WeatherMonitor::save_config`](crate::WeatherMonitor::save_config) and
/// restored with
/// [`WeatherMonitor::apply_config`](crate::WeatherMonitor::apply_config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Schema version for forward compatibility.
    pub version: SchemaVersion,

    /// Polling period in seconds; zero disables timed polling.
    pub update_period_secs: f64,

    /// Whether the operator override was engaged.
    #[serde(default)]
    pub override_active: bool,

    /// Per-parameter configuration, keyed by name.
    pub parameters: BTreeMap<String, ParamConfig>,
}

impl WeatherConfig {
    /// Read a config from a JSON stream.
    ///
    /// Fails with [`WeatherError::IncompatibleConfig`] if the stored schema
    /// major version does not match this library's.
    pub fn from_reader(reader: impl Read) -> Result<Self, WeatherError> {
        let config: WeatherConfig = serde_json::from_reader(reader)?;
        if !config.version.is_compatible() {
            return Err(WeatherError::IncompatibleConfig {
                found: config.version,
                current: SchemaVersion::current(),
            });
        }
        Ok(config)
    }

    /// Write this config as pretty JSON.
    pub fn to_writer(&self, mut writer: impl Write) -> Result<(), WeatherError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeatherConfig {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "WEATHER_WIND_SPEED".to_string(),
            ParamConfig {
                range: ParamRange::new(0.0, 20.0, 0.25).unwrap(),
                critical: true,
            },
        );
        parameters.insert(
            "WEATHER_HUMIDITY".to_string(),
            ParamConfig {
                range: ParamRange::new(0.0, 85.0, 0.1).unwrap().flipped(),
                critical: false,
            },
        );
        WeatherConfig {
            version: SchemaVersion::current(),
            update_period_secs: 30.0,
            override_active: false,
            parameters,
        }
    }

    #[test]
    fn json_round_trip() {
        let config = sample();
        let mut buf = Vec::new();
        config.to_writer(&mut buf).unwrap();

        let back = WeatherConfig::from_reader(buf.as_slice()).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn incompatible_major_version_is_rejected() {
        let mut config = sample();
        config.version = SchemaVersion::new(99, 0);
        let mut buf = Vec::new();
        config.to_writer(&mut buf).unwrap();

        let err = WeatherConfig::from_reader(buf.as_slice()).unwrap_err();
        assert!(matches!(err, WeatherError::IncompatibleConfig { .. }));
    }

    #[test]
    fn newer_minor_version_is_accepted() {
        let mut config = sample();
        config.version = SchemaVersion::new(skywatch_types::SCHEMA_VERSION, 3);
        let mut buf = Vec::new();
        config.to_writer(&mut buf).unwrap();

        assert!(WeatherConfig::from_reader(buf.as_slice()).is_ok());
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = format!(
            r#"{{
                "version": {{"major": {}, "minor": 0}},
                "update_period_secs": 10.0,
                "parameters": {{
                    "WEATHER_RAIN_RATE": {{
                        "range": {{"min_ok": 0.0, "max_ok": 0.0, "warning_percent": 0.0}}
                    }}
                }}
            }}"#,
            skywatch_types::SCHEMA_VERSION
        );

        let config = WeatherConfig::from_reader(json.as_bytes()).unwrap();
        assert!(!config.override_active);
        let rain = &config.parameters["WEATHER_RAIN_RATE"];
        assert!(!rain.critical);
        assert!(!rain.range.flip_warning);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = WeatherConfig::from_reader("not json".as_bytes()).unwrap_err();
        assert!(matches!(err, WeatherError::Config(_)));
    }
}
