//! Open-Meteo adapter using the public forecast HTTP API.
//!
//! This adapter fetches current weather conditions from Open-Meteo
//! (<https://open-meteo.com>) and maps the reported fields onto registered
//! weather parameters. No API key is required for non-commercial use.
//!
//! ## Fields
//!
//! Any `current` field of the forecast endpoint can be bound, for example:
//!
//! - `temperature_2m` - air temperature (C)
//! - `relative_humidity_2m` - relative humidity (%)
//! - `wind_speed_10m` / `wind_gusts_10m` - wind (m/s, see `wind_speed_unit`)
//! - `precipitation` - precipitation (mm)
//! - `cloud_cover` - cloud cover (%)
//!
//! ## Example
//!
//! ```rust,no_run
//! use skywatch_adapters::open_meteo::OpenMeteoSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = OpenMeteoSource::builder()
//!         .coordinates(28.3, -16.5) // Teide observatory
//!         .bind("WEATHER_TEMPERATURE", "temperature_2m")
//!         .bind("WEATHER_WIND_SPEED", "wind_speed_10m")
//!         .bind("WEATHER_HUMIDITY", "relative_humidity_2m")
//!         .build();
//!
//!     let current = source.fetch_current().await?;
//!     println!("temperature: {:?}", current.get("temperature_2m"));
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use skywatch_sdk::{StationHandle, WeatherSource};
use skywatch_types::UpdateStatus;

use crate::AdapterError;

const DEFAULT_ENDPOINT: &str = "https://api.open-meteo.com";

/// Open-Meteo measurement source.
///
/// Fetches the bound fields once per update cycle and pushes them into the
/// station. A transport or parse failure reports [`UpdateStatus::Alert`] and
/// leaves the previously stored values in place.
#[derive(Debug, Clone)]
pub struct OpenMeteoSource {
    client: Client,
    endpoint: String,
    latitude: f64,
    longitude: f64,
    /// parameter name -> Open-Meteo field
    bindings: Vec<(String, String)>,
}

impl OpenMeteoSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> OpenMeteoSourceBuilder {
        OpenMeteoSourceBuilder::default()
    }

    /// Fetch the current values for every bound field, keyed by field name.
    pub async fn fetch_current(&self) -> Result<BTreeMap<String, f64>, AdapterError> {
        let fields: Vec<&str> = self.bindings.iter().map(|(_, f)| f.as_str()).collect();
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current={}&wind_speed_unit=ms",
            self.endpoint,
            self.latitude,
            self.longitude,
            fields.join(",")
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;
        parse_current(&body, &fields)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoSource {
    async fn update_weather(&self, station: &StationHandle) -> UpdateStatus {
        let current = match self.fetch_current().await {
            Ok(current) => current,
            Err(_) => return UpdateStatus::Alert,
        };

        for (param, field) in &self.bindings {
            if let Some(value) = current.get(field) {
                let _ = station.set_value(param, *value);
            }
        }
        UpdateStatus::Ok
    }
}

/// Extract the requested fields from a forecast response body.
fn parse_current(body: &str, fields: &[&str]) -> Result<BTreeMap<String, f64>, AdapterError> {
    #[derive(Deserialize)]
    struct ForecastResponse {
        current: BTreeMap<String, serde_json::Value>,
    }

    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| AdapterError::Parse(e.to_string()))?;

    let mut current = BTreeMap::new();
    for field in fields {
        let value = response
            .current
            .get(*field)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| AdapterError::MissingField(field.to_string()))?;
        current.insert(field.to_string(), value);
    }
    Ok(current)
}

/// Builder for configuring an [`OpenMeteoSource`].
#[derive(Debug)]
pub struct OpenMeteoSourceBuilder {
    endpoint: String,
    latitude: f64,
    longitude: f64,
    bindings: Vec<(String, String)>,
}

impl Default for OpenMeteoSourceBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            bindings: Vec::new(),
        }
    }
}

impl OpenMeteoSourceBuilder {
    /// Set the site coordinates in decimal degrees.
    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Override the API endpoint (for self-hosted instances or tests).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Bind a weather parameter to an Open-Meteo `current` field.
    pub fn bind(mut self, parameter: impl Into<String>, field: impl Into<String>) -> Self {
        self.bindings.push((parameter.into(), field.into()));
        self
    }

    /// Build the source.
    pub fn build(self) -> OpenMeteoSource {
        OpenMeteoSource {
            client: Client::new(),
            endpoint: self.endpoint,
            latitude: self.latitude,
            longitude: self.longitude,
            bindings: self.bindings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "latitude": 28.3,
        "longitude": -16.5,
        "current": {
            "time": "2025-11-04T18:00",
            "interval": 900,
            "temperature_2m": 13.4,
            "wind_speed_10m": 6.8,
            "relative_humidity_2m": 41
        }
    }"#;

    #[test]
    fn parse_extracts_requested_fields() {
        let current =
            parse_current(SAMPLE, &["temperature_2m", "wind_speed_10m"]).unwrap();
        assert_eq!(current["temperature_2m"], 13.4);
        assert_eq!(current["wind_speed_10m"], 6.8);
        assert!(!current.contains_key("relative_humidity_2m"));
    }

    #[test]
    fn integer_fields_parse_as_f64() {
        let current = parse_current(SAMPLE, &["relative_humidity_2m"]).unwrap();
        assert_eq!(current["relative_humidity_2m"], 41.0);
    }

    #[test]
    fn missing_field_is_reported() {
        let err = parse_current(SAMPLE, &["snowfall"]).unwrap_err();
        assert!(matches!(err, AdapterError::MissingField(f) if f == "snowfall"));
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = parse_current("<html>offline</html>", &["temperature_2m"]).unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
    }

    #[test]
    fn builder_collects_bindings() {
        let source = OpenMeteoSource::builder()
            .coordinates(28.3, -16.5)
            .bind("WEATHER_TEMPERATURE", "temperature_2m")
            .bind("WEATHER_WIND_SPEED", "wind_speed_10m")
            .build();

        assert_eq!(source.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(source.bindings.len(), 2);
        assert_eq!(source.latitude, 28.3);
    }
}
