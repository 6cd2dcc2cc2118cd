//! Station handle for pushing raw measurements.

use std::sync::Arc;

use crate::state::ParamStore;

/// A handle for pushing raw parameter values into the store.
///
/// This is the interface a [`WeatherSource`](crate::WeatherSource) receives
/// during an update cycle. It deliberately exposes only raw-value writes:
/// classification, property state, and client notification are handled by
/// the monitor, never by the measurement code.
///
/// # Example
///
/// ```rust
/// use skywatch_sdk::WeatherMonitor;
/// use skywatch_types::ParamRange;
///
/// let monitor = WeatherMonitor::new();
/// monitor
///     .add_parameter("WEATHER_WIND_SPEED", "Wind (m/s)", ParamRange::new(0.0, 20.0, 0.25).unwrap())
///     .unwrap();
///
/// let station = monitor.handle();
/// assert!(station.set_value("WEATHER_WIND_SPEED", 7.5));
/// assert!(!station.set_value("WEATHER_RAIN_RATE", 0.0));
/// ```
#[derive(Clone)]
pub struct StationHandle {
    pub(crate) store: Arc<ParamStore>,
    pub(crate) device: Option<String>,
}

impl StationHandle {
    /// Overwrite the raw value of a registered parameter.
    ///
    /// Returns false if the name is unknown; the store is left untouched.
    pub fn set_value(&self, name: &str, value: f64) -> bool {
        self.store.set_value(name, value)
    }

    /// Names of all registered parameters.
    pub fn parameter_names(&self) -> Vec<String> {
        self.store.names()
    }

    /// Whether a parameter is registered.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    /// The current raw value of a parameter.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.store.value_of(name)
    }

    /// The device name the owning monitor answers to, if one is set.
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }
}

impl std::fmt::Debug for StationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationHandle")
            .field("device", &self.device)
            .field("parameters", &self.store.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skywatch_types::ParamRange;

    fn handle() -> StationHandle {
        let store = Arc::new(ParamStore::default());
        store
            .add_parameter(
                "WEATHER_TEMPERATURE",
                "Temperature (C)",
                ParamRange::new(-15.0, 35.0, 0.2).unwrap(),
            )
            .unwrap();
        StationHandle {
            store,
            device: Some("Observatory".to_string()),
        }
    }

    #[test]
    fn set_value_round_trips() {
        let h = handle();
        assert!(h.set_value("WEATHER_TEMPERATURE", 21.5));
        assert_eq!(h.value("WEATHER_TEMPERATURE"), Some(21.5));
    }

    #[test]
    fn unknown_parameter_is_reported() {
        let h = handle();
        assert!(!h.set_value("WEATHER_PRESSURE", 1013.0));
        assert!(!h.has_parameter("WEATHER_PRESSURE"));
        assert!(h.value("WEATHER_PRESSURE").is_none());
    }

    #[test]
    fn clones_share_the_store() {
        let h = handle();
        let other = h.clone();
        h.set_value("WEATHER_TEMPERATURE", -3.0);
        assert_eq!(other.value("WEATHER_TEMPERATURE"), Some(-3.0));
    }

    #[test]
    fn debug_lists_device_not_contents() {
        let h = handle();
        let s = format!("{h:?}");
        assert!(s.contains("Observatory"));
        assert!(!s.contains("WEATHER_TEMPERATURE"));
    }
}
