//! # skywatch-sdk
//!
//! Embeddable weather-safety monitoring for device drivers.
//!
//! This crate provides the monitoring half of a weather-capable driver: it
//! stores named parameters with configured safety ranges, classifies live
//! values into Ok/Warning/Alert zones, aggregates the critical parameters
//! into a device-wide state, and polls a driver-supplied measurement source
//! on a reconfigurable period. It can back a standalone weather station or
//! add weather awareness to any other device.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use skywatch_sdk::{Notifier, StationHandle, WeatherMonitor, WeatherSource};
//! use skywatch_types::{ParamRange, UpdateStatus};
//!
//! struct MastSensors;
//!
//! #[async_trait]
//! impl WeatherSource for MastSensors {
//!     async fn update_weather(&self, station: &StationHandle) -> UpdateStatus {
//!         // read hardware, push raw values only
//!         station.set_value("WEATHER_WIND_SPEED", 7.1);
//!         station.set_value("WEATHER_TEMPERATURE", 12.4);
//!         UpdateStatus::Ok
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (notifier, mut events) = Notifier::channel(16);
//!     let monitor = WeatherMonitor::builder()
//!         .update_period(Duration::from_secs(30))
//!         .notifier(notifier)
//!         .build();
//!
//!     monitor
//!         .add_parameter("WEATHER_WIND_SPEED", "Wind (m/s)",
//!             ParamRange::new(0.0, 20.0, 0.25).unwrap())
//!         .unwrap();
//!     monitor
//!         .add_parameter("WEATHER_TEMPERATURE", "Temperature (C)",
//!             ParamRange::new(-15.0, 35.0, 0.2).unwrap())
//!         .unwrap();
//!     monitor.set_critical_parameter("WEATHER_WIND_SPEED");
//!
//!     let poll = monitor.start(Arc::new(MastSensors));
//!
//!     while let Some(event) = events.recv().await {
//!         println!("weather: {event:?}");
//!     }
//!
//!     poll.stop();
//! }
//! ```
//!
//! ## Features
//!
//! - **Three-zone classification**: Ok band, warning margin, alert beyond -
//!   with an optional flipped mode that warns *inside* the safe band
//! - **Critical-set aggregation**: only flagged parameters drive the
//!   device-wide state
//! - **Reconfigurable polling**: period changes apply to the running loop,
//!   zero disables it, manual refresh always works
//! - **Host property bridge**: in-memory property containers plus
//!   `process_number`/`process_switch` for client-initiated writes
//! - **Config persistence**: serializable range/critical-set schema

mod config;
mod error;
mod events;
mod handle;
mod monitor;
mod notify;
mod properties;
mod source;
mod state;

pub use config::{ParamConfig, WeatherConfig};
pub use error::WeatherError;
pub use events::WeatherEvent;
pub use handle::StationHandle;
pub use monitor::{WeatherMonitor, WeatherMonitorBuilder};
pub use notify::Notifier;
pub use properties::{
    range_item, LightItem, LightVector, NumberItem, NumberVector, SwitchItem, SwitchVector,
    WeatherProperties, OVERRIDE_PROP, PARAMETERS_PROP, REFRESH_PROP, STATUS_PROP, UPDATE_PROP,
};
pub use source::WeatherSource;
pub use state::{ParamStore, SyncOutcome};

#[cfg(feature = "tokio")]
pub use monitor::PollHandle;

// Re-export types for convenience
pub use skywatch_types::{
    ParamRange, ParamReading, ParamState, RangeError, SchemaVersion, UpdateStatus, WeatherSnapshot,
};
