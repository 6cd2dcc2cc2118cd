//! # skywatch-adapters
//!
//! Ready-made measurement sources for skywatch weather monitoring.
//!
//! This crate provides [`WeatherSource`](skywatch_sdk::WeatherSource)
//! implementations a driver can plug into a
//! [`WeatherMonitor`](skywatch_sdk::WeatherMonitor) instead of writing its
//! own hardware hook.
//!
//! ## Supported Sources
//!
//! - **Simulated** (`simulated` feature, default) - deterministic synthetic
//!   weather for development, demos, and safety-logic testing
//! - **Open-Meteo** (`open-meteo` feature) - current conditions from the
//!   free Open-Meteo forecast API
//!
//! ## Quick Start (simulated)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use skywatch_adapters::simulated::SimulatedStation;
//! use skywatch_sdk::WeatherMonitor;
//! use skywatch_types::ParamRange;
//!
//! #[tokio::main]
//! async fn main() {
//!     let monitor = WeatherMonitor::new();
//!     monitor
//!         .add_parameter("WEATHER_WIND_SPEED", "Wind (m/s)",
//!             ParamRange::new(0.0, 20.0, 0.25).unwrap())
//!         .unwrap();
//!
//!     let station = SimulatedStation::builder()
//!         .channel("WEATHER_WIND_SPEED", 10.0, 15.0, 60)
//!         .build();
//!
//!     let poll = monitor.start(Arc::new(station));
//!     // ...
//!     poll.stop();
//! }
//! ```

pub mod error;

#[cfg(feature = "simulated")]
pub mod simulated;

#[cfg(feature = "open-meteo")]
pub mod open_meteo;

pub use error::AdapterError;

// Re-export types for convenience
pub use skywatch_types::{ParamRange, ParamState, UpdateStatus, WeatherSnapshot};
