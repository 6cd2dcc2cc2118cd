//! # skywatch-types
//!
//! Core types for weather-safety monitoring. This crate defines the universal
//! schema a device driver uses to report weather measurements, classify them
//! against configured safety ranges, and surface an overall station state to
//! monitoring hosts.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable `serde` and/or `minicbor` features as needed
//! - **Driver agnostic**: Works for standalone weather stations or weather-capable
//!   auxiliary devices (power boxes, roof controllers, custom hardware)
//! - **Versioned schema**: Snapshots include version info for forward compatibility
//! - **Ergonomic builders**: Fluent API for constructing snapshots
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON/MessagePack/etc. serialization via serde
//! - `minicbor`: Compact binary serialization via CBOR
//! - `all`: Enable all serialization formats
//!
//! ## Example
//!
//! ```rust
//! use skywatch_types::{ParamRange, ParamState, WeatherSnapshot, UpdateStatus};
//!
//! // A wind-speed range: 0-20 m/s is safe, 25% of the band forms the warning zone.
//! let range = ParamRange::new(0.0, 20.0, 0.25).unwrap();
//! assert_eq!(range.classify(10.0), ParamState::Ok);
//! assert_eq!(range.classify(22.0), ParamState::Warning);
//! assert_eq!(range.classify(30.0), ParamState::Alert);
//!
//! // Build a snapshot using the builder pattern
//! let snapshot = WeatherSnapshot::builder()
//!     .status(UpdateStatus::Ok)
//!     .parameter("WEATHER_WIND_SPEED", |p| {
//!         p.value(12.5).state(ParamState::Ok).critical(true)
//!     })
//!     .parameter("WEATHER_HUMIDITY", |p| p.value(61.0).state(ParamState::Ok))
//!     .build();
//!
//! assert_eq!(snapshot.parameters.len(), 2);
//! ```
//!
//! ## Schema Version
//!
//! The current schema version is **1**. The version is included in serialized
//! snapshots and configs to allow consumers to handle format evolution
//! gracefully.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod range;
mod reading;
mod snapshot;
mod state;

pub use range::*;
pub use reading::*;
pub use snapshot::*;
pub use state::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the snapshot or config
/// format. Consumers should check this version and handle older formats
/// appropriately.
pub const SCHEMA_VERSION: u32 = 1;
