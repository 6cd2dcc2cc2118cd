//! Snapshot - a point-in-time view of station state.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::{ParamReading, ParamReadingBuilder, ParamState, UpdateStatus, SCHEMA_VERSION};

/// Schema version information embedded in snapshots and configs.
///
/// This allows consumers to detect and handle format changes gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct SchemaVersion {
    /// Major version - breaking changes increment this.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub major: u32,

    /// Minor version - backwards-compatible additions increment this.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub minor: u32,
}

impl SchemaVersion {
    /// Create a new schema version.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The current schema version used by this library.
    pub const fn current() -> Self {
        Self {
            major: SCHEMA_VERSION,
            minor: 0,
        }
    }

    /// Check if this version is compatible with the current library version.
    ///
    /// Returns true if the major version matches (minor differences are OK).
    pub fn is_compatible(&self) -> bool {
        self.major == SCHEMA_VERSION
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::current()
    }
}

/// A point-in-time snapshot of a weather station's state.
///
/// This is the top-level type a weather-capable driver emits each polling
/// cycle: every registered parameter with its current value and
/// classification, the readiness reported by the measurement source, and the
/// aggregate severity over the critical parameters.
///
/// # Example
///
/// ```rust
/// use skywatch_types::{ParamState, UpdateStatus, WeatherSnapshot};
///
/// let snapshot = WeatherSnapshot::builder()
///     .status(UpdateStatus::Ok)
///     .state(ParamState::Warning)
///     .parameter("WEATHER_WIND_GUST", |p| {
///         p.value(22.0).state(ParamState::Warning).critical(true)
///     })
///     .build();
///
/// assert!(snapshot.state.is_unsafe());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct WeatherSnapshot {
    /// Schema version for forward compatibility.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub version: SchemaVersion,

    /// Unix timestamp in milliseconds when this snapshot was taken.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub timestamp_ms: u64,

    /// Readiness reported by the measurement source for this cycle.
    #[cfg_attr(feature = "minicbor", n(2))]
    pub status: UpdateStatus,

    /// Aggregate severity over the critical parameters.
    #[cfg_attr(feature = "minicbor", n(3))]
    pub state: ParamState,

    /// Whether the operator override was engaged when this snapshot was
    /// taken. The `state` field still carries the true classification.
    #[cfg_attr(feature = "minicbor", n(4))]
    pub override_active: bool,

    /// All registered parameters, keyed by name.
    #[cfg_attr(feature = "minicbor", n(5))]
    pub parameters: BTreeMap<String, ParamReading>,
}

impl WeatherSnapshot {
    /// Create an empty snapshot with the current timestamp.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_timestamp(current_timestamp_ms())
    }

    /// Create an empty snapshot with a specific timestamp.
    pub fn with_timestamp(timestamp_ms: u64) -> Self {
        Self {
            version: SchemaVersion::current(),
            timestamp_ms,
            status: UpdateStatus::Ok,
            state: ParamState::Unknown,
            override_active: false,
            parameters: BTreeMap::new(),
        }
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> WeatherSnapshotBuilder {
        WeatherSnapshotBuilder::new()
    }

    /// Check if the snapshot has no parameters.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Number of parameters in the snapshot.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Get the reading for a specific parameter.
    pub fn get(&self, name: &str) -> Option<&ParamReading> {
        self.parameters.get(name)
    }

    /// Iterate over all parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamReading)> {
        self.parameters.iter()
    }

    /// Iterate over the critical parameters only.
    pub fn critical(&self) -> impl Iterator<Item = (&String, &ParamReading)> {
        self.parameters.iter().filter(|(_, r)| r.critical)
    }

    /// Recompute the aggregate severity from the critical readings.
    ///
    /// This is the same computation the evaluator performs; it is exposed so
    /// consumers can verify a received snapshot.
    pub fn aggregate_of_critical(&self) -> ParamState {
        ParamState::most_severe(self.critical().map(|(_, r)| r.state))
    }

    /// The state a host's safety logic should act on: `Ok` while the
    /// operator override is engaged, the true aggregate otherwise.
    pub fn effective_state(&self) -> ParamState {
        if self.override_active {
            ParamState::Ok
        } else {
            self.state
        }
    }
}

#[cfg(feature = "std")]
impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing `WeatherSnapshot` instances.
#[derive(Debug)]
pub struct WeatherSnapshotBuilder {
    timestamp_ms: Option<u64>,
    status: UpdateStatus,
    state: Option<ParamState>,
    override_active: bool,
    parameters: BTreeMap<String, ParamReading>,
}

impl WeatherSnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            timestamp_ms: None,
            status: UpdateStatus::Ok,
            state: None,
            override_active: false,
            parameters: BTreeMap::new(),
        }
    }

    /// Set the timestamp. Defaults to the current time (with `std`) or 0.
    pub fn timestamp_ms(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    /// Set the cycle readiness status.
    pub fn status(mut self, status: UpdateStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the aggregate state explicitly.
    ///
    /// When not set, the builder derives it from the critical readings.
    pub fn state(mut self, state: ParamState) -> Self {
        self.state = Some(state);
        self
    }

    /// Record that the operator override was engaged.
    pub fn override_active(mut self, active: bool) -> Self {
        self.override_active = active;
        self
    }

    /// Add a parameter reading.
    pub fn parameter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(ParamReadingBuilder) -> ParamReadingBuilder,
    {
        let reading = f(ParamReading::builder()).build();
        self.parameters.insert(name.into(), reading);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> WeatherSnapshot {
        let state = self
            .state
            .unwrap_or_else(|| {
                ParamState::most_severe(
                    self.parameters.values().filter(|r| r.critical).map(|r| r.state),
                )
            });
        WeatherSnapshot {
            version: SchemaVersion::current(),
            timestamp_ms: self.timestamp_ms.unwrap_or_else(default_timestamp),
            status: self.status,
            state,
            override_active: self.override_active,
            parameters: self.parameters,
        }
    }
}

impl Default for WeatherSnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
fn default_timestamp() -> u64 {
    current_timestamp_ms()
}

#[cfg(not(feature = "std"))]
fn default_timestamp() -> u64 {
    0
}

/// Current Unix timestamp in milliseconds.
#[cfg(feature = "std")]
pub fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
