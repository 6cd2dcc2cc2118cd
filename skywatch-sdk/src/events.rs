//! Change notifications surfaced to the host.

use skywatch_types::{ParamState, UpdateStatus, WeatherSnapshot};

/// A change the host should forward to its clients.
///
/// The monitor only mutates its own in-memory state; transmitting these
/// events to connected clients is the host's job.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherEvent {
    /// A critical parameter's classification moved.
    ParameterChanged {
        /// Parameter name.
        name: String,
        /// New classification.
        state: ParamState,
    },

    /// The aggregate severity over the critical parameters moved.
    StatusChanged(ParamState),

    /// A polling cycle finished with the given source readiness.
    CycleFinished(UpdateStatus),

    /// A full snapshot of the station, emitted once per cycle.
    SnapshotReady(WeatherSnapshot),
}
