//! The measurement seam.

use async_trait::async_trait;
use skywatch_types::UpdateStatus;

use crate::StationHandle;

/// A source of weather measurements.
///
/// This is the polymorphic hook a concrete driver implements: refresh the
/// raw value of each parameter it knows about through the
/// [`StationHandle`], then report overall readiness.
///
/// Implementations must not attempt to classify values or touch display
/// state; the monitor does that from the stored values. Hosts will only
/// trust values collected under [`UpdateStatus::Ok`] - return
/// [`UpdateStatus::Busy`] while a refresh is still in flight and
/// [`UpdateStatus::Alert`] when the hardware or service failed.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use skywatch_sdk::{StationHandle, WeatherSource};
/// use skywatch_types::UpdateStatus;
///
/// struct Anemometer;
///
/// #[async_trait]
/// impl WeatherSource for Anemometer {
///     async fn update_weather(&self, station: &StationHandle) -> UpdateStatus {
///         // read the hardware...
///         station.set_value("WEATHER_WIND_SPEED", 6.4);
///         UpdateStatus::Ok
///     }
/// }
/// ```
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Refresh raw parameter values and report readiness.
    async fn update_weather(&self, station: &StationHandle) -> UpdateStatus;
}
