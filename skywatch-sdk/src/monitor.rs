//! The main WeatherMonitor type.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use skywatch_types::{
    ParamRange, ParamState, SchemaVersion, UpdateStatus, WeatherSnapshot,
};

use crate::config::{ParamConfig, WeatherConfig};
use crate::properties::{range_item, WeatherProperties, OVERRIDE_PROP, REFRESH_PROP, UPDATE_PROP};
use crate::state::ParamStore;
use crate::{Notifier, StationHandle, WeatherError, WeatherEvent, WeatherSource};

/// Default polling period.
const DEFAULT_PERIOD: Duration = Duration::from_secs(60);

/// An embeddable weather-safety monitor for a device driver.
///
/// The monitor owns the parameter store, the safety classifier, the
/// property containers mirrored to clients, and (with the `tokio` feature)
/// the recurring poll task. A weather-capable driver composes one of these
/// and delegates its lifecycle hooks to it; the actual measurements come
/// from a [`WeatherSource`] the driver implements.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use skywatch_sdk::{StationHandle, WeatherMonitor, WeatherSource};
/// use skywatch_types::{ParamRange, UpdateStatus};
///
/// struct RoofSensors;
///
/// #[async_trait]
/// impl WeatherSource for RoofSensors {
///     async fn update_weather(&self, station: &StationHandle) -> UpdateStatus {
///         station.set_value("WEATHER_WIND_SPEED", 6.4);
///         UpdateStatus::Ok
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let monitor = WeatherMonitor::builder()
///         .device("Roof Controller")
///         .update_period(std::time::Duration::from_secs(30))
///         .build();
///
///     monitor
///         .add_parameter("WEATHER_WIND_SPEED", "Wind (m/s)",
///             ParamRange::new(0.0, 20.0, 0.25).unwrap())
///         .unwrap();
///     monitor.set_critical_parameter("WEATHER_WIND_SPEED");
///
///     let poll = monitor.start(Arc::new(RoofSensors));
///
///     // ... driver runs ...
///
///     poll.stop();
/// }
/// ```
#[derive(Clone)]
pub struct WeatherMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    device: Option<String>,
    store: Arc<ParamStore>,
    notifiers: Vec<Notifier>,
    props: RwLock<WeatherProperties>,
    override_active: AtomicBool,
    /// Readiness reported by the most recent cycle. `Busy` until the first
    /// cycle completes: values are not trustworthy before then.
    last_status: RwLock<UpdateStatus>,
    period: RwLock<Duration>,
    #[cfg(feature = "tokio")]
    period_tx: tokio::sync::watch::Sender<Duration>,
    #[cfg(feature = "tokio")]
    refresh: tokio::sync::Notify,
}

impl WeatherMonitor {
    /// Create a monitor with default settings.
    ///
    /// No device-name filter, no notifiers, 60 second polling period.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for configuring the monitor.
    pub fn builder() -> WeatherMonitorBuilder {
        WeatherMonitorBuilder::new()
    }

    /// A handle measurement sources use to push raw values.
    pub fn handle(&self) -> StationHandle {
        StationHandle {
            store: self.inner.store.clone(),
            device: self.inner.device.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a weather parameter with its safety range.
    ///
    /// The parameter is not critical until
    /// [`set_critical_parameter`](Self::set_critical_parameter) is called
    /// for it. Fails on duplicate names; the range must already have been
    /// validated by [`ParamRange::new`].
    pub fn add_parameter(
        &self,
        name: impl Into<String>,
        label: impl Into<String>,
        range: ParamRange,
    ) -> Result<(), WeatherError> {
        let name = name.into();
        let label = label.into();
        self.inner.store.add_parameter(name.clone(), label.clone(), range)?;
        self.inner.props.write().add_parameter(&name, &label, range);
        Ok(())
    }

    /// Mark a registered parameter as critical to the device's operation.
    ///
    /// Critical parameters feed the aggregate station state that signals
    /// clients to take action. Returns false if the name is not registered.
    pub fn set_critical_parameter(&self, name: &str) -> bool {
        let ok = self.inner.store.set_critical(name);
        if ok {
            self.refresh_properties();
        }
        ok
    }

    /// Overwrite a parameter's raw value.
    ///
    /// Classification happens at evaluation time, not here. Returns false
    /// if the name is not registered.
    pub fn set_parameter_value(&self, name: &str, value: f64) -> bool {
        let ok = self.inner.store.set_value(name, value);
        if ok {
            self.inner.props.write().parameters.set_item(name, value);
        }
        ok
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Classify a parameter's current value against its configured range.
    ///
    /// Read-only and idempotent; returns `Unknown` for unregistered names.
    pub fn check_parameter_state(&self, name: &str) -> ParamState {
        self.inner.store.check_state(name)
    }

    /// Re-evaluate the critical parameters and report whether any of them
    /// changed classification since the last evaluation.
    ///
    /// Operates purely on stored values; never triggers remeasurement.
    pub fn sync_critical_parameters(&self) -> bool {
        let outcome = self.inner.store.sync_critical();
        self.refresh_properties();
        outcome.state_changed()
    }

    /// Run one full update cycle.
    ///
    /// Invokes the measurement source, re-evaluates the critical set, and
    /// surfaces changes through the configured notifiers. A source that
    /// reports `Busy` or `Alert` does not stop the cycle: classification
    /// still runs on whatever values are present, and the parameters
    /// property carries the source's readiness instead of a clean `Ok`.
    pub async fn check_weather_update(&self, source: &dyn WeatherSource) -> UpdateStatus {
        let status = source.update_weather(&self.handle()).await;
        *self.inner.last_status.write() = status;

        let outcome = self.inner.store.sync_critical();
        self.refresh_properties();

        #[cfg(feature = "tokio")]
        {
            for (name, state) in &outcome.changed {
                self.notify(WeatherEvent::ParameterChanged {
                    name: name.clone(),
                    state: *state,
                })
                .await;
            }
            if outcome.aggregate_changed {
                self.notify(WeatherEvent::StatusChanged(outcome.aggregate)).await;
            }
            self.notify(WeatherEvent::CycleFinished(status)).await;
            self.notify(WeatherEvent::SnapshotReady(self.collect())).await;
        }
        #[cfg(not(feature = "tokio"))]
        let _ = outcome;

        status
    }

    /// Snapshot every parameter with a fresh classification.
    pub fn collect(&self) -> WeatherSnapshot {
        self.inner
            .store
            .collect(*self.inner.last_status.read(), self.override_active())
    }

    /// Aggregate severity over the critical parameters, as of the last
    /// evaluation.
    pub fn aggregate_state(&self) -> ParamState {
        self.inner.store.aggregate()
    }

    /// The state the host's safety logic should act on: `Ok` while the
    /// override is engaged, the true aggregate otherwise.
    pub fn effective_state(&self) -> ParamState {
        if self.override_active() {
            ParamState::Ok
        } else {
            self.aggregate_state()
        }
    }

    // ------------------------------------------------------------------
    // Override and polling period
    // ------------------------------------------------------------------

    /// Engage or release the operator override.
    ///
    /// The override suppresses alert-driven consequences downstream; the
    /// monitor keeps computing and reporting true classifications
    /// underneath. The override switch shows `Warning` while engaged as a
    /// visual cue.
    pub fn set_override(&self, active: bool) {
        self.inner.override_active.store(active, Ordering::Relaxed);
        let mut props = self.inner.props.write();
        if let Some(item) = props.override_switch.items.first_mut() {
            item.on = active;
        }
        props.override_switch.state = if active {
            ParamState::Warning
        } else {
            ParamState::Ok
        };
    }

    /// Whether the operator override is engaged.
    pub fn override_active(&self) -> bool {
        self.inner.override_active.load(Ordering::Relaxed)
    }

    /// The configured polling period.
    pub fn update_period(&self) -> Duration {
        *self.inner.period.read()
    }

    /// Reconfigure the polling period.
    ///
    /// A running poll loop picks the new period up immediately; the next
    /// cycle fires one full period from now. A zero period disables timed
    /// polling (manual [`refresh`](Self::refresh) still works).
    pub fn set_update_period(&self, period: Duration) {
        *self.inner.period.write() = period;
        {
            let mut props = self.inner.props.write();
            props.update_period.set_item("PERIOD", period.as_secs_f64());
            props.update_period.state = ParamState::Ok;
        }
        #[cfg(feature = "tokio")]
        let _ = self.inner.period_tx.send(period);
    }

    /// Request an immediate cycle from the running poll loop, independent
    /// of the timer.
    #[cfg(feature = "tokio")]
    pub fn refresh(&self) {
        self.inner.refresh.notify_one();
    }

    /// Start the recurring poll task.
    ///
    /// The first cycle runs immediately, then once per configured period.
    /// Late ticks are coalesced rather than run concurrently: a cycle is
    /// always awaited to completion before the next one starts. Returns a
    /// handle that stops the task, e.g. when the host device disconnects.
    #[cfg(feature = "tokio")]
    pub fn start(&self, source: Arc<dyn WeatherSource>) -> PollHandle {
        use tokio::sync::watch;

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let mut period_rx = self.inner.period_tx.subscribe();
        let monitor = self.clone();

        tokio::spawn(async move {
            let mut interval = make_interval(*period_rx.borrow_and_update(), false);

            loop {
                tokio::select! {
                    _ = tick(&mut interval) => {
                        monitor.check_weather_update(source.as_ref()).await;
                    }
                    _ = monitor.inner.refresh.notified() => {
                        monitor.check_weather_update(source.as_ref()).await;
                    }
                    res = period_rx.changed() => {
                        if res.is_ok() {
                            interval = make_interval(*period_rx.borrow_and_update(), true);
                        }
                    }
                    _ = stop_rx.changed() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        PollHandle { stop_tx }
    }

    // ------------------------------------------------------------------
    // Host property protocol
    // ------------------------------------------------------------------

    /// Tag the property containers into the host's display groups.
    ///
    /// Call from the owning device's property-initialization hook.
    pub fn init_properties(&self, status_group: &str, params_group: &str) {
        self.inner.props.write().set_groups(status_group, params_group);
    }

    /// Expose or hide the properties after a connect/disconnect.
    pub fn update_properties(&self, connected: bool) -> bool {
        self.inner.props.write().visible = connected;
        true
    }

    /// Current state of all property containers.
    pub fn properties(&self) -> WeatherProperties {
        self.inner.props.read().clone()
    }

    /// Apply a client-initiated number write.
    ///
    /// Handles the polling period and per-parameter range edits. Returns
    /// whether the write was addressed to this monitor; a consumed but
    /// rejected edit (for example an inverted range) flips the property to
    /// `Alert` and leaves the store untouched.
    pub fn process_number(&self, device: &str, name: &str, items: &[(&str, f64)]) -> bool {
        if !self.is_our_device(device) {
            return false;
        }

        if name == UPDATE_PROP {
            if let Some((_, secs)) = items.iter().find(|(n, _)| *n == "PERIOD") {
                let secs = if secs.is_finite() && *secs > 0.0 { *secs } else { 0.0 };
                self.set_update_period(Duration::from_secs_f64(secs));
            }
            return true;
        }

        // A vector named after a registered parameter is its range.
        if self.inner.store.contains(name) {
            // Start from the current range so partial edits keep the rest.
            let current = match self.inner.store.range_of(name) {
                Some(range) => range,
                None => return false,
            };
            let mut min_ok = current.min_ok;
            let mut max_ok = current.max_ok;
            let mut percent = current.warning_percent;
            let mut flip = current.flip_warning;

            for (item, value) in items {
                match *item {
                    range_item::MIN_OK => min_ok = *value,
                    range_item::MAX_OK => max_ok = *value,
                    range_item::PERC_WARN => percent = *value,
                    range_item::FLIP_RANGE => flip = *value != 0.0,
                    _ => {}
                }
            }

            match ParamRange::new(min_ok, max_ok, percent) {
                Ok(mut range) => {
                    range.flip_warning = flip;
                    self.inner.store.set_range(name, range);
                    self.inner.props.write().set_range(name, range);
                    self.sync_critical_parameters();
                }
                Err(_) => {
                    if let Some(vector) = self.inner.props.write().range_vector_mut(name) {
                        vector.state = ParamState::Alert;
                    }
                }
            }
            return true;
        }

        false
    }

    /// Apply a client-initiated switch write.
    ///
    /// Handles the manual refresh request and the override toggle. Returns
    /// whether the write was addressed to this monitor.
    pub fn process_switch(&self, device: &str, name: &str, items: &[(&str, bool)]) -> bool {
        if !self.is_our_device(device) {
            return false;
        }

        match name {
            REFRESH_PROP => {
                let requested = items.iter().any(|(n, on)| *n == "REFRESH" && *on);
                #[cfg(feature = "tokio")]
                if requested {
                    self.refresh();
                }
                #[cfg(not(feature = "tokio"))]
                let _ = requested;

                // Momentary switch: snap back off.
                let mut props = self.inner.props.write();
                if let Some(item) = props.refresh.items.first_mut() {
                    item.on = false;
                }
                props.refresh.state = ParamState::Ok;
                true
            }
            OVERRIDE_PROP => {
                let active = items
                    .iter()
                    .find(|(n, _)| *n == "OVERRIDE")
                    .map(|(_, on)| *on)
                    .unwrap_or(false);
                self.set_override(active);
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Config persistence
    // ------------------------------------------------------------------

    /// Persist the current ranges, critical set, override, and period.
    ///
    /// The host decides where the stream goes (its config store, a file).
    pub fn save_config(&self, writer: impl Write) -> Result<(), WeatherError> {
        let parameters = self
            .inner
            .store
            .entries()
            .into_iter()
            .map(|(name, entry)| {
                (
                    name,
                    ParamConfig {
                        range: entry.range,
                        critical: entry.is_critical,
                    },
                )
            })
            .collect();

        let config = WeatherConfig {
            version: SchemaVersion::current(),
            update_period_secs: self.update_period().as_secs_f64(),
            override_active: self.override_active(),
            parameters,
        };
        config.to_writer(writer)
    }

    /// Restore a previously saved configuration.
    ///
    /// Ranges and critical flags apply to parameters that are already
    /// registered; names the driver no longer registers are skipped and
    /// returned. Critical flags are only ever added, matching the
    /// registration API.
    pub fn apply_config(&self, config: WeatherConfig) -> Result<Vec<String>, WeatherError> {
        if !config.version.is_compatible() {
            return Err(WeatherError::IncompatibleConfig {
                found: config.version,
                current: SchemaVersion::current(),
            });
        }

        let secs = config.update_period_secs;
        let secs = if secs.is_finite() && secs > 0.0 { secs } else { 0.0 };
        self.set_update_period(Duration::from_secs_f64(secs));
        self.set_override(config.override_active);

        let mut skipped = Vec::new();
        for (name, param) in config.parameters {
            if self.inner.store.set_range(&name, param.range) {
                if param.critical {
                    self.inner.store.set_critical(&name);
                }
                self.inner.props.write().set_range(&name, param.range);
            } else {
                skipped.push(name);
            }
        }
        self.refresh_properties();
        Ok(skipped)
    }

    // ------------------------------------------------------------------

    fn is_our_device(&self, device: &str) -> bool {
        self.inner.device.as_deref().map_or(true, |d| d == device)
    }

    fn refresh_properties(&self) {
        let entries = self.inner.store.entries();
        let status = *self.inner.last_status.read();
        let aggregate = self.inner.store.aggregate();
        self.inner.props.write().sync_from(&entries, status, aggregate);
    }

    #[cfg(feature = "tokio")]
    async fn notify(&self, event: WeatherEvent) {
        for notifier in &self.inner.notifiers {
            let _ = notifier.emit(&event).await;
        }
    }
}

impl Default for WeatherMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WeatherMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherMonitor")
            .field("device", &self.inner.device)
            .field("parameters", &self.inner.store.len())
            .field("period", &self.update_period())
            .finish()
    }
}

/// Builder for configuring a [`WeatherMonitor`].
#[derive(Debug, Default)]
pub struct WeatherMonitorBuilder {
    device: Option<String>,
    period: Option<Duration>,
    notifiers: Vec<Notifier>,
}

impl WeatherMonitorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only answer property writes addressed to this device name.
    ///
    /// Without a device name the monitor consumes matching writes from any
    /// device.
    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Set the polling period. Defaults to 60 seconds. Zero disables timed
    /// polling.
    pub fn update_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }

    /// Add a notifier.
    ///
    /// Multiple notifiers can be added; events are surfaced to all of them.
    pub fn notifier(mut self, notifier: Notifier) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Build the monitor.
    pub fn build(self) -> WeatherMonitor {
        let period = self.period.unwrap_or(DEFAULT_PERIOD);
        #[cfg(feature = "tokio")]
        let (period_tx, _) = tokio::sync::watch::channel(period);

        WeatherMonitor {
            inner: Arc::new(MonitorInner {
                device: self.device,
                store: Arc::new(ParamStore::default()),
                notifiers: self.notifiers,
                props: RwLock::new(WeatherProperties::new(
                    "Status",
                    "Parameters",
                    period.as_secs_f64(),
                )),
                override_active: AtomicBool::new(false),
                last_status: RwLock::new(UpdateStatus::Busy),
                period: RwLock::new(period),
                #[cfg(feature = "tokio")]
                period_tx,
                #[cfg(feature = "tokio")]
                refresh: tokio::sync::Notify::new(),
            }),
        }
    }
}

/// Handle for controlling the background poll task.
///
/// Call [`stop`](Self::stop) (or drop the owning monitor's host) when the
/// device disconnects.
#[cfg(feature = "tokio")]
pub struct PollHandle {
    stop_tx: tokio::sync::watch::Sender<bool>,
}

#[cfg(feature = "tokio")]
impl PollHandle {
    /// Stop the poll task. An in-flight cycle completes first.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}

#[cfg(feature = "tokio")]
fn make_interval(period: Duration, delay_first: bool) -> Option<tokio::time::Interval> {
    if period.is_zero() {
        return None;
    }
    let mut interval = if delay_first {
        tokio::time::interval_at(tokio::time::Instant::now() + period, period)
    } else {
        tokio::time::interval(period)
    };
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    Some(interval)
}

/// Wait for the next timed tick; waits forever when polling is disabled.
#[cfg(feature = "tokio")]
async fn tick(interval: &mut Option<tokio::time::Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
