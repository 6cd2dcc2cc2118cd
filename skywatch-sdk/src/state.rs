//! Internal state management for the parameter store.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use skywatch_types::{ParamRange, ParamState, UpdateStatus, WeatherSnapshot};

use crate::WeatherError;

/// One registered weather parameter.
#[derive(Debug, Clone)]
pub(crate) struct ParamEntry {
    pub label: String,
    pub value: f64,
    pub range: ParamRange,
    pub is_critical: bool,
    /// Last classification recorded by `sync_critical`, used to detect
    /// transitions.
    pub last_state: ParamState,
}

/// Result of one critical-set evaluation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncOutcome {
    /// Critical parameters whose classification moved, with their new state.
    pub changed: Vec<(String, ParamState)>,

    /// Aggregate severity over the critical parameters after this pass.
    pub aggregate: ParamState,

    /// Whether the aggregate differs from the previous pass.
    pub aggregate_changed: bool,
}

impl SyncOutcome {
    /// True if at least one critical parameter changed classification.
    pub fn state_changed(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Ordered store of named weather parameters.
///
/// Parameters are registered once and persist for the driver's lifetime;
/// there is no removal operation. Values are overwritten on each poll, the
/// critical flag and range can be reconfigured at any time.
#[derive(Debug, Default)]
pub struct ParamStore {
    params: RwLock<BTreeMap<String, ParamEntry>>,
    aggregate: RwLock<ParamState>,
}

impl ParamStore {
    /// Register a new parameter.
    ///
    /// Fails with [`WeatherError::DuplicateParameter`] if the name is taken;
    /// the store is left untouched. Registration does not mark the
    /// parameter critical.
    pub fn add_parameter(
        &self,
        name: impl Into<String>,
        label: impl Into<String>,
        range: ParamRange,
    ) -> Result<(), WeatherError> {
        let name = name.into();
        let mut params = self.params.write();
        if params.contains_key(&name) {
            return Err(WeatherError::DuplicateParameter(name));
        }
        params.insert(
            name,
            ParamEntry {
                label: label.into(),
                value: 0.0,
                range,
                is_critical: false,
                last_state: ParamState::Unknown,
            },
        );
        Ok(())
    }

    /// Mark a registered parameter as critical.
    ///
    /// Returns false (store untouched) if the name is unknown. A parameter
    /// must be registered before it can be marked critical.
    pub fn set_critical(&self, name: &str) -> bool {
        match self.params.write().get_mut(name) {
            Some(entry) => {
                entry.is_critical = true;
                true
            }
            None => false,
        }
    }

    /// Overwrite the current value of a registered parameter.
    ///
    /// Does not re-run classification; that happens at evaluation time.
    /// Returns false (store untouched) if the name is unknown.
    pub fn set_value(&self, name: &str, value: f64) -> bool {
        match self.params.write().get_mut(name) {
            Some(entry) => {
                entry.value = value;
                true
            }
            None => false,
        }
    }

    /// Replace the range of a registered parameter.
    ///
    /// Returns false if the name is unknown.
    pub fn set_range(&self, name: &str, range: ParamRange) -> bool {
        match self.params.write().get_mut(name) {
            Some(entry) => {
                entry.range = range;
                true
            }
            None => false,
        }
    }

    /// Classify a parameter's current value against its range.
    ///
    /// Read-only and idempotent. Returns `Unknown` for unregistered names.
    pub fn check_state(&self, name: &str) -> ParamState {
        match self.params.read().get(name) {
            Some(entry) => entry.range.classify(entry.value),
            None => ParamState::Unknown,
        }
    }

    /// Re-evaluate every critical parameter and detect transitions.
    ///
    /// Classifies each critical parameter, compares against its previously
    /// recorded state, records the new state for the ones that moved, and
    /// recomputes the aggregate severity (`Alert > Warning > Ok > Unknown`)
    /// over critical parameters only. Operates purely on stored values;
    /// never triggers remeasurement.
    pub fn sync_critical(&self) -> SyncOutcome {
        let mut changed = Vec::new();
        let mut aggregate = ParamState::Unknown;

        {
            let mut params = self.params.write();
            for (name, entry) in params.iter_mut() {
                if !entry.is_critical {
                    continue;
                }
                let state = entry.range.classify(entry.value);
                if state != entry.last_state {
                    entry.last_state = state;
                    changed.push((name.clone(), state));
                }
                aggregate = aggregate.max(entry.last_state);
            }
        }

        let mut stored = self.aggregate.write();
        let aggregate_changed = *stored != aggregate;
        *stored = aggregate;

        SyncOutcome {
            changed,
            aggregate,
            aggregate_changed,
        }
    }

    /// Aggregate severity recorded by the last `sync_critical` pass.
    pub fn aggregate(&self) -> ParamState {
        *self.aggregate.read()
    }

    /// Snapshot every parameter with a fresh classification.
    ///
    /// Non-critical parameters are included for display; they never affect
    /// the aggregate.
    pub fn collect(&self, status: UpdateStatus, override_active: bool) -> WeatherSnapshot {
        let params = self.params.read();
        let mut builder = WeatherSnapshot::builder()
            .status(status)
            .override_active(override_active)
            .state(*self.aggregate.read());

        for (name, entry) in params.iter() {
            let state = entry.range.classify(entry.value);
            builder = builder.parameter(name.clone(), |p| {
                p.value(entry.value)
                    .state(state)
                    .critical(entry.is_critical)
                    .label(entry.label.clone())
            });
        }
        builder.build()
    }

    /// Names of all registered parameters, in registration-key order.
    pub fn names(&self) -> Vec<String> {
        self.params.read().keys().cloned().collect()
    }

    /// Whether a parameter is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.params.read().contains_key(name)
    }

    /// Number of registered parameters.
    pub fn len(&self) -> usize {
        self.params.read().len()
    }

    /// True if no parameters are registered.
    pub fn is_empty(&self) -> bool {
        self.params.read().is_empty()
    }

    /// The configured range of a parameter.
    pub fn range_of(&self, name: &str) -> Option<ParamRange> {
        self.params.read().get(name).map(|e| e.range)
    }

    /// The current raw value of a parameter.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.params.read().get(name).map(|e| e.value)
    }

    /// Whether a parameter is flagged critical.
    pub fn is_critical(&self, name: &str) -> bool {
        self.params
            .read()
            .get(name)
            .map(|e| e.is_critical)
            .unwrap_or(false)
    }

    /// Clone of every entry, for property and config synthesis.
    pub(crate) fn entries(&self) -> Vec<(String, ParamEntry)> {
        self.params
            .read()
            .iter()
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect()
    }
}
