//! In-memory property containers mirrored to clients by the host.
//!
//! The monitor mutates these containers; the host's property system is
//! responsible for transmitting them. The vocabulary is deliberately small:
//! number vectors for values and ranges, switch vectors for commands, light
//! vectors for status.

use skywatch_types::{ParamRange, ParamState, UpdateStatus};

use crate::state::ParamEntry;

/// Name of the parameter-values number vector.
pub const PARAMETERS_PROP: &str = "WEATHER_PARAMETERS";
/// Name of the critical-status light vector.
pub const STATUS_PROP: &str = "WEATHER_STATUS";
/// Name of the polling-period number vector.
pub const UPDATE_PROP: &str = "WEATHER_UPDATE";
/// Name of the manual-refresh switch vector.
pub const REFRESH_PROP: &str = "WEATHER_REFRESH";
/// Name of the override switch vector.
pub const OVERRIDE_PROP: &str = "WEATHER_OVERRIDE";

/// Item names inside a per-parameter range vector.
pub mod range_item {
    /// Lower bound of the safe zone.
    pub const MIN_OK: &str = "MIN_OK";
    /// Upper bound of the safe zone.
    pub const MAX_OK: &str = "MAX_OK";
    /// Warning-zone fraction.
    pub const PERC_WARN: &str = "PERC_WARN";
    /// Non-zero flips the warning zone inside the safe band.
    pub const FLIP_RANGE: &str = "FLIP_RANGE";
}

/// A named number inside a [`NumberVector`].
#[derive(Debug, Clone, PartialEq)]
pub struct NumberItem {
    /// Item name, unique within its vector.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Current value.
    pub value: f64,
}

/// A group of related numbers, transmitted to clients as one property.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberVector {
    /// Property name, unique within the device.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Display group tag.
    pub group: String,
    /// Display state of the whole vector.
    pub state: ParamState,
    /// The numbers.
    pub items: Vec<NumberItem>,
}

impl NumberVector {
    fn new(name: &str, label: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            group: group.to_string(),
            state: ParamState::Unknown,
            items: Vec::new(),
        }
    }

    /// Look up an item by name.
    pub fn item(&self, name: &str) -> Option<&NumberItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Set an item's value. Returns false if the item does not exist.
    pub fn set_item(&mut self, name: &str, value: f64) -> bool {
        match self.items.iter_mut().find(|i| i.name == name) {
            Some(item) => {
                item.value = value;
                true
            }
            None => false,
        }
    }
}

/// A named on/off state inside a [`SwitchVector`].
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchItem {
    /// Item name, unique within its vector.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Whether the switch is on.
    pub on: bool,
}

/// A group of switches, transmitted to clients as one property.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchVector {
    /// Property name, unique within the device.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Display group tag.
    pub group: String,
    /// Display state of the whole vector.
    pub state: ParamState,
    /// The switches.
    pub items: Vec<SwitchItem>,
}

impl SwitchVector {
    fn single(name: &str, label: &str, group: &str, item: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            group: group.to_string(),
            state: ParamState::Unknown,
            items: vec![SwitchItem {
                name: item.to_string(),
                label: label.to_string(),
                on: false,
            }],
        }
    }

    /// Whether any switch in the vector is on.
    pub fn any_on(&self) -> bool {
        self.items.iter().any(|i| i.on)
    }
}

/// A status light inside a [`LightVector`].
#[derive(Debug, Clone, PartialEq)]
pub struct LightItem {
    /// Item name, unique within its vector.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Light state.
    pub state: ParamState,
}

/// A group of status lights, transmitted to clients as one property.
#[derive(Debug, Clone, PartialEq)]
pub struct LightVector {
    /// Property name, unique within the device.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Display group tag.
    pub group: String,
    /// Display state of the whole vector (the aggregate severity).
    pub state: ParamState,
    /// One light per critical parameter.
    pub items: Vec<LightItem>,
}

/// All property containers owned by the monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherProperties {
    /// One number per registered parameter; vector state mirrors the
    /// measurement source's readiness.
    pub parameters: NumberVector,

    /// One range vector per registered parameter, named after it, with
    /// `MIN_OK` / `MAX_OK` / `PERC_WARN` / `FLIP_RANGE` items.
    pub ranges: Vec<NumberVector>,

    /// One light per critical parameter; vector state is the aggregate
    /// severity.
    pub status: LightVector,

    /// Polling period in seconds (item `PERIOD`). Zero disables polling.
    pub update_period: NumberVector,

    /// Momentary manual-refresh switch.
    pub refresh: SwitchVector,

    /// Override toggle: suppresses alert-driven consequences downstream
    /// without altering computed classifications.
    pub override_switch: SwitchVector,

    /// Whether the properties are currently exposed to clients.
    pub visible: bool,
}

impl WeatherProperties {
    pub(crate) fn new(status_group: &str, params_group: &str, period_secs: f64) -> Self {
        let mut update_period = NumberVector::new(UPDATE_PROP, "Update", status_group);
        update_period.items.push(NumberItem {
            name: "PERIOD".to_string(),
            label: "Period (s)".to_string(),
            value: period_secs,
        });

        Self {
            parameters: NumberVector::new(PARAMETERS_PROP, "Parameters", params_group),
            ranges: Vec::new(),
            status: LightVector {
                name: STATUS_PROP.to_string(),
                label: "Status".to_string(),
                group: status_group.to_string(),
                state: ParamState::Unknown,
                items: Vec::new(),
            },
            update_period,
            refresh: SwitchVector::single(REFRESH_PROP, "Refresh", status_group, "REFRESH"),
            override_switch: SwitchVector::single(
                OVERRIDE_PROP,
                "Override status",
                status_group,
                "OVERRIDE",
            ),
            visible: false,
        }
    }

    /// Re-tag every vector into the given display groups.
    pub(crate) fn set_groups(&mut self, status_group: &str, params_group: &str) {
        self.parameters.group = params_group.to_string();
        for vector in &mut self.ranges {
            vector.group = params_group.to_string();
        }
        self.status.group = status_group.to_string();
        self.update_period.group = status_group.to_string();
        self.refresh.group = status_group.to_string();
        self.override_switch.group = status_group.to_string();
    }

    /// Look up the range vector for a parameter.
    pub fn range_vector(&self, name: &str) -> Option<&NumberVector> {
        self.ranges.iter().find(|v| v.name == name)
    }

    pub(crate) fn range_vector_mut(&mut self, name: &str) -> Option<&mut NumberVector> {
        self.ranges.iter_mut().find(|v| v.name == name)
    }

    /// The configured polling period in seconds.
    pub fn period_secs(&self) -> f64 {
        self.update_period
            .item("PERIOD")
            .map(|i| i.value)
            .unwrap_or(0.0)
    }

    pub(crate) fn add_parameter(&mut self, name: &str, label: &str, range: ParamRange) {
        self.parameters.items.push(NumberItem {
            name: name.to_string(),
            label: label.to_string(),
            value: 0.0,
        });

        let mut vector = NumberVector::new(name, label, &self.parameters.group);
        vector.items = vec![
            NumberItem {
                name: range_item::MIN_OK.to_string(),
                label: "OK range min".to_string(),
                value: range.min_ok,
            },
            NumberItem {
                name: range_item::MAX_OK.to_string(),
                label: "OK range max".to_string(),
                value: range.max_ok,
            },
            NumberItem {
                name: range_item::PERC_WARN.to_string(),
                label: "Warning fraction".to_string(),
                value: range.warning_percent,
            },
            NumberItem {
                name: range_item::FLIP_RANGE.to_string(),
                label: "Flip warning zone".to_string(),
                value: if range.flip_warning { 1.0 } else { 0.0 },
            },
        ];
        self.ranges.push(vector);
    }

    pub(crate) fn set_range(&mut self, name: &str, range: ParamRange) {
        if let Some(vector) = self.range_vector_mut(name) {
            vector.set_item(range_item::MIN_OK, range.min_ok);
            vector.set_item(range_item::MAX_OK, range.max_ok);
            vector.set_item(range_item::PERC_WARN, range.warning_percent);
            vector.set_item(
                range_item::FLIP_RANGE,
                if range.flip_warning { 1.0 } else { 0.0 },
            );
            vector.state = ParamState::Ok;
        }
    }

    /// Refresh values, lights, and vector states from the store.
    pub(crate) fn sync_from(
        &mut self,
        entries: &[(String, ParamEntry)],
        status: UpdateStatus,
        aggregate: ParamState,
    ) {
        for (name, entry) in entries {
            self.parameters.set_item(name, entry.value);
        }
        self.parameters.state = match status {
            UpdateStatus::Ok => ParamState::Ok,
            UpdateStatus::Busy => ParamState::Warning,
            UpdateStatus::Alert => ParamState::Alert,
        };

        // Lights track the critical set: one per critical parameter, kept in
        // store order.
        self.status.items = entries
            .iter()
            .filter(|(_, e)| e.is_critical)
            .map(|(name, e)| LightItem {
                name: name.clone(),
                label: e.label.clone(),
                state: e.last_state,
            })
            .collect();
        self.status.state = aggregate;
    }
}
