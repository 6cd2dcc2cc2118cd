//! Per-parameter readings.

use alloc::string::String;

use crate::ParamState;

/// Point-in-time view of a single weather parameter.
///
/// A reading couples the raw measured value with the classification it
/// received at collection time, plus the flags a host needs to render it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct ParamReading {
    /// Raw measured value.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub value: f64,

    /// Classification of the value against the parameter's range.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub state: ParamState,

    /// Whether this parameter feeds into the aggregate station state.
    #[cfg_attr(feature = "minicbor", n(2))]
    pub critical: bool,

    /// Display label. Opaque to the evaluator.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty", default))]
    #[cfg_attr(feature = "minicbor", n(3))]
    pub label: String,
}

impl ParamReading {
    /// Create a reading with a value; everything else defaults.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    /// Create a builder for a reading.
    pub fn builder() -> ParamReadingBuilder {
        ParamReadingBuilder::new()
    }
}

/// Builder for `ParamReading`.
#[derive(Debug, Default)]
pub struct ParamReadingBuilder {
    value: f64,
    state: ParamState,
    critical: bool,
    label: String,
}

impl ParamReadingBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the measured value.
    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Set the classification.
    pub fn state(mut self, state: ParamState) -> Self {
        self.state = state;
        self
    }

    /// Mark the parameter critical.
    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Set the display label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Build the reading.
    pub fn build(self) -> ParamReading {
        ParamReading {
            value: self.value,
            state: self.state,
            critical: self.critical,
            label: self.label,
        }
    }
}
