//! Classification and readiness states.

/// Classification of a single weather parameter against its configured range.
///
/// The variants are ordered by severity, so `Ord`/`max` can be used to
/// aggregate: `Alert > Warning > Ok > Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
#[cfg_attr(feature = "minicbor", cbor(index_only))]
pub enum ParamState {
    /// The parameter is not registered, or has never been evaluated.
    #[default]
    #[cfg_attr(feature = "minicbor", n(0))]
    Unknown,

    /// The value is inside the safe zone.
    #[cfg_attr(feature = "minicbor", n(1))]
    Ok,

    /// The value is inside the warning zone.
    #[cfg_attr(feature = "minicbor", n(2))]
    Warning,

    /// The value is in the danger zone.
    #[cfg_attr(feature = "minicbor", n(3))]
    Alert,
}

impl ParamState {
    /// The most severe state in `states`, or `Unknown` if empty.
    pub fn most_severe(states: impl IntoIterator<Item = ParamState>) -> ParamState {
        states.into_iter().max().unwrap_or(ParamState::Unknown)
    }

    /// Whether this state should be treated as actionable by a host.
    pub fn is_unsafe(&self) -> bool {
        matches!(self, ParamState::Warning | ParamState::Alert)
    }
}

impl core::fmt::Display for ParamState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ParamState::Unknown => "Unknown",
            ParamState::Ok => "Ok",
            ParamState::Warning => "Warning",
            ParamState::Alert => "Alert",
        };
        f.write_str(s)
    }
}

/// Overall readiness reported by a measurement source after refreshing
/// parameter values.
///
/// Hosts should only trust parameter values collected under
/// [`UpdateStatus::Ok`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
#[cfg_attr(feature = "minicbor", cbor(index_only))]
pub enum UpdateStatus {
    /// Values were refreshed and are valid.
    #[default]
    #[cfg_attr(feature = "minicbor", n(0))]
    Ok,

    /// An update is still in progress; values are not yet trustworthy.
    #[cfg_attr(feature = "minicbor", n(1))]
    Busy,

    /// The update failed.
    #[cfg_attr(feature = "minicbor", n(2))]
    Alert,
}

impl core::fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            UpdateStatus::Ok => "Ok",
            UpdateStatus::Busy => "Busy",
            UpdateStatus::Alert => "Alert",
        };
        f.write_str(s)
    }
}
