//! Safety ranges and the three-zone classifier.

use crate::ParamState;

/// The safe/warning/alert boundaries for one weather parameter.
///
/// A range defines three zones around the safe band `[min_ok, max_ok]`:
///
/// 1. **Ok**: values inside the safe band.
/// 2. **Warning**: values within `warning_span()` of the band boundary. By
///    default the warning zone sits *outside* the band; with
///    [`flip_warning`](Self::flip_warning) it sits *inside* it, for
///    parameters where approaching a cutoff from the safe side is the
///    hazard.
/// 3. **Alert**: everything else.
///
/// # Example
///
/// ```rust
/// use skywatch_types::{ParamRange, ParamState};
///
/// let range = ParamRange::new(0.0, 20.0, 0.25).unwrap();
/// assert_eq!(range.warning_span(), 5.0);
/// assert_eq!(range.classify(18.0), ParamState::Ok);
/// assert_eq!(range.classify(23.0), ParamState::Warning);
/// assert_eq!(range.classify(-6.0), ParamState::Alert);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct ParamRange {
    /// Lower bound of the safe zone.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub min_ok: f64,

    /// Upper bound of the safe zone.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub max_ok: f64,

    /// Fraction of the safe band width that forms the warning zone.
    #[cfg_attr(feature = "minicbor", n(2))]
    pub warning_percent: f64,

    /// Place the warning zone inside the safe band instead of outside it.
    #[cfg_attr(feature = "minicbor", n(3))]
    #[cfg_attr(feature = "serde", serde(default))]
    pub flip_warning: bool,
}

impl ParamRange {
    /// Create a range with the warning zone outside the safe band.
    ///
    /// Fails if `min_ok > max_ok` or `warning_percent` is negative; the
    /// classifier is undefined for such ranges, so they are rejected here
    /// rather than checked at evaluation time.
    pub fn new(min_ok: f64, max_ok: f64, warning_percent: f64) -> Result<Self, RangeError> {
        if !(min_ok <= max_ok) {
            return Err(RangeError::Inverted { min_ok, max_ok });
        }
        if !(warning_percent >= 0.0) {
            return Err(RangeError::NegativeWarning(warning_percent));
        }
        Ok(Self {
            min_ok,
            max_ok,
            warning_percent,
            flip_warning: false,
        })
    }

    /// Move the warning zone inside the safe band.
    pub fn flipped(mut self) -> Self {
        self.flip_warning = true;
        self
    }

    /// Width of the warning zone: `(max_ok - min_ok) * warning_percent`.
    pub fn warning_span(&self) -> f64 {
        (self.max_ok - self.min_ok) * self.warning_percent
    }

    /// Classify a value against this range.
    ///
    /// Pure and idempotent: repeated calls with the same value yield the
    /// same state. Classification never gets less severe as the value moves
    /// away from the safe band. A NaN value classifies as `Alert`.
    pub fn classify(&self, value: f64) -> ParamState {
        let span = self.warning_span();

        if self.flip_warning {
            // Alert stays strictly outside the safe band; the warning zone
            // is the inward margin of width `span` on each side.
            if value < self.min_ok || value > self.max_ok || value.is_nan() {
                ParamState::Alert
            } else if value >= self.min_ok + span && value <= self.max_ok - span {
                ParamState::Ok
            } else {
                ParamState::Warning
            }
        } else if value >= self.min_ok && value <= self.max_ok {
            ParamState::Ok
        } else if value >= self.min_ok - span && value <= self.max_ok + span {
            ParamState::Warning
        } else {
            ParamState::Alert
        }
    }
}

/// Rejected range configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeError {
    /// `min_ok` exceeds `max_ok` (or either bound is NaN).
    Inverted { min_ok: f64, max_ok: f64 },

    /// The warning fraction is negative (or NaN).
    NegativeWarning(f64),
}

impl core::fmt::Display for RangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RangeError::Inverted { min_ok, max_ok } => {
                write!(f, "invalid range: min_ok {min_ok} exceeds max_ok {max_ok}")
            }
            RangeError::NegativeWarning(pct) => {
                write!(f, "invalid range: negative warning fraction {pct}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RangeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn wind_range() -> ParamRange {
        ParamRange::new(0.0, 20.0, 0.25).unwrap()
    }

    #[test]
    fn inverted_range_rejected() {
        let err = ParamRange::new(10.0, 5.0, 0.1).unwrap_err();
        assert!(matches!(err, RangeError::Inverted { .. }));
    }

    #[test]
    fn nan_bounds_rejected() {
        assert!(ParamRange::new(f64::NAN, 5.0, 0.1).is_err());
        assert!(ParamRange::new(0.0, f64::NAN, 0.1).is_err());
    }

    #[test]
    fn negative_warning_rejected() {
        let err = ParamRange::new(0.0, 10.0, -0.5).unwrap_err();
        assert_eq!(err, RangeError::NegativeWarning(-0.5));
    }

    #[test]
    fn degenerate_band_is_allowed() {
        // min == max is a point band: only that exact value is Ok.
        let range = ParamRange::new(5.0, 5.0, 0.5).unwrap();
        assert_eq!(range.warning_span(), 0.0);
        assert_eq!(range.classify(5.0), ParamState::Ok);
        assert_eq!(range.classify(5.1), ParamState::Alert);
    }

    #[test]
    fn values_inside_band_are_ok() {
        let range = wind_range();
        for v in [0.0, 0.1, 10.0, 19.9, 20.0] {
            assert_eq!(range.classify(v), ParamState::Ok, "value {v}");
        }
    }

    #[test]
    fn values_in_outer_margin_are_warning() {
        // warning_span = (20 - 0) * 0.25 = 5
        let range = wind_range();
        for v in [-5.0, -0.1, 20.1, 22.0, 25.0] {
            assert_eq!(range.classify(v), ParamState::Warning, "value {v}");
        }
    }

    #[test]
    fn values_beyond_margin_are_alert() {
        let range = wind_range();
        for v in [-5.1, -100.0, 25.1, 30.0, f64::INFINITY] {
            assert_eq!(range.classify(v), ParamState::Alert, "value {v}");
        }
    }

    #[test]
    fn severity_is_monotone_in_distance_from_band() {
        let range = wind_range();
        // Sweep outward from the band centre; severity must never decrease.
        let mut worst = ParamState::Unknown;
        let mut v = 10.0;
        while v <= 40.0 {
            let state = range.classify(v);
            assert!(state >= worst, "severity decreased at {v}");
            worst = state;
            v += 0.5;
        }
    }

    #[test]
    fn flipped_moves_warning_inside_band() {
        let range = wind_range().flipped();
        // Inward margins: [0, 5) and (15, 20] warn, [5, 15] is Ok.
        assert_eq!(range.classify(19.0), ParamState::Warning);
        assert_eq!(range.classify(1.0), ParamState::Warning);
        assert_eq!(range.classify(10.0), ParamState::Ok);
        assert_eq!(range.classify(5.0), ParamState::Ok);
        assert_eq!(range.classify(15.0), ParamState::Ok);
    }

    #[test]
    fn flipped_alert_stays_outside_band() {
        let range = wind_range().flipped();
        assert_eq!(range.classify(21.0), ParamState::Alert);
        assert_eq!(range.classify(-0.5), ParamState::Alert);
        // Band edges are inside the band, so at worst Warning.
        assert_eq!(range.classify(0.0), ParamState::Warning);
        assert_eq!(range.classify(20.0), ParamState::Warning);
    }

    #[test]
    fn flipped_with_oversized_margin_has_no_ok_zone() {
        // Margins of 60% per side overlap: everything in-band warns.
        let range = ParamRange::new(0.0, 10.0, 0.6).unwrap().flipped();
        assert_eq!(range.classify(5.0), ParamState::Warning);
        assert_eq!(range.classify(0.0), ParamState::Warning);
        assert_eq!(range.classify(11.0), ParamState::Alert);
    }

    #[test]
    fn zero_warning_percent_collapses_warning_zone() {
        let range = ParamRange::new(0.0, 20.0, 0.0).unwrap();
        assert_eq!(range.classify(20.0), ParamState::Ok);
        assert_eq!(range.classify(20.000001), ParamState::Alert);

        let flipped = range.flipped();
        assert_eq!(flipped.classify(20.0), ParamState::Ok);
        assert_eq!(flipped.classify(20.000001), ParamState::Alert);
    }

    #[test]
    fn nan_value_is_alert_in_both_modes() {
        assert_eq!(wind_range().classify(f64::NAN), ParamState::Alert);
        assert_eq!(wind_range().flipped().classify(f64::NAN), ParamState::Alert);
    }

    #[test]
    fn classify_is_idempotent() {
        let range = wind_range();
        for v in [-10.0, -3.0, 5.0, 22.0, 40.0] {
            let first = range.classify(v);
            for _ in 0..10 {
                assert_eq!(range.classify(v), first);
            }
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let range = wind_range().flipped();
        let json = serde_json::to_string(&range).unwrap();
        let back: ParamRange = serde_json::from_str(&json).unwrap();
        assert_eq!(range, back);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn flip_defaults_to_false_when_absent() {
        let json = r#"{"min_ok":0.0,"max_ok":20.0,"warning_percent":0.25}"#;
        let range: ParamRange = serde_json::from_str(json).unwrap();
        assert!(!range.flip_warning);
    }
}
