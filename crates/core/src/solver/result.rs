//! Evaluation outcomes
//!
//! A zero concentration is a normal answer, so the result carries the reason
//! alongside the value instead of signalling it through an error.

use crate::atmosphere::{Sigmas, StabilityClass};
use crate::core_types::PlumeOffset;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an evaluation produced no contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZeroReason {
    /// 10 m wind below the transport minimum
    CalmWind,
    /// Emission rate is zero (rain, or zeroed factors)
    NoEmission,
    /// Target upwind of the source, or exactly crosswind
    Upwind,
    /// Gaussian denominator numerically degenerate
    DegenerateGeometry,
}

impl fmt::Display for ZeroReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ZeroReason::CalmWind => "calm wind",
            ZeroReason::NoEmission => "no emission",
            ZeroReason::Upwind => "upwind of source",
            ZeroReason::DegenerateGeometry => "degenerate geometry",
        };
        f.write_str(text)
    }
}

/// Which branch of the model produced the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Full Gaussian plume evaluation
    Plume,
    /// Target inside the near-field radius; crude cross-section estimate.
    /// Not dimensionally rigorous, kept as a known approximation.
    NearSource,
    /// Valid zero result
    BelowDetectionThreshold(ZeroReason),
}

/// Intermediate state of a plume evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlumeDiagnostics {
    /// Power-law wind profile exponent
    pub wind_exponent: f64,
    /// Wind speed at source height (m/s)
    pub wind_at_source: f64,
    /// Q₀ before depletion (units/s)
    pub emission_rate: f64,
    /// Target in the plume frame (m)
    pub offset: PlumeOffset,
    pub sigmas: Sigmas,
    /// Fraction of Q₀ left after dry deposition
    pub depletion: f64,
    /// Settled centreline height (m)
    pub effective_height: f64,
}

/// Concentration at one target from one source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcentrationResult {
    /// Concentration (units/m³), never negative or NaN
    pub value: f64,
    pub outcome: Outcome,
    /// Stability class, once the model got far enough to classify
    pub stability: Option<StabilityClass>,
    /// Present for [`Outcome::Plume`]
    pub diagnostics: Option<PlumeDiagnostics>,
}

impl ConcentrationResult {
    pub(crate) fn zero(reason: ZeroReason, stability: Option<StabilityClass>) -> Self {
        Self {
            value: 0.0,
            outcome: Outcome::BelowDetectionThreshold(reason),
            stability,
            diagnostics: None,
        }
    }

    /// The zero reason, if this is a valid zero.
    #[must_use]
    pub fn zero_reason(&self) -> Option<ZeroReason> {
        match self.outcome {
            Outcome::BelowDetectionThreshold(reason) => Some(reason),
            Outcome::Plume | Outcome::NearSource => None,
        }
    }

    /// True when the value reaches `threshold` (units/m³).
    #[must_use]
    pub fn is_detectable(&self, threshold: f64) -> bool {
        self.value > 0.0 && self.value >= threshold
    }
}
