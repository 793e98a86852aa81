//! Pasquill-Gifford stability classification.
//!
//! The classifier is an ordered decision table. Precedence, first match wins:
//!
//! ```text
//! 1. wind not a finite non-negative number      -> D
//! 2. day,   strong/moderate/slight solar        -> row lookup by wind band
//! 3. day,   overcast                            -> D (any wind)
//! 4. night, clear                               -> F (<2), E (<3), D
//! 5. night, cloudy                              -> E (<3), D
//! 6. anything else (night category by day,
//!    solar category at night)                   -> D
//!
//! Daytime rows, wind bands <2 | <3 | <5 | <6 | >=6 m/s:
//!   strong solar     A    B    C    C    D
//!   moderate solar   B    B    C    D    D
//!   slight solar     C    C    D    D    D
//! ```

use crate::core_types::{InsolationCategory, TimeOfDay};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Pasquill-Gifford class, ordered from most unstable to most stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum StabilityClass {
    /// Very unstable
    A,
    /// Moderately unstable
    B,
    /// Slightly unstable
    C,
    /// Neutral
    #[default]
    D,
    /// Slightly stable
    E,
    /// Very stable
    F,
}

impl StabilityClass {
    pub const ALL: [StabilityClass; 6] = [
        StabilityClass::A,
        StabilityClass::B,
        StabilityClass::C,
        StabilityClass::D,
        StabilityClass::E,
        StabilityClass::F,
    ];

    #[must_use]
    pub fn is_stable(self) -> bool {
        self > StabilityClass::D
    }

    #[must_use]
    pub fn is_unstable(self) -> bool {
        self < StabilityClass::D
    }
}

impl fmt::Display for StabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            StabilityClass::A => "A",
            StabilityClass::B => "B",
            StabilityClass::C => "C",
            StabilityClass::D => "D",
            StabilityClass::E => "E",
            StabilityClass::F => "F",
        };
        f.write_str(letter)
    }
}

/// Upper bounds (exclusive) of the daytime wind bands, m/s
const DAYTIME_WIND_BANDS: [f64; 4] = [2.0, 3.0, 5.0, 6.0];

const STRONG_SOLAR_ROW: [StabilityClass; 5] = {
    use StabilityClass::{A, B, C, D};
    [A, B, C, C, D]
};
const MODERATE_SOLAR_ROW: [StabilityClass; 5] = {
    use StabilityClass::{B, C, D};
    [B, B, C, D, D]
};
const SLIGHT_SOLAR_ROW: [StabilityClass; 5] = {
    use StabilityClass::{C, D};
    [C, C, D, D, D]
};

fn daytime_band(wind_speed: f64) -> usize {
    DAYTIME_WIND_BANDS
        .iter()
        .position(|&upper| wind_speed < upper)
        .unwrap_or(DAYTIME_WIND_BANDS.len())
}

/// Classify surface-layer stability.
///
/// # Arguments
///
/// * `wind_speed` - 10 m wind speed (m/s)
/// * `time_of_day` - Day or night flag of the observation
/// * `insolation` - Solar strength by day, cloud cover by night
///
/// # Returns
///
/// Stability class A-F. Inputs the table does not cover resolve to D.
#[must_use]
pub fn classify_stability(
    wind_speed: f64,
    time_of_day: TimeOfDay,
    insolation: InsolationCategory,
) -> StabilityClass {
    if !wind_speed.is_finite() || wind_speed < 0.0 {
        return StabilityClass::D;
    }

    if insolation.is_daytime_category() != time_of_day.is_day() {
        debug!(?time_of_day, ?insolation, "Inconsistent insolation category, using neutral");
        return StabilityClass::D;
    }

    match insolation {
        InsolationCategory::StrongSolar => STRONG_SOLAR_ROW[daytime_band(wind_speed)],
        InsolationCategory::ModerateSolar => MODERATE_SOLAR_ROW[daytime_band(wind_speed)],
        InsolationCategory::SlightSolar => SLIGHT_SOLAR_ROW[daytime_band(wind_speed)],
        InsolationCategory::Overcast => StabilityClass::D,
        InsolationCategory::ClearNight => {
            if wind_speed < 2.0 {
                StabilityClass::F
            } else if wind_speed < 3.0 {
                StabilityClass::E
            } else {
                StabilityClass::D
            }
        }
        InsolationCategory::CloudyNight => {
            if wind_speed < 3.0 {
                StabilityClass::E
            } else {
                StabilityClass::D
            }
        }
    }
}
