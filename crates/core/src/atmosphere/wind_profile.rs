//! Power-law wind profile.
//!
//! ```text
//! u(H) = u10 · (max(H, h_min) / z_ref)^p
//! ```
//!
//! The exponent p grows with stability (stable layers shear more) and with
//! surface roughness. The result is floored at the minimum transport wind.

use super::StabilityClass;
use crate::core_types::TerrainType;
use crate::params::{ModelLimits, ModelParameters};

/// Power-law exponent p for a terrain and stability class.
#[must_use]
pub fn wind_profile_exponent(
    params: &ModelParameters,
    terrain: TerrainType,
    class: StabilityClass,
) -> f64 {
    params.wind_exponent(terrain, class)
}

/// Wind speed at `height` extrapolated from the reference measurement.
///
/// # Arguments
///
/// * `reference_speed` - Measured wind speed at the reference height (m/s)
/// * `height` - Target height (m); heights below the sigma floor use the floor
/// * `exponent` - Power-law exponent from [`wind_profile_exponent`]
/// * `limits` - Reference height and minimum transport wind
#[must_use]
pub fn wind_speed_at_height(
    reference_speed: f64,
    height: f64,
    exponent: f64,
    limits: &ModelLimits,
) -> f64 {
    let height = height.max(limits.min_sigma);
    let speed = reference_speed * (height / limits.reference_height).powf(exponent);
    speed.max(limits.min_wind_speed)
}
