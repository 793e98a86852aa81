//! Tilted-plume settling
//!
//! Grains fall at their terminal velocity vs while the wind carries them
//! downwind, so the centreline drops by `vs·x/u_H`. It cannot go below ground.

/// Effective centreline height `H_eff = max(0, H − vs·x/u_H)`
#[must_use]
pub fn effective_plume_height(
    height: f64,
    settling_velocity: f64,
    x: f64,
    wind_at_source: f64,
) -> f64 {
    if wind_at_source <= 0.0 {
        return 0.0;
    }
    (height - settling_velocity * x / wind_at_source).max(0.0)
}
