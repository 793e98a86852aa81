//! Dry-deposition source depletion
//!
//! Pollen lost to the ground ahead of the receptor is removed from the
//! source term instead of from the plume profile (source depletion):
//!
//! ```text
//! f = clamp(exp(-C · vd · x / (u_H · H)), f_min, 1)
//! ```

use crate::core_types::TerrainType;
use crate::params::ModelParameters;

/// Deposition velocity vd for the terrain (m/s)
#[must_use]
pub fn deposition_velocity(terrain: TerrainType, params: &ModelParameters) -> f64 {
    *params.deposition.velocity.get(terrain)
}

/// Fraction of Q₀ still airborne after `x` metres of travel.
///
/// Degenerate inputs (non-positive distance, deposition velocity or height,
/// or wind below the transport minimum) apply no depletion.
#[must_use]
pub fn depletion_factor(
    x: f64,
    vd: f64,
    wind_at_source: f64,
    height: f64,
    params: &ModelParameters,
) -> f64 {
    if x <= 0.0 || vd <= 0.0 || wind_at_source < params.limits.min_wind_speed || height <= 0.0 {
        return 1.0;
    }

    let deposition = &params.deposition;
    let exponent = -(deposition.depletion_constant * vd * x) / (wind_at_source * height);
    exponent.exp().clamp(deposition.min_depletion, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_velocity_increases_with_roughness() {
        let params = ModelParameters::default();
        let open = deposition_velocity(TerrainType::Open, &params);
        let suburban = deposition_velocity(TerrainType::Suburban, &params);
        let urban = deposition_velocity(TerrainType::Urban, &params);
        assert!(open < suburban && suburban < urban);
    }

    #[test]
    fn test_exponential_decay() {
        let params = ModelParameters::default();
        let f = depletion_factor(600.0, 0.02, 4.0, 20.0, &params);
        assert_relative_eq!(f, (-0.8 * 0.02 * 600.0 / 80.0f64).exp(), epsilon = 1e-12);
        assert!(depletion_factor(1200.0, 0.02, 4.0, 20.0, &params) < f);
    }

    #[test]
    fn test_clamped_to_floor() {
        let params = ModelParameters::default();
        assert_relative_eq!(depletion_factor(1.0e6, 0.02, 0.6, 1.0, &params), 0.01);
    }

    #[test]
    fn test_degenerate_inputs_apply_no_depletion() {
        let params = ModelParameters::default();
        assert_eq!(depletion_factor(0.0, 0.02, 4.0, 20.0, &params), 1.0);
        assert_eq!(depletion_factor(100.0, 0.0, 4.0, 20.0, &params), 1.0);
        assert_eq!(depletion_factor(100.0, 0.02, 0.4, 20.0, &params), 1.0);
        assert_eq!(depletion_factor(100.0, 0.02, 4.0, 0.0, &params), 1.0);
    }
}
