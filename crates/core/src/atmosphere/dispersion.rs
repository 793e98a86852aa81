//! Plume spread coefficients σy and σz.
//!
//! Open country uses Briggs rural power laws; built-up terrain uses the
//! urban set, with suburban taken as a fixed fraction of urban. Urban
//! coefficients are larger but σy grows with a shallower exponent, so at
//! long range (a few hundred metres for σy) open-terrain spread catches up.

use super::StabilityClass;
use crate::core_types::TerrainType;
use crate::params::DispersionCoefficients;
use serde::{Deserialize, Serialize};

/// Horizontal and vertical plume standard deviations (m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sigmas {
    pub sigma_y: f64,
    pub sigma_z: f64,
}

/// Spread at downwind distance `x`.
///
/// # Arguments
///
/// * `x` - Downwind distance (m), raised to the coefficient table's minimum
/// * `class` - Stability class
/// * `terrain` - Terrain family selecting the coefficient set
/// * `coefficients` - Power-law tables
/// * `min_sigma` - Floor applied to both results (m)
#[must_use]
pub fn dispersion_coefficients(
    x: f64,
    class: StabilityClass,
    terrain: TerrainType,
    coefficients: &DispersionCoefficients,
    min_sigma: f64,
) -> Sigmas {
    let x = x.max(coefficients.min_distance);

    let table = if terrain.is_built_up() {
        &coefficients.urban
    } else {
        &coefficients.open
    };
    let scale = if terrain == TerrainType::Suburban {
        coefficients.suburban_factor
    } else {
        1.0
    };

    Sigmas {
        sigma_y: (scale * table.sigma_y.get(class).eval(x)).max(min_sigma),
        sigma_z: (scale * table.sigma_z.get(class).eval(x)).max(min_sigma),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MIN_SIGMA: f64 = 0.5;

    fn sigmas(x: f64, class: StabilityClass, terrain: TerrainType) -> Sigmas {
        let coefficients = DispersionCoefficients::default();
        dispersion_coefficients(x, class, terrain, &coefficients, MIN_SIGMA)
    }

    #[test]
    fn test_open_terrain_power_laws() {
        let s = sigmas(1000.0, StabilityClass::D, TerrainType::Open);
        assert_relative_eq!(s.sigma_y, 0.08 * 1000f64.powf(0.9), epsilon = 1e-9);
        assert_relative_eq!(s.sigma_z, 0.06 * 1000f64.powf(0.8), epsilon = 1e-9);
    }

    #[test]
    fn test_urban_terrain_power_laws() {
        let s = sigmas(637.6, StabilityClass::C, TerrainType::Urban);
        assert_relative_eq!(s.sigma_y, 0.22 * 637.6f64.powf(0.71), epsilon = 1e-9);
        assert_relative_eq!(s.sigma_z, 0.14 * 637.6f64.powf(0.7), epsilon = 1e-9);
    }

    #[test]
    fn test_suburban_is_fraction_of_urban() {
        for class in StabilityClass::ALL {
            let urban = sigmas(400.0, class, TerrainType::Urban);
            let suburban = sigmas(400.0, class, TerrainType::Suburban);
            assert_relative_eq!(suburban.sigma_y, 0.9 * urban.sigma_y, epsilon = 1e-9);
            assert_relative_eq!(suburban.sigma_z, 0.9 * urban.sigma_z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_built_up_coefficients_exceed_open() {
        let c = DispersionCoefficients::default();
        for class in StabilityClass::ALL {
            let urban_y = c.urban.sigma_y.get(class).a;
            let urban_z = c.urban.sigma_z.get(class).a;
            assert!(c.suburban_factor * urban_y >= c.open.sigma_y.get(class).a, "{class} σy");
            assert!(c.suburban_factor * urban_z >= c.open.sigma_z.get(class).a, "{class} σz");

            let open = sigmas(2.0, class, TerrainType::Open);
            for terrain in [TerrainType::Suburban, TerrainType::Urban] {
                let built = sigmas(2.0, class, terrain);
                assert!(built.sigma_y >= open.sigma_y, "{class} {terrain:?} σy");
                assert!(built.sigma_z >= open.sigma_z, "{class} {terrain:?} σz");
            }
        }
    }

    #[test]
    fn test_open_spread_overtakes_urban_at_range() {
        // Shallower urban exponents: class D σy crosses over well inside 1 km
        let open = sigmas(500.0, StabilityClass::D, TerrainType::Open);
        let urban = sigmas(500.0, StabilityClass::D, TerrainType::Urban);
        assert!(open.sigma_y > urban.sigma_y);
    }

    #[test]
    fn test_distance_and_sigma_floors() {
        let at_zero = sigmas(0.0, StabilityClass::F, TerrainType::Open);
        let at_one = sigmas(1.0, StabilityClass::F, TerrainType::Open);
        assert_eq!(at_zero, at_one);
        assert_relative_eq!(at_one.sigma_y, MIN_SIGMA);
        assert_relative_eq!(at_one.sigma_z, MIN_SIGMA);
    }

    #[test]
    fn test_spread_grows_with_distance() {
        let near = sigmas(100.0, StabilityClass::B, TerrainType::Urban);
        let far = sigmas(2000.0, StabilityClass::B, TerrainType::Urban);
        assert!(far.sigma_y > near.sigma_y);
        assert!(far.sigma_z > near.sigma_z);
    }
}
