//! Closed-form plume expressions
//!
//! ```text
//! C = Q / (2π·σy·σz·u) · exp(-y²/2σy²) · [exp(-(z-H)²/2σz²) + exp(-(z+H)²/2σz²)]
//! ```
//!
//! The second vertical term is the image source below ground (total
//! reflection).

use crate::atmosphere::Sigmas;
use std::f64::consts::PI;

/// Gaussian plume with ground reflection.
///
/// Returns `None` when the denominator falls below `min_denominator`.
#[must_use]
pub fn gaussian_plume(
    emission: f64,
    wind_speed: f64,
    sigmas: Sigmas,
    crosswind: f64,
    z: f64,
    plume_height: f64,
    min_denominator: f64,
) -> Option<f64> {
    let Sigmas { sigma_y, sigma_z } = sigmas;
    let denominator = 2.0 * PI * sigma_y * sigma_z * wind_speed;
    if denominator.is_nan() || denominator < min_denominator {
        return None;
    }

    let lateral = (-crosswind.powi(2) / (2.0 * sigma_y.powi(2))).exp();
    let two_sz2 = 2.0 * sigma_z.powi(2);
    let vertical = (-(z - plume_height).powi(2) / two_sz2).exp()
        + (-(z + plume_height).powi(2) / two_sz2).exp();

    let value = emission / denominator * lateral * vertical;
    value.is_finite().then_some(value.max(0.0))
}

/// Near-source estimate: Q₀ spread over half the crown cross-section.
///
/// ```text
/// C ≈ Q₀ / (u_H · π(D/2)² · 0.5 + 1)
/// ```
///
/// Only the order of magnitude is meaningful; the Gaussian form is singular
/// at the source.
#[must_use]
pub fn near_source_estimate(emission: f64, wind_speed: f64, crown_diameter: f64) -> f64 {
    let cross_section = PI * (crown_diameter / 2.0).powi(2) * 0.5;
    (emission / (wind_speed * cross_section + 1.0)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SIGMAS: Sigmas = Sigmas {
        sigma_y: 20.0,
        sigma_z: 10.0,
    };

    #[test]
    fn test_centreline_ground_source() {
        // Ground-level release sampled at ground: both terms equal 1
        let c = gaussian_plume(100.0, 4.0, SIGMAS, 0.0, 0.0, 0.0, 1e-9).unwrap();
        assert_relative_eq!(c, 100.0 / (2.0 * PI * 20.0 * 10.0 * 4.0) * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_crosswind_symmetry() {
        let left = gaussian_plume(100.0, 4.0, SIGMAS, -15.0, 1.5, 12.0, 1e-9).unwrap();
        let right = gaussian_plume(100.0, 4.0, SIGMAS, 15.0, 1.5, 12.0, 1e-9).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_degenerate_denominator() {
        let tiny = Sigmas {
            sigma_y: 1e-6,
            sigma_z: 1e-6,
        };
        assert!(gaussian_plume(100.0, 1.0, tiny, 0.0, 0.0, 0.0, 1e-9).is_none());
        assert!(gaussian_plume(100.0, f64::NAN, SIGMAS, 0.0, 0.0, 0.0, 1e-9).is_none());
    }

    #[test]
    fn test_near_source_estimate() {
        let c = near_source_estimate(1000.0, 4.0, 10.0);
        assert_relative_eq!(c, 1000.0 / (4.0 * PI * 25.0 * 0.5 + 1.0), epsilon = 1e-12);
        assert_relative_eq!(near_source_estimate(10.0, 2.0, 0.0), 10.0);
    }
}
