//! Spherical-earth geodesy and the downwind/crosswind frame
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_METERS`]. At the few-kilometer range of a pollen plume the
//! spherical error is far below the uncertainty of the dispersion tables.

use crate::core_types::units::Degrees;
use crate::error::{DispersionError, DispersionResult};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Mean Earth radius (m)
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both coordinates are present and in range.
    ///
    /// # Errors
    /// `MissingInput` for NaN/infinite values, `InvalidCoordinate` when out of range.
    pub fn validate(&self) -> DispersionResult<()> {
        let lat = DispersionError::require_finite("latitude", self.latitude)?;
        let lon = DispersionError::require_finite("longitude", self.longitude)?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(DispersionError::InvalidCoordinate {
                field: "latitude",
                value: lat,
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(DispersionError::InvalidCoordinate {
                field: "longitude",
                value: lon,
            });
        }
        Ok(())
    }

    /// Great-circle distance in meters (haversine).
    #[must_use]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let d_phi = (other.latitude - self.latitude).to_radians();
        let d_lambda = (other.longitude - self.longitude).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METERS * c
    }

    /// Initial great-circle bearing towards `other`, in `[0, 360)`.
    ///
    /// Identical points give 0; callers must treat zero distance separately.
    #[must_use]
    pub fn bearing_to(&self, other: &GeoPoint) -> Degrees {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let d_lambda = (other.longitude - self.longitude).to_radians();

        let y = d_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
        Degrees::new(y.atan2(x).to_degrees()).normalized()
    }

    /// Point reached by travelling `distance` meters along `bearing`.
    #[must_use]
    pub fn destination(&self, bearing: Degrees, distance: f64) -> GeoPoint {
        if distance == 0.0 {
            return *self;
        }
        let delta = distance / EARTH_RADIUS_METERS;
        let theta = bearing.to_radians();
        let phi1 = self.latitude.to_radians();
        let lambda1 = self.longitude.to_radians();

        let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
        let lambda2 = lambda1
            + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

        let mut longitude = lambda2.to_degrees();
        if !(-180.0..=180.0).contains(&longitude) {
            longitude = (longitude + 540.0).rem_euclid(360.0) - 180.0;
        }
        GeoPoint {
            latitude: phi2.to_degrees(),
            longitude,
        }
    }
}

/// Target position in the plume frame: `downwind` along the mean wind,
/// `crosswind` perpendicular to it (positive to the right looking downwind).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlumeOffset {
    pub downwind: f64,
    pub crosswind: f64,
}

impl PlumeOffset {
    /// Rotate a (distance, bearing) pair into the frame of a plume travelling
    /// towards `downwind_bearing`.
    #[must_use]
    pub fn from_polar(distance: f64, bearing: Degrees, downwind_bearing: Degrees) -> Self {
        // East/north components of the source->target vector and the wind unit vector
        let theta = bearing.to_radians();
        let target = Vector2::new(theta.sin(), theta.cos()) * distance;
        let wind = Vector2::new(
            downwind_bearing.to_radians().sin(),
            downwind_bearing.to_radians().cos(),
        );

        Self {
            downwind: target.dot(&wind),
            crosswind: target.perp(&wind),
        }
    }
}
