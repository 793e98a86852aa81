//! Semantic unit types for meteorological inputs
//!
//! Newtype wrappers keep wind speed, direction, temperature and humidity from
//! being swapped at call sites. All wrappers deref to `f64` so the model
//! formulas read like the equations they implement.
//!
//! # Usage
//! ```
//! use pollen_sim_core::core_types::units::{Degrees, MetersPerSecond};
//!
//! let from = Degrees::new(270.0);
//! assert_eq!(*from.opposite(), 90.0);
//! assert!(!MetersPerSecond::new(3.5).is_calm(0.5));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

// ============================================================================
// WIND
// ============================================================================

/// Wind speed in meters per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

impl MetersPerSecond {
    /// Create a wind speed. No validation; see [`crate::WeatherObservation::validate`].
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerSecond(value)
    }

    /// Convert from km/h, the unit most public weather feeds report
    #[inline]
    #[must_use]
    pub fn from_km_per_hour(kmh: f64) -> Self {
        MetersPerSecond(kmh / 3.6)
    }

    /// True when the speed is below the transport model's applicability floor
    #[inline]
    #[must_use]
    pub fn is_calm(self, min_wind_speed: f64) -> bool {
        self.0 < min_wind_speed
    }
}

impl Deref for MetersPerSecond {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for MetersPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} m/s", self.0)
    }
}

/// Compass angle in degrees, clockwise from north
///
/// Wind directions follow the meteorological convention: the direction the
/// wind blows *from*.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Degrees(f64);

impl Degrees {
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Wrap into `[0, 360)`
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Self {
        Degrees(self.0.rem_euclid(360.0))
    }

    /// The reciprocal bearing, e.g. the downwind direction of a wind "from" angle
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        Degrees((self.0 + 180.0).rem_euclid(360.0))
    }

    #[inline]
    #[must_use]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

impl Deref for Degrees {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}°", self.0)
    }
}

// ============================================================================
// THERMODYNAMIC STATE
// ============================================================================

/// Air temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Celsius {
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Celsius(value)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

/// Relative humidity in percent (0-100)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Percent(f64);

impl Percent {
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Percent(value)
    }
}

impl Deref for Percent {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_normalization() {
        assert_eq!(*Degrees::new(-90.0).normalized(), 270.0);
        assert_eq!(*Degrees::new(720.0).normalized(), 0.0);
        assert_eq!(*Degrees::new(270.0).opposite(), 90.0);
        assert_eq!(*Degrees::new(200.0).opposite(), 20.0);
    }

    #[test]
    fn test_wind_conversion() {
        let wind = MetersPerSecond::from_km_per_hour(36.0);
        assert!((*wind - 10.0).abs() < 1e-12);
        assert!(MetersPerSecond::new(0.4).is_calm(0.5));
        assert!(!MetersPerSecond::new(0.5).is_calm(0.5));
    }
}
