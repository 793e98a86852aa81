//! Initial emission rate Q₀
//!
//! Q₀ = base · crown · age · health · humidity · diurnal · temperature
//!
//! Release stops completely once precipitation exceeds the light-rain
//! threshold; wet anthers do not shed.

use crate::core_types::{PollenSource, WeatherObservation};
use crate::params::{step_factor, EmissionFactors, ModelParameters, SpeciesTraits};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Physical dimensions of a source after filling in species defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceGeometry {
    /// Release height (m)
    pub height: f64,
    /// Crown diameter (m)
    pub crown_diameter: f64,
}

impl SourceGeometry {
    /// Use measured dimensions where present, species defaults otherwise.
    #[must_use]
    pub fn resolve(source: &PollenSource, traits: &SpeciesTraits) -> Self {
        Self {
            height: source.height.unwrap_or(traits.default_height),
            crown_diameter: source.crown_diameter.unwrap_or(traits.default_crown_diameter),
        }
    }
}

/// Capped power-law scaling of emission with crown size.
///
/// ```text
/// f = min(cap, (max(D_min, D) / D_ref)^k)
/// ```
#[must_use]
pub fn crown_factor(crown_diameter: f64, factors: &EmissionFactors) -> f64 {
    let diameter = crown_diameter.max(factors.min_crown_diameter);
    (diameter / factors.reference_crown_diameter)
        .powf(factors.crown_exponent)
        .min(factors.max_crown_factor)
}

/// Emission rate Q₀ (units/s) for one source under the observed weather.
///
/// Returns 0.0 when precipitation exceeds the rain threshold; never negative.
#[must_use]
pub fn emission_rate(
    source: &PollenSource,
    geometry: &SourceGeometry,
    weather: &WeatherObservation,
    params: &ModelParameters,
) -> f64 {
    let factors = &params.emission;
    if weather.precipitation_rate > factors.rain_threshold {
        trace!(
            precipitation = weather.precipitation_rate,
            "Release suppressed by rain"
        );
        return 0.0;
    }

    let base = params.species_traits(source.species).base_emission;
    let crown = crown_factor(geometry.crown_diameter, factors);
    let age = factors.age.get(source.age);
    let health = factors.health.get(source.health);
    let humidity = step_factor(&factors.humidity, *weather.relative_humidity);
    let diurnal = factors.diurnal(weather.time_of_day);
    let temperature = factors.temperature.factor(*weather.temperature);

    let rate = base * crown * age * health * humidity * diurnal * temperature;
    trace!(
        species = %source.species,
        base,
        crown,
        age,
        health,
        humidity,
        diurnal,
        temperature,
        rate,
        "Emission rate"
    );
    rate.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{
        AgeClass, Celsius, Degrees, GeoPoint, HealthState, InsolationCategory, MetersPerSecond,
        Percent, Species, TimeOfDay,
    };
    use approx::assert_relative_eq;

    fn weather() -> WeatherObservation {
        WeatherObservation {
            wind_speed: MetersPerSecond::new(3.5),
            wind_direction: Degrees::new(270.0),
            temperature: Celsius::new(20.0),
            relative_humidity: Percent::new(50.0),
            precipitation_rate: 0.0,
            insolation: InsolationCategory::ModerateSolar,
            time_of_day: TimeOfDay::Day,
        }
    }

    fn birch() -> PollenSource {
        PollenSource::new(Species::Birch, GeoPoint::new(55.01, 82.92)).with_dimensions(20.0, 10.0)
    }

    fn rate(source: &PollenSource, weather: &WeatherObservation) -> f64 {
        let params = ModelParameters::default();
        let geometry = SourceGeometry::resolve(source, params.species_traits(source.species));
        emission_rate(source, &geometry, weather, &params)
    }

    #[test]
    fn test_crown_factor_reference_and_cap() {
        let factors = EmissionFactors::default();
        assert_relative_eq!(crown_factor(5.0, &factors), 1.0);
        assert_relative_eq!(crown_factor(10.0, &factors), 2f64.powf(1.2), epsilon = 1e-12);
        assert_relative_eq!(crown_factor(50.0, &factors), 4.0);
        // Tiny crowns are raised to 1 m first
        assert_relative_eq!(crown_factor(0.1, &factors), crown_factor(1.0, &factors));
    }

    #[test]
    fn test_mature_healthy_birch_daytime() {
        assert_relative_eq!(rate(&birch(), &weather()), 500.0 * 2f64.powf(1.2), epsilon = 1e-9);
    }

    #[test]
    fn test_rain_stops_release() {
        let mut w = weather();
        w.precipitation_rate = 1.0;
        assert_eq!(rate(&birch(), &w), 0.0);

        // Drizzle at the threshold still releases
        w.precipitation_rate = 0.1;
        assert!(rate(&birch(), &w) > 0.0);
    }

    #[test]
    fn test_condition_factors_multiply() {
        let full = rate(&birch(), &weather());
        let young = birch().with_condition(AgeClass::Young, HealthState::Healthy);
        let old_poor = birch().with_condition(AgeClass::Old, HealthState::Unsatisfactory);
        assert_relative_eq!(rate(&young, &weather()), full * 0.1, epsilon = 1e-9);
        assert_relative_eq!(rate(&old_poor, &weather()), full * 0.6 * 0.2, epsilon = 1e-9);
    }

    #[test]
    fn test_humidity_night_and_temperature_damping() {
        let full = rate(&birch(), &weather());

        let mut humid = weather();
        humid.relative_humidity = Percent::new(95.0);
        assert_relative_eq!(rate(&birch(), &humid), full * 0.1, epsilon = 1e-9);
        humid.relative_humidity = Percent::new(75.0);
        assert_relative_eq!(rate(&birch(), &humid), full * 0.8, epsilon = 1e-9);

        let mut night = weather();
        night.time_of_day = TimeOfDay::Night;
        assert_relative_eq!(rate(&birch(), &night), full * 0.2, epsilon = 1e-9);

        let mut cold = weather();
        cold.temperature = Celsius::new(4.0);
        assert_relative_eq!(rate(&birch(), &cold), full * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_species_uses_fallback_and_defaults() {
        let params = ModelParameters::default();
        let source = PollenSource::new(Species::from_name("сирень"), GeoPoint::new(55.0, 83.0));
        let geometry = SourceGeometry::resolve(&source, params.species_traits(source.species));
        assert_eq!(geometry.height, 15.0);
        assert_eq!(geometry.crown_diameter, 6.0);
        let expected = 100.0 * (6.0f64 / 5.0).powf(1.2);
        let rate = emission_rate(&source, &geometry, &weather(), &params);
        assert_relative_eq!(rate, expected, epsilon = 1e-9);
    }
}
