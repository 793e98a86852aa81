//! Shared fixtures for the integration suites

#![allow(dead_code)]

use pollen_sim_core::core_types::{
    Celsius, Degrees, GeoPoint, InsolationCategory, MetersPerSecond, Percent, PollenSource,
    Species, TargetPoint, TimeOfDay, WeatherObservation,
};
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const SOURCE_LOCATION: GeoPoint = GeoPoint::new(55.0100, 82.9200);

/// Target east of the source, 637.6 m by haversine
pub const EAST_TARGET: GeoPoint = GeoPoint::new(55.0100, 82.9300);

/// Mature, healthy birch, 20 m tall with a 10 m crown
pub fn birch() -> PollenSource {
    PollenSource::new(Species::from_name("Берёза повислая"), SOURCE_LOCATION)
        .with_dimensions(20.0, 10.0)
}

pub fn target_east() -> TargetPoint {
    TargetPoint::new(EAST_TARGET)
}

/// Breathing-height target `distance` metres due east of the source
pub fn target_at(distance: f64) -> TargetPoint {
    TargetPoint::new(SOURCE_LOCATION.destination(Degrees::new(90.0), distance))
}

/// Westerly 3.5 m/s, 20 °C, 50 % RH, dry, moderate sun
pub fn daytime_weather() -> WeatherObservation {
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

/// Light westerly on a clear night
pub fn clear_night_weather() -> WeatherObservation {
    WeatherObservation {
        wind_speed: MetersPerSecond::new(1.5),
        insolation: InsolationCategory::ClearNight,
        time_of_day: TimeOfDay::Night,
        ..daytime_weather()
    }
}
