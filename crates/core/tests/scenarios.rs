//! End-to-end dispersion scenarios and model-wide properties
//!
//! Numbers are regression baselines for the built-in (uncalibrated)
//! parameter set. They pin behaviour, not physical accuracy.
//!
//! Run tests with: cargo test --test scenarios

mod common;

use approx::assert_relative_eq;
use common::{birch, clear_night_weather, daytime_weather, target_at, target_east};
use pollen_sim_core::core_types::{
    Degrees, GeoPoint, MetersPerSecond, PlumeOffset, PollenSource, Species, TargetPoint,
};
use pollen_sim_core::{DispersionModel, Outcome, StabilityClass, TerrainType, ZeroReason};
use std::f64::consts::PI;

// ═══════════════════════════════════════════════════════════════════════════════
// SCENARIO A: daytime, moderate sun, urban
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_scenario_a_daytime_urban() {
    let model = DispersionModel::default();
    let result = model
        .evaluate(&birch(), &target_east(), &daytime_weather(), TerrainType::Urban)
        .unwrap();

    assert_eq!(result.outcome, Outcome::Plume);
    assert_eq!(result.stability, Some(StabilityClass::C));
    assert!(result.value.is_finite() && result.value > 0.0);
    assert_relative_eq!(result.value, 0.11835576505208743, max_relative = 1e-6);

    let d = result.diagnostics.unwrap();
    assert_relative_eq!(d.wind_exponent, 0.25);
    assert_relative_eq!(d.wind_at_source, 4.162224902509523, max_relative = 1e-9);
    assert_relative_eq!(d.emission_rate, 1148.6983549970348, max_relative = 1e-9);
    assert_relative_eq!(d.offset.downwind, 637.6289, max_relative = 1e-6);
    assert!(d.offset.crosswind.abs() < 0.1);
    assert_relative_eq!(d.sigmas.sigma_y, 21.560854127496256, max_relative = 1e-6);
    assert_relative_eq!(d.sigmas.sigma_z, 12.862507356697972, max_relative = 1e-6);
    assert_relative_eq!(d.depletion, 0.884656895427526, max_relative = 1e-6);
    assert_relative_eq!(d.effective_height, 16.936115051815268, max_relative = 1e-6);
}

/// A 20 m release reaches the ground some 600-700 m out. Nearer receptors sit
/// under the plume and see less; beyond the maximum the plume thins out.
#[test]
fn test_scenario_a_ground_level_maximum() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    let at = |distance: f64| {
        model
            .concentration(&birch(), &target_at(distance), &weather, TerrainType::Urban)
            .unwrap()
    };

    let c300 = at(300.0);
    let c600 = at(600.0);
    assert_relative_eq!(c300, 0.04773130874141083, max_relative = 1e-6);
    assert_relative_eq!(c600, 0.11806592400868982, max_relative = 1e-6);
    assert!(c300 < c600);

    let far: Vec<f64> = [1000.0, 1200.0, 1500.0, 2000.0, 3000.0].into_iter().map(at).collect();
    assert!(far.windows(2).all(|w| w[1] < w[0]), "{far:?}");
    assert_relative_eq!(far[0], 0.09547848531053259, max_relative = 1e-6);
    assert_relative_eq!(far[4], 0.019815490937868278, max_relative = 1e-6);
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCENARIO B: clear night, light wind, urban
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_scenario_b_clear_night_urban() {
    let model = DispersionModel::default();
    let result = model
        .evaluate(&birch(), &target_east(), &clear_night_weather(), TerrainType::Urban)
        .unwrap();

    assert_eq!(result.stability, Some(StabilityClass::F));
    assert!(result.stability.unwrap().is_stable());
    assert_eq!(result.outcome, Outcome::Plume);
    assert_relative_eq!(result.value, 2.7425350565909873e-06, max_relative = 1e-4);

    let d = result.diagnostics.unwrap();
    assert_relative_eq!(d.wind_at_source, 1.9792618661593413, max_relative = 1e-9);
    assert_relative_eq!(d.emission_rate, 229.73967099940697, max_relative = 1e-9);
    assert_relative_eq!(d.sigmas.sigma_z, 2.4412397925137714, max_relative = 1e-6);
    assert_relative_eq!(d.effective_height, 13.556901970478354, max_relative = 1e-6);

    // The thin stable plume has not reached breathing height yet
    let day = model
        .concentration(&birch(), &target_east(), &daytime_weather(), TerrainType::Urban)
        .unwrap();
    assert!(result.value < day);
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCENARIO C: rain
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_scenario_c_rain_gives_exact_zero() {
    let model = DispersionModel::default();
    let mut weather = daytime_weather();
    weather.precipitation_rate = 1.0;

    let result = model
        .evaluate(&birch(), &target_east(), &weather, TerrainType::Urban)
        .unwrap();
    assert_eq!(result.value, 0.0);
    assert_eq!(result.zero_reason(), Some(ZeroReason::NoEmission));
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_calm_wind_is_zero_everywhere() {
    let model = DispersionModel::default();
    let mut weather = daytime_weather();
    weather.wind_speed = MetersPerSecond::new(0.4);

    for terrain in [TerrainType::Open, TerrainType::Suburban, TerrainType::Urban] {
        for distance in [2.0, 50.0, 600.0, 5000.0] {
            let result = model.evaluate(&birch(), &target_at(distance), &weather, terrain).unwrap();
            assert_eq!(result.value, 0.0);
            assert_eq!(result.zero_reason(), Some(ZeroReason::CalmWind));
            assert_eq!(result.stability, None);
        }
    }
}

#[test]
fn test_crosswind_symmetry() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    for terrain in [TerrainType::Open, TerrainType::Urban] {
        for (x, y) in [(50.0, 5.0), (400.0, 30.0), (1500.0, 120.0)] {
            let left = PlumeOffset { downwind: x, crosswind: -y };
            let right = PlumeOffset { downwind: x, crosswind: y };
            let c_left = model.evaluate_local(&birch(), &weather, terrain, left, 1.5).unwrap();
            let c_right = model.evaluate_local(&birch(), &weather, terrain, right, 1.5).unwrap();
            assert_eq!(c_left.value, c_right.value);
            assert!(c_left.value > 0.0);
        }
    }
}

#[test]
fn test_ground_release_decreases_downwind() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    let ground =
        PollenSource::new(Species::Birch, common::SOURCE_LOCATION).with_dimensions(0.0, 10.0);

    for terrain in [TerrainType::Open, TerrainType::Suburban, TerrainType::Urban] {
        let values: Vec<f64> = (1..=40)
            .map(|i| f64::from(i) * 25.0)
            .map(|x| {
                let offset = PlumeOffset { downwind: x, crosswind: 0.0 };
                model.evaluate_local(&ground, &weather, terrain, offset, 0.0).unwrap().value
            })
            .collect();
        assert!(values.windows(2).all(|w| w[1] <= w[0]), "{terrain:?}: {values:?}");
    }
}

#[test]
fn test_elevated_release_decreases_past_maximum() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    let values: Vec<f64> = (0..20)
        .map(|i| 1000.0 + f64::from(i) * 250.0)
        .map(|x| {
            let offset = PlumeOffset { downwind: x, crosswind: 0.0 };
            model
                .evaluate_local(&birch(), &weather, TerrainType::Urban, offset, 1.5)
                .unwrap()
                .value
        })
        .collect();
    assert!(values.windows(2).all(|w| w[1] <= w[0]), "{values:?}");
}

#[test]
fn test_upwind_and_crosswind_targets_are_zero() {
    let model = DispersionModel::default();
    let weather = daytime_weather();

    // Wind from the west: a target to the west is upwind
    let west = TargetPoint::new(GeoPoint::new(55.0100, 82.9100));
    let result = model.evaluate(&birch(), &west, &weather, TerrainType::Urban).unwrap();
    assert_eq!(result.value, 0.0);
    assert_eq!(result.zero_reason(), Some(ZeroReason::Upwind));
    assert_eq!(result.stability, Some(StabilityClass::C));

    // Due north is exactly crosswind
    let north = TargetPoint::new(GeoPoint::new(55.0200, 82.9200));
    let result = model.evaluate(&birch(), &north, &weather, TerrainType::Urban).unwrap();
    assert_eq!(result.value, 0.0);
    assert_eq!(result.zero_reason(), Some(ZeroReason::Upwind));

    let offset = PlumeOffset { downwind: 1.0, crosswind: 50.0 };
    let result = model
        .evaluate_local(&birch(), &weather, TerrainType::Open, offset, 1.5)
        .unwrap();
    assert_eq!(result.zero_reason(), Some(ZeroReason::Upwind));
}

#[test]
fn test_near_source_estimate_inside_five_metres() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    let at_trunk = TargetPoint::new(common::SOURCE_LOCATION);

    let result = model.evaluate(&birch(), &at_trunk, &weather, TerrainType::Urban).unwrap();
    assert_eq!(result.outcome, Outcome::NearSource);

    let q0 = 500.0 * 2f64.powf(1.2);
    let u_h = 3.5 * 2f64.powf(0.25);
    let expected = q0 / (u_h * PI * 25.0 * 0.5 + 1.0);
    assert_relative_eq!(result.value, expected, max_relative = 1e-9);

    // Direction no longer matters inside the near field
    let west = TargetPoint::new(common::SOURCE_LOCATION.destination(Degrees::new(270.0), 3.0));
    let near = model.evaluate(&birch(), &west, &weather, TerrainType::Urban).unwrap();
    assert_eq!(near.outcome, Outcome::NearSource);
}

#[test]
fn test_terrain_changes_result() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    let values: Vec<f64> = [TerrainType::Open, TerrainType::Suburban, TerrainType::Urban]
        .into_iter()
        .map(|terrain| model.concentration(&birch(), &target_east(), &weather, terrain).unwrap())
        .collect();
    assert!(values.iter().all(|v| v.is_finite() && *v > 0.0));
    assert_ne!(values[0], values[2]);
    assert_ne!(values[1], values[2]);
}

#[test]
fn test_never_nan_across_weather_grid() {
    let model = DispersionModel::default();
    for wind in [0.5, 0.51, 1.0, 2.9, 6.0, 15.0, 40.0] {
        for direction in [0.0, 45.0, 90.0, 180.0, 269.9, 359.9] {
            for terrain in [TerrainType::Open, TerrainType::Suburban, TerrainType::Urban] {
                let mut weather = daytime_weather();
                weather.wind_speed = MetersPerSecond::new(wind);
                weather.wind_direction = Degrees::new(direction);
                for distance in [4.9, 5.0, 6.0, 100.0, 10_000.0] {
                    let c = model
                        .concentration(&birch(), &target_at(distance), &weather, terrain)
                        .unwrap();
                    assert!(c.is_finite() && c >= 0.0, "wind {wind} dir {direction} d {distance}");
                }
            }
        }
    }
}
