//! Parallel many-source evaluation
//!
//! Run tests with: cargo test --test batch

mod common;

use common::{birch, daytime_weather, SOURCE_LOCATION};
use pollen_sim_core::core_types::GeoPoint;
use pollen_sim_core::solver::{plume_radius, severity_level};
use pollen_sim_core::{
    evaluate_contributions, BatchOptions, DispersionError, DispersionModel, PollenSource, Species,
    TargetGrid, TerrainType,
};
use std::collections::HashMap;

fn grid() -> TargetGrid {
    TargetGrid::new(SOURCE_LOCATION, 1000.0, 100.0)
}

#[test]
fn test_contributions_match_single_evaluations() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    let sources = vec![birch()];
    let targets = grid().points().unwrap();

    let contributions = evaluate_contributions(
        &model,
        &sources,
        &targets,
        &weather,
        TerrainType::Urban,
        BatchOptions::default(),
    )
    .unwrap();

    assert!(!contributions.is_empty());
    let threshold = model.params().limits.detection_threshold;
    for c in &contributions {
        assert_eq!(c.source_index, 0);
        assert!(c.concentration >= threshold);
        assert_eq!(c.location, targets[c.target_index].location);
        // Westerly wind: everything detectable lies east of the trunk
        assert!(c.location.longitude >= SOURCE_LOCATION.longitude - 1e-9);

        let single = model
            .concentration(&sources[0], &targets[c.target_index], &weather, TerrainType::Urban)
            .unwrap();
        assert_eq!(single, c.concentration);
        assert!((1..=5).contains(&c.severity()));
    }

    let mut order = contributions.iter().map(|c| c.target_index);
    let first = order.next().unwrap();
    assert!(order.fold((true, first), |(ok, prev), next| (ok && next > prev, next)).0);
}

#[test]
fn test_caller_sums_overlapping_sources() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    let second = PollenSource::new(Species::Birch, GeoPoint::new(55.0100, 82.9210))
        .with_dimensions(20.0, 10.0);
    let sources = vec![birch(), second];
    let targets = grid().points().unwrap();

    let contributions = evaluate_contributions(
        &model,
        &sources,
        &targets,
        &weather,
        TerrainType::Urban,
        BatchOptions::default(),
    )
    .unwrap();
    assert!(contributions.iter().any(|c| c.source_index == 1));

    let mut totals: HashMap<usize, f64> = HashMap::new();
    for c in &contributions {
        *totals.entry(c.target_index).or_default() += c.concentration;
    }
    let overlapping = totals
        .keys()
        .filter(|t| contributions.iter().filter(|c| c.target_index == **t).count() == 2)
        .count();
    assert!(overlapping > 0);
}

#[test]
fn test_month_filter_skips_out_of_season_sources() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    let pine = PollenSource::new(Species::Pine, SOURCE_LOCATION).with_dimensions(22.0, 12.0);
    let sources = vec![birch(), pine];
    let targets = grid().points().unwrap();

    let july = BatchOptions {
        month: Some(7),
        ..BatchOptions::default()
    };
    let contributions =
        evaluate_contributions(&model, &sources, &targets, &weather, TerrainType::Open, july)
            .unwrap();
    assert!(!contributions.is_empty());
    assert!(contributions.iter().all(|c| c.source_index == 1));

    let april = BatchOptions {
        month: Some(4),
        ..BatchOptions::default()
    };
    let contributions =
        evaluate_contributions(&model, &sources, &targets, &weather, TerrainType::Open, april)
            .unwrap();
    assert!(contributions.iter().any(|c| c.source_index == 0));
}

#[test]
fn test_range_limit() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    let sources = vec![birch()];
    let targets = grid().points().unwrap();
    let options = BatchOptions {
        max_range: Some(450.0),
        ..BatchOptions::default()
    };

    let contributions =
        evaluate_contributions(&model, &sources, &targets, &weather, TerrainType::Urban, options)
            .unwrap();
    assert!(contributions
        .iter()
        .all(|c| SOURCE_LOCATION.distance_to(&c.location) <= 450.0));
}

#[test]
fn test_rain_yields_no_contributions() {
    let model = DispersionModel::default();
    let mut weather = daytime_weather();
    weather.precipitation_rate = 2.5;
    let contributions = evaluate_contributions(
        &model,
        &[birch()],
        &grid().points().unwrap(),
        &weather,
        TerrainType::Urban,
        BatchOptions::default(),
    )
    .unwrap();
    assert!(contributions.is_empty());
}

#[test]
fn test_invalid_batch_inputs() {
    let model = DispersionModel::default();
    let weather = daytime_weather();
    let targets = grid().points().unwrap();

    let bad_month = BatchOptions {
        month: Some(13),
        ..BatchOptions::default()
    };
    let sources = [birch()];
    let result =
        evaluate_contributions(&model, &sources, &targets, &weather, TerrainType::Urban, bad_month);
    assert!(matches!(result, Err(DispersionError::InvalidParameters(_))));

    let nowhere = PollenSource::new(Species::Birch, GeoPoint::new(f64::NAN, 82.92));
    let result = evaluate_contributions(
        &model,
        &[birch(), nowhere],
        &targets,
        &weather,
        TerrainType::Urban,
        BatchOptions::default(),
    );
    assert!(matches!(result, Err(DispersionError::MissingInput { field: "latitude" })));
}

#[test]
fn test_display_helpers() {
    assert_eq!(plume_radius(3.5), 1750.0);
    assert_eq!(severity_level(0.02), 1);
}
