//! Many-source, many-target evaluation for heatmaps
//!
//! Every (source, target) pair is independent, so pairs are spread over the
//! rayon pool. Contributions are returned per pair; adding up several
//! sources at one target is left to the caller.

use super::model::DispersionModel;
use crate::core_types::{
    Degrees, GeoPoint, PollenSource, TargetPoint, TerrainType, WeatherObservation,
};
use crate::error::{DispersionError, DispersionResult};
use crate::phenology::{is_flowering, validate_month};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Smallest plume radius worth rendering (m)
const MIN_PLUME_RADIUS: f64 = 500.0;

/// Rendered radius per m/s of 10 m wind (s)
const PLUME_RADIUS_PER_WIND: f64 = 500.0;

/// Highest level of the display severity scale
pub const MAX_SEVERITY: u8 = 5;

/// Largest number of targets [`TargetGrid::points`] will build
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// One source's contribution at one target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Index into the source slice
    pub source_index: usize,
    /// Index into the target slice
    pub target_index: usize,
    pub location: GeoPoint,
    /// Concentration (units/m³)
    pub concentration: f64,
}

impl Contribution {
    #[must_use]
    pub fn severity(&self) -> u8 {
        severity_level(self.concentration)
    }
}

/// Filters applied before and after evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchOptions {
    /// Calendar month; out-of-season sources are skipped when set
    pub month: Option<u32>,
    /// Targets farther than this from a source are skipped (m)
    pub max_range: Option<f64>,
}

/// Evaluate every source against every target in parallel.
///
/// Contributions below the model's detection threshold are dropped. The
/// result is ordered by source, then target.
///
/// # Errors
/// The first malformed source, target or weather record, or an invalid
/// month/range in `options`.
pub fn evaluate_contributions(
    model: &DispersionModel,
    sources: &[PollenSource],
    targets: &[TargetPoint],
    weather: &WeatherObservation,
    terrain: TerrainType,
    options: BatchOptions,
) -> DispersionResult<Vec<Contribution>> {
    weather.validate()?;
    sources.iter().try_for_each(PollenSource::validate)?;
    targets.iter().try_for_each(TargetPoint::validate)?;
    if let Some(month) = options.month {
        validate_month(month)?;
    }
    if let Some(range) = options.max_range {
        if range.is_nan() || range <= 0.0 {
            return Err(DispersionError::InvalidParameters(format!(
                "max_range must be positive, got {range}"
            )));
        }
    }

    let params = model.params();
    let threshold = params.limits.detection_threshold;
    let downwind: Degrees = weather.downwind_bearing();

    let contributions: Vec<Contribution> = sources
        .par_iter()
        .enumerate()
        .filter(|(_, source)| {
            options
                .month
                .is_none_or(|month| is_flowering(params, source.species, month))
        })
        .filter_map(|(index, source)| match model.source_conditions(source, weather, terrain) {
            Ok(conditions) => Some((index, source, conditions)),
            Err(reason) => {
                debug!(source_index = index, %reason, "Source skipped");
                None
            }
        })
        .flat_map_iter(|(source_index, source, conditions)| {
            targets
                .iter()
                .enumerate()
                .filter(move |(_, target)| {
                    options
                        .max_range
                        .is_none_or(|range| source.location.distance_to(&target.location) <= range)
                })
                .filter_map(move |(target_index, target)| {
                    let result =
                        model.evaluate_prepared(&conditions, source, target, downwind, terrain);
                    result.is_detectable(threshold).then_some(Contribution {
                        source_index,
                        target_index,
                        location: target.location,
                        concentration: result.value,
                    })
                })
        })
        .collect();

    info!(
        sources = sources.len(),
        targets = targets.len(),
        contributions = contributions.len(),
        "Batch evaluation complete"
    );
    Ok(contributions)
}

/// Radius around a source worth evaluating for display: max(500 m, 500·u10).
#[must_use]
pub fn plume_radius(wind_speed: f64) -> f64 {
    (PLUME_RADIUS_PER_WIND * wind_speed).max(MIN_PLUME_RADIUS)
}

/// Map a concentration onto the 1-5 display scale: ceil(2·log10(c + 1)).
#[must_use]
pub fn severity_level(concentration: f64) -> u8 {
    let scaled = (2.0 * (concentration.max(0.0) + 1.0).log10()).ceil();
    scaled.clamp(1.0, f64::from(MAX_SEVERITY)) as u8
}

/// Square lattice of targets centred on a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetGrid {
    pub center: GeoPoint,
    /// Distance from the centre to each edge (m)
    pub half_extent: f64,
    /// Distance between neighbouring points (m)
    pub spacing: f64,
    /// Evaluation height of every point (m)
    pub height: f64,
}

impl TargetGrid {
    /// Grid at breathing height.
    #[must_use]
    pub fn new(center: GeoPoint, half_extent: f64, spacing: f64) -> Self {
        Self {
            center,
            half_extent,
            spacing,
            height: TargetPoint::BREATHING_HEIGHT,
        }
    }

    /// Points per side, saturating for extents no grid could hold
    #[must_use]
    pub fn side(&self) -> usize {
        self.steps().saturating_mul(2).saturating_add(1)
    }

    fn steps(&self) -> usize {
        (self.half_extent / self.spacing).floor().max(0.0) as usize
    }

    /// Targets row by row from south-west to north-east.
    ///
    /// # Errors
    /// `InvalidParameters` for a non-positive spacing, a negative extent or a
    /// grid above [`MAX_GRID_POINTS`], `InvalidCoordinate` for a bad centre.
    pub fn points(&self) -> DispersionResult<Vec<TargetPoint>> {
        self.center.validate()?;
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(DispersionError::InvalidParameters(format!(
                "grid spacing must be positive, got {}",
                self.spacing
            )));
        }
        if !self.half_extent.is_finite() || self.half_extent < 0.0 {
            return Err(DispersionError::InvalidParameters(format!(
                "grid extent must be non-negative, got {}",
                self.half_extent
            )));
        }
        let requested_side = 2.0 * (self.half_extent / self.spacing).floor() + 1.0;
        if requested_side * requested_side > MAX_GRID_POINTS as f64 {
            return Err(DispersionError::InvalidParameters(format!(
                "grid of {requested_side}x{requested_side} points exceeds the limit of \
                {MAX_GRID_POINTS}"
            )));
        }

        let side = self.side();
        let offset = |index: usize| (index as f64 - self.steps() as f64) * self.spacing;
        let mut points = Vec::with_capacity(side * side);
        for row in 0..side {
            let row_origin = self.center.destination(Degrees::new(0.0), offset(row));
            for col in 0..side {
                let location = row_origin.destination(Degrees::new(90.0), offset(col));
                points.push(TargetPoint::new(location).with_height(self.height));
            }
        }
        Ok(points)
    }
}
