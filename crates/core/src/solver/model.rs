//! Single source/target evaluation

use super::gaussian::{gaussian_plume, near_source_estimate};
use super::result::{ConcentrationResult, Outcome, PlumeDiagnostics, ZeroReason};
use crate::atmosphere::{
    classify_stability, dispersion_coefficients, wind_profile_exponent, wind_speed_at_height,
    StabilityClass,
};
use crate::core_types::{
    Degrees, PlumeOffset, PollenSource, TargetPoint, TerrainType, WeatherObservation,
};
use crate::error::{DispersionError, DispersionResult};
use crate::params::ModelParameters;
use crate::physics::{
    deposition_velocity, depletion_factor, effective_plume_height, emission_rate, SourceGeometry,
};
use tracing::{debug, warn};

/// Transport state shared by every target of one source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceConditions {
    pub stability: StabilityClass,
    pub wind_exponent: f64,
    /// Wind speed at source height (m/s)
    pub wind_at_source: f64,
    /// Q₀ (units/s)
    pub emission_rate: f64,
    pub geometry: SourceGeometry,
    pub settling_velocity: f64,
}

/// Gaussian-plume pollen dispersion model.
///
/// Holds an immutable parameter set; every evaluation is a pure function of
/// its arguments, so one model can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct DispersionModel {
    params: ModelParameters,
}

impl DispersionModel {
    /// Create a model from a validated parameter set.
    ///
    /// # Errors
    /// `InvalidParameters` if `params` fails validation.
    pub fn new(params: ModelParameters) -> DispersionResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    #[must_use]
    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// Stability, wind at source height and emission rate for one source.
    ///
    /// Inputs are assumed validated.
    ///
    /// # Errors
    /// The zero reason when the plume model does not apply (calm wind, no
    /// emission).
    pub fn source_conditions(
        &self,
        source: &PollenSource,
        weather: &WeatherObservation,
        terrain: TerrainType,
    ) -> Result<SourceConditions, ZeroReason> {
        let params = &self.params;
        if weather.wind_speed.is_calm(params.limits.min_wind_speed) {
            return Err(ZeroReason::CalmWind);
        }

        let traits = params.species_traits(source.species);
        let geometry = SourceGeometry::resolve(source, traits);
        let q0 = emission_rate(source, &geometry, weather, params);
        if q0 <= 0.0 {
            return Err(ZeroReason::NoEmission);
        }

        let wind = *weather.wind_speed;
        let stability = classify_stability(wind, weather.time_of_day, weather.insolation);
        let wind_exponent = wind_profile_exponent(params, terrain, stability);
        let wind_at_source =
            wind_speed_at_height(wind, geometry.height, wind_exponent, &params.limits);

        Ok(SourceConditions {
            stability,
            wind_exponent,
            wind_at_source,
            emission_rate: q0,
            geometry,
            settling_velocity: traits.settling_velocity,
        })
    }

    /// Full evaluation with outcome and intermediate state.
    ///
    /// # Errors
    /// `MissingInput`, `InvalidCoordinate` or `InvalidWindSpeed` for malformed
    /// inputs. Physically expected zeros are `Ok` results.
    pub fn evaluate(
        &self,
        source: &PollenSource,
        target: &TargetPoint,
        weather: &WeatherObservation,
        terrain: TerrainType,
    ) -> DispersionResult<ConcentrationResult> {
        source.validate()?;
        target.validate()?;
        weather.validate()?;

        let conditions = match self.source_conditions(source, weather, terrain) {
            Ok(conditions) => conditions,
            Err(reason) => {
                debug!(species = %source.species, %reason, "No contribution");
                return Ok(ConcentrationResult::zero(reason, None));
            }
        };

        Ok(self.evaluate_prepared(&conditions, source, target, weather.downwind_bearing(), terrain))
    }

    /// Geometry and plume evaluation for already validated inputs.
    pub(crate) fn evaluate_prepared(
        &self,
        conditions: &SourceConditions,
        source: &PollenSource,
        target: &TargetPoint,
        downwind_bearing: Degrees,
        terrain: TerrainType,
    ) -> ConcentrationResult {
        let distance = source.location.distance_to(&target.location);
        if distance < self.params.limits.near_field_distance {
            return self.near_source(conditions, distance);
        }

        let bearing = source.location.bearing_to(&target.location);
        let offset = PlumeOffset::from_polar(distance, bearing, downwind_bearing);
        self.plume_at(conditions, offset, target.height, terrain)
    }

    /// Concentration only (units/m³).
    ///
    /// # Errors
    /// As [`Self::evaluate`].
    pub fn concentration(
        &self,
        source: &PollenSource,
        target: &TargetPoint,
        weather: &WeatherObservation,
        terrain: TerrainType,
    ) -> DispersionResult<f64> {
        self.evaluate(source, target, weather, terrain)
            .map(|result| result.value)
    }

    /// Evaluate at a position given directly in the plume frame.
    ///
    /// # Errors
    /// `InvalidWindSpeed` / `MissingInput` for malformed weather, source or
    /// offset values.
    pub fn evaluate_local(
        &self,
        source: &PollenSource,
        weather: &WeatherObservation,
        terrain: TerrainType,
        offset: PlumeOffset,
        z: f64,
    ) -> DispersionResult<ConcentrationResult> {
        source.validate()?;
        weather.validate()?;
        DispersionError::require_finite("downwind", offset.downwind)?;
        DispersionError::require_finite("crosswind", offset.crosswind)?;
        DispersionError::require_finite("target_height", z)?;

        let conditions = match self.source_conditions(source, weather, terrain) {
            Ok(conditions) => conditions,
            Err(reason) => return Ok(ConcentrationResult::zero(reason, None)),
        };

        let distance = offset.downwind.hypot(offset.crosswind);
        if distance < self.params.limits.near_field_distance {
            return Ok(self.near_source(&conditions, distance));
        }
        Ok(self.plume_at(&conditions, offset, z, terrain))
    }

    fn near_source(&self, conditions: &SourceConditions, distance: f64) -> ConcentrationResult {
        let value = near_source_estimate(
            conditions.emission_rate,
            conditions.wind_at_source,
            conditions.geometry.crown_diameter,
        );
        debug!(
            distance,
            near_field = self.params.limits.near_field_distance,
            value,
            "Near-source estimate"
        );
        ConcentrationResult {
            value,
            outcome: Outcome::NearSource,
            stability: Some(conditions.stability),
            diagnostics: None,
        }
    }

    /// Gaussian evaluation once the target is known to be outside the near field.
    fn plume_at(
        &self,
        conditions: &SourceConditions,
        offset: PlumeOffset,
        z: f64,
        terrain: TerrainType,
    ) -> ConcentrationResult {
        let params = &self.params;
        let x = offset.downwind;
        if x <= params.limits.upwind_cutoff {
            debug!(x, "Target upwind of source");
            return ConcentrationResult::zero(ZeroReason::Upwind, Some(conditions.stability));
        }

        let sigmas = dispersion_coefficients(
            x,
            conditions.stability,
            terrain,
            &params.dispersion,
            params.limits.min_sigma,
        );
        let height = conditions.geometry.height;
        let vd = deposition_velocity(terrain, params);
        let depletion = depletion_factor(x, vd, conditions.wind_at_source, height, params);
        let depleted = conditions.emission_rate * depletion;
        let effective_height = effective_plume_height(
            height,
            conditions.settling_velocity,
            x,
            conditions.wind_at_source,
        );

        let Some(value) = gaussian_plume(
            depleted,
            conditions.wind_at_source,
            sigmas,
            offset.crosswind,
            z,
            effective_height,
            params.limits.min_denominator,
        ) else {
            warn!(
                x,
                sigma_y = sigmas.sigma_y,
                sigma_z = sigmas.sigma_z,
                u_h = conditions.wind_at_source,
                "Degenerate plume denominator"
            );
            return ConcentrationResult::zero(
                ZeroReason::DegenerateGeometry,
                Some(conditions.stability),
            );
        };

        debug!(
            stability = %conditions.stability,
            u_h = conditions.wind_at_source,
            x,
            y = offset.crosswind,
            sigma_y = sigmas.sigma_y,
            sigma_z = sigmas.sigma_z,
            depletion,
            h_eff = effective_height,
            value,
            "Plume evaluation"
        );

        ConcentrationResult {
            value,
            outcome: Outcome::Plume,
            stability: Some(conditions.stability),
            diagnostics: Some(PlumeDiagnostics {
                wind_exponent: conditions.wind_exponent,
                wind_at_source: conditions.wind_at_source,
                emission_rate: conditions.emission_rate,
                offset,
                sigmas,
                depletion,
                effective_height,
            }),
        }
    }
}
