use pollen_sim_core::core_types::{Celsius, Degrees, MetersPerSecond, Percent};
use pollen_sim_core::solver::severity_level;
use pollen_sim_core::{
    AgeClass, ConcentrationResult, GeoPoint, HealthState, InsolationCategory, Outcome,
    PollenSource, Species, StabilityClass, TargetPoint, TerrainType, TimeOfDay, WeatherObservation,
    ZeroReason,
};
use std::ffi::CStr;
use std::os::raw::c_char;

use crate::error::{DefaultPollenSimError, PollenSimErrorCode};
use crate::helpers::{input_from_ptr, instance_from_ptr, track_error, track_result};
use crate::instance::PollenSimInstance;

/// Stability code reported when the model stopped before classifying
pub const POLLEN_SIM_NO_STABILITY: u8 = 255;

/// C view of a pollen source.
///
/// Codes:
/// - `species`: position in the species table (0 birch, 1 alder, 2 hazel, 3 oak,
///   4 poplar, 5 willow, 6 ash, 7 maple, 8 elm, 9 pine, 10 spruce, 11 larch,
///   12 rowan, 13 linden, 14 other); unknown ids use `other`
/// - `age`: 0 young, 1 mature, 2 old
/// - `health`: 0 healthy, 1 satisfactory, 2 unsatisfactory, 3 hazardous
///
/// `height` and `crown_diameter` that are NaN or non-positive use the species defaults.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PollenSourceFfi {
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
    pub crown_diameter: f64,
    pub species: u8,
    pub age: u8,
    pub health: u8,
}

/// C view of an evaluation target. Height is metres above ground (1.5 for breathing height).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TargetFfi {
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
}

/// C view of a weather observation.
///
/// Codes:
/// - `insolation`: 0 strong solar, 1 moderate solar, 2 slight solar, 3 overcast,
///   4 clear night, 5 cloudy night
/// - `is_daytime`: 0 night, anything else day
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WeatherFfi {
    /// 10 m wind speed (m/s)
    pub wind_speed: f64,
    /// Direction the wind blows from (degrees)
    pub wind_direction: f64,
    /// Air temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub relative_humidity: f64,
    /// Precipitation rate (mm/h)
    pub precipitation_rate: f64,
    pub insolation: u8,
    pub is_daytime: u8,
}

/// Branch of the model that produced a concentration.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeCode {
    Plume = 0,
    NearSource = 1,
    CalmWind = 2,
    NoEmission = 3,
    Upwind = 4,
    DegenerateGeometry = 5,
}

/// Result of `pollen_sim_evaluate`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ConcentrationFfi {
    /// Concentration (units/m³)
    pub value: f64,
    pub outcome: OutcomeCode,
    /// 0-5 for classes A-F, `POLLEN_SIM_NO_STABILITY` if not classified
    pub stability: u8,
}

impl From<&ConcentrationResult> for ConcentrationFfi {
    fn from(result: &ConcentrationResult) -> Self {
        let outcome = match result.outcome {
            Outcome::Plume => OutcomeCode::Plume,
            Outcome::NearSource => OutcomeCode::NearSource,
            Outcome::BelowDetectionThreshold(ZeroReason::CalmWind) => OutcomeCode::CalmWind,
            Outcome::BelowDetectionThreshold(ZeroReason::NoEmission) => OutcomeCode::NoEmission,
            Outcome::BelowDetectionThreshold(ZeroReason::Upwind) => OutcomeCode::Upwind,
            Outcome::BelowDetectionThreshold(ZeroReason::DegenerateGeometry) => {
                OutcomeCode::DegenerateGeometry
            }
        };
        let stability = result.stability.map_or(POLLEN_SIM_NO_STABILITY, |class| {
            StabilityClass::ALL
                .iter()
                .position(|c| *c == class)
                .map_or(POLLEN_SIM_NO_STABILITY, |i| i as u8)
        });
        Self {
            value: result.value,
            outcome,
            stability,
        }
    }
}

fn age_from_code(code: u8) -> Result<AgeClass, DefaultPollenSimError> {
    match code {
        0 => Ok(AgeClass::Young),
        1 => Ok(AgeClass::Mature),
        2 => Ok(AgeClass::Old),
        _ => Err(DefaultPollenSimError::invalid_code("age", code)),
    }
}

fn health_from_code(code: u8) -> Result<HealthState, DefaultPollenSimError> {
    match code {
        0 => Ok(HealthState::Healthy),
        1 => Ok(HealthState::Satisfactory),
        2 => Ok(HealthState::Unsatisfactory),
        3 => Ok(HealthState::Hazardous),
        _ => Err(DefaultPollenSimError::invalid_code("health", code)),
    }
}

fn terrain_from_code(code: u8) -> Result<TerrainType, DefaultPollenSimError> {
    match code {
        0 => Ok(TerrainType::Open),
        1 => Ok(TerrainType::Suburban),
        2 => Ok(TerrainType::Urban),
        _ => Err(DefaultPollenSimError::invalid_code("terrain", code)),
    }
}

fn insolation_from_code(code: u8) -> Result<InsolationCategory, DefaultPollenSimError> {
    match code {
        0 => Ok(InsolationCategory::StrongSolar),
        1 => Ok(InsolationCategory::ModerateSolar),
        2 => Ok(InsolationCategory::SlightSolar),
        3 => Ok(InsolationCategory::Overcast),
        4 => Ok(InsolationCategory::ClearNight),
        5 => Ok(InsolationCategory::CloudyNight),
        _ => Err(DefaultPollenSimError::invalid_code("insolation", code)),
    }
}

fn optional_dimension(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}

impl TryFrom<&PollenSourceFfi> for PollenSource {
    type Error = DefaultPollenSimError;

    fn try_from(source: &PollenSourceFfi) -> Result<Self, Self::Error> {
        Ok(PollenSource {
            species: Species::from_id(source.species),
            location: GeoPoint::new(source.latitude, source.longitude),
            height: optional_dimension(source.height),
            crown_diameter: optional_dimension(source.crown_diameter),
            age: age_from_code(source.age)?,
            health: health_from_code(source.health)?,
        })
    }
}

impl From<&TargetFfi> for TargetPoint {
    fn from(target: &TargetFfi) -> Self {
        TargetPoint::new(GeoPoint::new(target.latitude, target.longitude))
            .with_height(target.height)
    }
}

impl TryFrom<&WeatherFfi> for WeatherObservation {
    type Error = DefaultPollenSimError;

    fn try_from(weather: &WeatherFfi) -> Result<Self, Self::Error> {
        Ok(WeatherObservation {
            wind_speed: MetersPerSecond::new(weather.wind_speed),
            wind_direction: Degrees::new(weather.wind_direction),
            temperature: Celsius::new(weather.temperature),
            relative_humidity: Percent::new(weather.relative_humidity),
            precipitation_rate: weather.precipitation_rate,
            insolation: insolation_from_code(weather.insolation)?,
            time_of_day: if weather.is_daytime == 0 {
                TimeOfDay::Night
            } else {
                TimeOfDay::Day
            },
        })
    }
}

fn evaluate_inputs(
    instance: &PollenSimInstance,
    source: &PollenSourceFfi,
    target: &TargetFfi,
    weather: &WeatherFfi,
    terrain: u8,
) -> Result<ConcentrationResult, DefaultPollenSimError> {
    let source = PollenSource::try_from(source)?;
    let target = TargetPoint::from(target);
    let weather = WeatherObservation::try_from(weather)?;
    let terrain = terrain_from_code(terrain)?;
    Ok(instance.model.evaluate(&source, &target, &weather, terrain)?)
}

/// Evaluate one source at one target.
///
/// `terrain`: 0 open, 1 suburban, 2 urban.
///
/// Returns
/// - `Ok` with the result in `out_result`; a zero value is a valid result
/// - `NullPointer` if any pointer is null
/// - `MissingInput`, `InvalidCoordinate`, `InvalidWindSpeed` for malformed inputs
/// - `InvalidParameter` for unknown enum codes
///
/// # Safety
/// `ptr` must be null or a live instance. `source`, `target`, `weather` and
/// `out_result` must be null or valid for reads (writes for `out_result`).
#[no_mangle]
pub unsafe extern "C" fn pollen_sim_evaluate(
    ptr: *const PollenSimInstance,
    source: *const PollenSourceFfi,
    target: *const TargetFfi,
    weather: *const WeatherFfi,
    terrain: u8,
    out_result: *mut ConcentrationFfi,
) -> PollenSimErrorCode {
    if out_result.is_null() {
        return track_error(&DefaultPollenSimError::null_pointer("out_result"));
    }
    let inputs = unsafe {
        instance_from_ptr(ptr).and_then(|instance| {
            Ok((
                instance,
                input_from_ptr(source, "source")?,
                input_from_ptr(target, "target")?,
                input_from_ptr(weather, "weather")?,
            ))
        })
    };
    let (instance, source, target, weather) = match inputs {
        Ok(inputs) => inputs,
        Err(code) => return code,
    };

    match track_result(evaluate_inputs(instance, source, target, weather, terrain)) {
        Ok(result) => {
            unsafe {
                *out_result = ConcentrationFfi::from(&result);
            }
            PollenSimErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Concentration only (units/m³). Same contract as `pollen_sim_evaluate`.
///
/// # Safety
/// As `pollen_sim_evaluate`, with `out_value` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn pollen_sim_concentration(
    ptr: *const PollenSimInstance,
    source: *const PollenSourceFfi,
    target: *const TargetFfi,
    weather: *const WeatherFfi,
    terrain: u8,
    out_value: *mut f64,
) -> PollenSimErrorCode {
    if out_value.is_null() {
        return track_error(&DefaultPollenSimError::null_pointer("out_value"));
    }
    let mut result = ConcentrationFfi {
        value: 0.0,
        outcome: OutcomeCode::Plume,
        stability: POLLEN_SIM_NO_STABILITY,
    };
    let code = unsafe { pollen_sim_evaluate(ptr, source, target, weather, terrain, &mut result) };
    if code == PollenSimErrorCode::Ok {
        unsafe {
            *out_value = result.value;
        }
    }
    code
}

/// Map a concentration to the 1-5 display severity scale.
#[no_mangle]
pub extern "C" fn pollen_sim_severity_level(concentration: f64) -> u8 {
    severity_level(concentration)
}

/// Resolve a species id from an inventory name (Russian, Latin or English).
///
/// Null or non-UTF-8 names resolve to `other`.
///
/// # Safety
/// `name` must be null or a valid null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn pollen_sim_species_from_name(name: *const c_char) -> u8 {
    if name.is_null() {
        return Species::Other.id();
    }
    // SAFETY: non-null and null-terminated per the contract above
    let name = unsafe { CStr::from_ptr(name) };
    name.to_str().map_or(Species::Other, Species::from_name).id()
}
