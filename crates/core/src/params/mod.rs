//! Versioned empirical parameter set
//!
//! Every tunable constant the engine uses lives here. The defaults are the
//! uncalibrated placeholder values; deployments override them from a TOML
//! file. Loading never mutates global state: each [`DispersionModel`]
//! owns its own copy.
//!
//! [`DispersionModel`]: crate::DispersionModel

pub mod tables;

pub use tables::{step_factor, ByStability, BySpecies, ByTerrain, ThresholdFactor};

use crate::atmosphere::StabilityClass;
use crate::core_types::{AgeClass, HealthState, Species, TerrainType, TimeOfDay};
use crate::error::{DispersionError, DispersionResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Identifier of the built-in table set
pub const DEFAULT_PARAMETER_VERSION: &str = "2024.1-uncalibrated";

/// Complete parameter set for one model instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub version: String,
    pub limits: ModelLimits,
    /// Power-law exponent p per terrain and stability class
    pub wind_profile: ByTerrain<ByStability<f64>>,
    pub dispersion: DispersionCoefficients,
    pub emission: EmissionFactors,
    pub deposition: DepositionParameters,
    /// Fields missing from a species table keep that species' built-in value
    #[serde(deserialize_with = "deserialize_species")]
    pub species: BySpecies<SpeciesTraits>,
}

/// Thresholds and floors that keep the formula well-defined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelLimits {
    /// Below this 10 m wind speed the plume model is not applied (m/s)
    pub min_wind_speed: f64,
    /// Floor for σy, σz and for the wind-profile height (m)
    pub min_sigma: f64,
    /// Measurement height of the input wind speed (m)
    pub reference_height: f64,
    /// Distances below this use the near-source estimate (m)
    pub near_field_distance: f64,
    /// Downwind distances at or below this are treated as upwind (m)
    pub upwind_cutoff: f64,
    /// Smallest accepted Gaussian denominator
    pub min_denominator: f64,
    /// Concentrations below this are reported as no contribution (units/m³)
    pub detection_threshold: f64,
}

impl Default for ModelLimits {
    fn default() -> Self {
        Self {
            min_wind_speed: 0.5,
            min_sigma: 0.5,
            reference_height: 10.0,
            near_field_distance: 5.0,
            upwind_cutoff: 1.0,
            min_denominator: 1e-9,
            detection_threshold: 0.01,
        }
    }
}

/// σ = a·x^b
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLaw {
    pub a: f64,
    pub b: f64,
}

impl PowerLaw {
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.a * x.powf(self.b)
    }
}

/// Horizontal and vertical spread laws for one terrain family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmaCoefficients {
    pub sigma_y: ByStability<PowerLaw>,
    pub sigma_z: ByStability<PowerLaw>,
}

/// Open-country and built-up coefficient sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispersionCoefficients {
    pub open: SigmaCoefficients,
    pub urban: SigmaCoefficients,
    /// Suburban σ as a fraction of urban σ
    pub suburban_factor: f64,
    /// Downwind distance floor before applying the power laws (m)
    pub min_distance: f64,
}

impl Default for DispersionCoefficients {
    fn default() -> Self {
        const OPEN_SIGMA_Y_EXPONENT: f64 = 0.9;
        const URBAN_SIGMA_Y_EXPONENT: f64 = 0.71;

        let open_y = |a| PowerLaw::new(a, OPEN_SIGMA_Y_EXPONENT);
        let urban_y = |a| PowerLaw::new(a, URBAN_SIGMA_Y_EXPONENT);

        Self {
            open: SigmaCoefficients {
                sigma_y: ByStability::new(
                    open_y(0.22),
                    open_y(0.16),
                    open_y(0.11),
                    open_y(0.08),
                    open_y(0.06),
                    open_y(0.04),
                ),
                sigma_z: ByStability::new(
                    PowerLaw::new(0.20, 0.90),
                    PowerLaw::new(0.12, 0.90),
                    PowerLaw::new(0.08, 0.85),
                    PowerLaw::new(0.06, 0.80),
                    PowerLaw::new(0.03, 0.70),
                    PowerLaw::new(0.016, 0.65),
                ),
            },
            urban: SigmaCoefficients {
                sigma_y: ByStability::new(
                    urban_y(0.32),
                    urban_y(0.32),
                    urban_y(0.22),
                    urban_y(0.16),
                    urban_y(0.11),
                    urban_y(0.11),
                ),
                sigma_z: ByStability::new(
                    PowerLaw::new(0.24, 0.80),
                    PowerLaw::new(0.20, 0.75),
                    PowerLaw::new(0.14, 0.70),
                    PowerLaw::new(0.10, 0.65),
                    PowerLaw::new(0.08, 0.60),
                    PowerLaw::new(0.07, 0.55),
                ),
            },
            suburban_factor: 0.9,
            min_distance: 1.0,
        }
    }
}

/// Multipliers by inventory age class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeFactors {
    pub young: f64,
    pub mature: f64,
    pub old: f64,
}

impl AgeFactors {
    #[must_use]
    pub fn get(&self, age: AgeClass) -> f64 {
        match age {
            AgeClass::Young => self.young,
            AgeClass::Mature => self.mature,
            AgeClass::Old => self.old,
        }
    }
}

/// Multipliers by inventory health state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthFactors {
    pub healthy: f64,
    pub satisfactory: f64,
    pub unsatisfactory: f64,
    pub hazardous: f64,
}

impl HealthFactors {
    #[must_use]
    pub fn get(&self, health: HealthState) -> f64 {
        match health {
            HealthState::Healthy => self.healthy,
            HealthState::Satisfactory => self.satisfactory,
            HealthState::Unsatisfactory => self.unsatisfactory,
            HealthState::Hazardous => self.hazardous,
        }
    }
}

/// Release suppression in cold and hot air
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureFactors {
    pub cold_below: f64,
    pub cold_factor: f64,
    pub hot_above: f64,
    pub hot_factor: f64,
}

impl TemperatureFactors {
    #[must_use]
    pub fn factor(&self, celsius: f64) -> f64 {
        if celsius < self.cold_below {
            self.cold_factor
        } else if celsius > self.hot_above {
            self.hot_factor
        } else {
            1.0
        }
    }
}

/// Emission-rate multipliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionFactors {
    /// Precipitation above this stops release entirely (mm/h)
    pub rain_threshold: f64,
    /// Crown diameter giving a factor of 1.0 (m)
    pub reference_crown_diameter: f64,
    pub crown_exponent: f64,
    pub max_crown_factor: f64,
    /// Crown diameters are raised to at least this before scaling (m)
    pub min_crown_diameter: f64,
    pub age: AgeFactors,
    pub health: HealthFactors,
    /// Relative humidity bands, highest threshold first
    pub humidity: Vec<ThresholdFactor>,
    pub day_factor: f64,
    pub night_factor: f64,
    pub temperature: TemperatureFactors,
}

impl EmissionFactors {
    #[must_use]
    pub fn diurnal(&self, time_of_day: TimeOfDay) -> f64 {
        match time_of_day {
            TimeOfDay::Day => self.day_factor,
            TimeOfDay::Night => self.night_factor,
        }
    }
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            rain_threshold: 0.1,
            reference_crown_diameter: 5.0,
            crown_exponent: 1.2,
            max_crown_factor: 4.0,
            min_crown_diameter: 1.0,
            age: AgeFactors {
                young: 0.1,
                mature: 1.0,
                old: 0.6,
            },
            health: HealthFactors {
                healthy: 1.0,
                satisfactory: 0.7,
                unsatisfactory: 0.2,
                hazardous: 0.2,
            },
            humidity: vec![
                ThresholdFactor { above: 90.0, factor: 0.1 },
                ThresholdFactor { above: 80.0, factor: 0.5 },
                ThresholdFactor { above: 70.0, factor: 0.8 },
            ],
            day_factor: 1.0,
            night_factor: 0.2,
            temperature: TemperatureFactors {
                cold_below: 10.0,
                cold_factor: 0.5,
                hot_above: 30.0,
                hot_factor: 0.8,
            },
        }
    }
}

/// Dry-deposition source depletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositionParameters {
    /// Deposition velocity vd per terrain (m/s)
    pub velocity: ByTerrain<f64>,
    /// Empirical constant C in `exp(-C·vd·x / (u_H·H))`
    pub depletion_constant: f64,
    pub min_depletion: f64,
}

impl Default for DepositionParameters {
    fn default() -> Self {
        Self {
            velocity: ByTerrain {
                open: 0.01,
                suburban: 0.015,
                urban: 0.02,
            },
            depletion_constant: 0.8,
            min_depletion: 0.01,
        }
    }
}

/// Inclusive month range, wrapping past December when `end < start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloweringWindow {
    pub start_month: u32,
    pub end_month: u32,
}

impl FloweringWindow {
    pub const fn new(start_month: u32, end_month: u32) -> Self {
        Self {
            start_month,
            end_month,
        }
    }

    #[must_use]
    pub fn contains(&self, month: u32) -> bool {
        if self.start_month <= self.end_month {
            (self.start_month..=self.end_month).contains(&month)
        } else {
            month >= self.start_month || month <= self.end_month
        }
    }
}

/// Per-species emission, settling and default geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesTraits {
    /// Base emission rate before any factor (units/s)
    pub base_emission: f64,
    /// Terminal fall speed of the pollen grain (m/s)
    pub settling_velocity: f64,
    pub default_height: f64,
    pub default_crown_diameter: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flowering: Option<FloweringWindow>,
}

impl SpeciesTraits {
    const fn new(
        base_emission: f64,
        settling_velocity: f64,
        default_height: f64,
        default_crown_diameter: f64,
        flowering: Option<FloweringWindow>,
    ) -> Self {
        Self {
            base_emission,
            settling_velocity,
            default_height,
            default_crown_diameter,
            flowering,
        }
    }
}

/// A species table as written in a parameter file
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SpeciesOverride {
    base_emission: Option<f64>,
    settling_velocity: Option<f64>,
    default_height: Option<f64>,
    default_crown_diameter: Option<f64>,
    flowering: Option<FloweringWindow>,
}

impl SpeciesOverride {
    fn apply(self, traits: &mut SpeciesTraits) {
        if let Some(value) = self.base_emission {
            traits.base_emission = value;
        }
        if let Some(value) = self.settling_velocity {
            traits.settling_velocity = value;
        }
        if let Some(value) = self.default_height {
            traits.default_height = value;
        }
        if let Some(value) = self.default_crown_diameter {
            traits.default_crown_diameter = value;
        }
        if let Some(window) = self.flowering {
            traits.flowering = Some(window);
        }
    }
}

fn deserialize_species<'de, D>(deserializer: D) -> Result<BySpecies<SpeciesTraits>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = HashMap::<Species, SpeciesOverride>::deserialize(deserializer)?;
    let mut species = default_species();
    for (key, fields) in overrides {
        fields.apply(species.get_mut(key));
    }
    Ok(species)
}

impl Default for BySpecies<SpeciesTraits> {
    fn default() -> Self {
        default_species()
    }
}

fn default_species() -> BySpecies<SpeciesTraits> {
    let window = |start, end| Some(FloweringWindow::new(start, end));
    let fallback = SpeciesTraits::new(100.0, 0.02, 15.0, 6.0, None);

    BySpecies {
        birch: SpeciesTraits::new(500.0, 0.02, 15.0, 8.0, window(4, 5)),
        alder: SpeciesTraits {
            flowering: window(3, 4),
            ..fallback
        },
        hazel: SpeciesTraits {
            flowering: window(2, 4),
            ..fallback
        },
        oak: SpeciesTraits::new(400.0, 0.022, 20.0, 15.0, window(4, 6)),
        poplar: SpeciesTraits::new(300.0, 0.015, 25.0, 12.0, window(3, 5)),
        willow: SpeciesTraits::new(150.0, 0.018, 12.0, 7.0, window(3, 5)),
        ash: SpeciesTraits::new(250.0, 0.025, 18.0, 9.0, window(4, 5)),
        maple: SpeciesTraits::new(200.0, 0.03, 20.0, 10.0, window(4, 5)),
        elm: SpeciesTraits::new(180.0, 0.02, 16.0, 8.0, window(3, 5)),
        pine: SpeciesTraits::new(50.0, 0.03, 22.0, 6.0, None),
        spruce: SpeciesTraits::new(40.0, 0.035, 20.0, 5.0, None),
        larch: SpeciesTraits::new(60.0, 0.028, 25.0, 7.0, None),
        rowan: SpeciesTraits::new(120.0, 0.02, 10.0, 6.0, None),
        linden: SpeciesTraits::new(300.0, 0.02, 20.0, 12.0, None),
        other: fallback,
    }
}

fn default_wind_profile() -> ByTerrain<ByStability<f64>> {
    ByTerrain {
        open: ByStability::new(0.10, 0.15, 0.20, 0.25, 0.40, 0.60),
        suburban: ByStability::new(0.15, 0.15, 0.20, 0.25, 0.30, 0.30),
        urban: ByStability::new(0.15, 0.20, 0.25, 0.30, 0.40, 0.40),
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            version: DEFAULT_PARAMETER_VERSION.to_string(),
            limits: ModelLimits::default(),
            wind_profile: default_wind_profile(),
            dispersion: DispersionCoefficients::default(),
            emission: EmissionFactors::default(),
            deposition: DepositionParameters::default(),
            species: BySpecies::default(),
        }
    }
}

impl ModelParameters {
    /// Parse a (possibly partial) TOML parameter file and validate it.
    ///
    /// Tables missing from the file keep their built-in values.
    ///
    /// # Errors
    /// `ConfigParse` for malformed TOML, `InvalidParameters` if validation fails.
    pub fn from_toml_str(text: &str) -> DispersionResult<Self> {
        let params: ModelParameters = toml::from_str(text)?;
        if let Err(e) = params.validate() {
            warn!(version = %params.version, "Rejected parameter set: {}", e);
            return Err(e);
        }
        Ok(params)
    }

    /// Read and validate a parameter file.
    ///
    /// # Errors
    /// `ConfigRead` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> DispersionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML, e.g. to write out the defaults as a template.
    ///
    /// # Errors
    /// `InvalidParameters` if a value cannot be represented in TOML.
    pub fn to_toml_string(&self) -> DispersionResult<String> {
        toml::to_string_pretty(self).map_err(|e| DispersionError::InvalidParameters(e.to_string()))
    }

    /// Check that every value is finite and inside its usable range.
    ///
    /// # Errors
    /// `InvalidParameters` naming the first offending field.
    pub fn validate(&self) -> DispersionResult<()> {
        let limits = &self.limits;
        positive("limits.min_wind_speed", limits.min_wind_speed)?;
        positive("limits.min_sigma", limits.min_sigma)?;
        positive("limits.reference_height", limits.reference_height)?;
        non_negative("limits.near_field_distance", limits.near_field_distance)?;
        non_negative("limits.upwind_cutoff", limits.upwind_cutoff)?;
        positive("limits.min_denominator", limits.min_denominator)?;
        non_negative("limits.detection_threshold", limits.detection_threshold)?;

        for (terrain, table) in [
            ("open", &self.wind_profile.open),
            ("suburban", &self.wind_profile.suburban),
            ("urban", &self.wind_profile.urban),
        ] {
            for (class, p) in table.iter() {
                non_negative(&format!("wind_profile.{terrain}.{class}"), *p)?;
            }
        }

        let dispersion = &self.dispersion;
        for (family, coefficients) in [("open", &dispersion.open), ("urban", &dispersion.urban)] {
            for (axis, table) in [
                ("sigma_y", &coefficients.sigma_y),
                ("sigma_z", &coefficients.sigma_z),
            ] {
                for (class, law) in table.iter() {
                    positive(&format!("dispersion.{family}.{axis}.{class}.a"), law.a)?;
                    positive(&format!("dispersion.{family}.{axis}.{class}.b"), law.b)?;
                }
            }
        }
        positive("dispersion.suburban_factor", dispersion.suburban_factor)?;
        positive("dispersion.min_distance", dispersion.min_distance)?;

        let emission = &self.emission;
        non_negative("emission.rain_threshold", emission.rain_threshold)?;
        positive("emission.reference_crown_diameter", emission.reference_crown_diameter)?;
        non_negative("emission.crown_exponent", emission.crown_exponent)?;
        positive("emission.max_crown_factor", emission.max_crown_factor)?;
        positive("emission.min_crown_diameter", emission.min_crown_diameter)?;
        for (name, factor) in [
            ("emission.age.young", emission.age.young),
            ("emission.age.mature", emission.age.mature),
            ("emission.age.old", emission.age.old),
            ("emission.health.healthy", emission.health.healthy),
            ("emission.health.satisfactory", emission.health.satisfactory),
            ("emission.health.unsatisfactory", emission.health.unsatisfactory),
            ("emission.health.hazardous", emission.health.hazardous),
            ("emission.day_factor", emission.day_factor),
            ("emission.night_factor", emission.night_factor),
            ("emission.temperature.cold_factor", emission.temperature.cold_factor),
            ("emission.temperature.hot_factor", emission.temperature.hot_factor),
        ] {
            unit_factor(name, factor)?;
        }
        if emission.temperature.cold_below > emission.temperature.hot_above {
            return Err(DispersionError::InvalidParameters(
                "emission.temperature: cold_below must not exceed hot_above".to_string(),
            ));
        }
        for band in &emission.humidity {
            unit_factor("emission.humidity.factor", band.factor)?;
            finite("emission.humidity.above", band.above)?;
        }
        if emission.humidity.windows(2).any(|w| w[0].above <= w[1].above) {
            return Err(DispersionError::InvalidParameters(
                "emission.humidity bands must be sorted by descending threshold".to_string(),
            ));
        }

        let deposition = &self.deposition;
        for (terrain, vd) in [
            ("open", deposition.velocity.open),
            ("suburban", deposition.velocity.suburban),
            ("urban", deposition.velocity.urban),
        ] {
            non_negative(&format!("deposition.velocity.{terrain}"), vd)?;
        }
        non_negative("deposition.depletion_constant", deposition.depletion_constant)?;
        unit_factor("deposition.min_depletion", deposition.min_depletion)?;

        for (species, traits) in self.species.iter() {
            non_negative(&format!("species.{species}.base_emission"), traits.base_emission)?;
            non_negative(
                &format!("species.{species}.settling_velocity"),
                traits.settling_velocity,
            )?;
            positive(&format!("species.{species}.default_height"), traits.default_height)?;
            positive(
                &format!("species.{species}.default_crown_diameter"),
                traits.default_crown_diameter,
            )?;
            if let Some(window) = traits.flowering {
                let months = 1..=12;
                if !months.contains(&window.start_month) || !months.contains(&window.end_month) {
                    return Err(DispersionError::InvalidParameters(format!(
                        "species.{species}.flowering months must be within 1..=12"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Traits for `species`, falling back to the `other` record.
    #[must_use]
    pub fn species_traits(&self, species: Species) -> &SpeciesTraits {
        self.species.get(species)
    }

    /// Wind-profile exponent p.
    #[must_use]
    pub fn wind_exponent(&self, terrain: TerrainType, class: StabilityClass) -> f64 {
        *self.wind_profile.get(terrain).get(class)
    }
}

fn finite(field: &str, value: f64) -> DispersionResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DispersionError::InvalidParameters(format!("{field} must be finite, got {value}")))
    }
}

fn positive(field: &str, value: f64) -> DispersionResult<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(DispersionError::InvalidParameters(format!("{field} must be positive, got {value}")))
    }
}

fn non_negative(field: &str, value: f64) -> DispersionResult<()> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(DispersionError::InvalidParameters(format!(
            "{field} must be non-negative, got {value}"
        )))
    }
}

/// Multipliers may damp but never amplify.
fn unit_factor(field: &str, value: f64) -> DispersionResult<()> {
    non_negative(field, value)?;
    if value <= 1.0 {
        Ok(())
    } else {
        Err(DispersionError::InvalidParameters(format!(
            "{field} must be within [0, 1], got {value}"
        )))
    }
}
