//! Pollen sources, evaluation targets and terrain context

use crate::core_types::geo::GeoPoint;
use crate::error::{DispersionError, DispersionResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tree/plant species with a tabulated emission profile.
///
/// `Other` is the fallback record for anything the tables don't know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Birch,
    Alder,
    Hazel,
    Oak,
    Poplar,
    Willow,
    Ash,
    Maple,
    Elm,
    Pine,
    Spruce,
    Larch,
    Rowan,
    Linden,
    Other,
}

/// Name fragments per species, checked in this order. Broad fragments such
/// as "ель" and "ива" come last so they don't shadow longer names.
const SPECIES_ALIASES: &[(Species, &[&str])] = &[
    (Species::Birch, &["берез", "betula", "birch"]),
    (Species::Alder, &["ольх", "alnus", "alder"]),
    (Species::Hazel, &["орешник", "лещин", "corylus", "hazel"]),
    (Species::Oak, &["дуб", "quercus", "oak"]),
    (Species::Poplar, &["тополь", "populus", "poplar"]),
    (Species::Ash, &["ясен", "fraxinus", "ash"]),
    (Species::Maple, &["клен", "acer", "maple"]),
    (Species::Elm, &["вяз", "ulmus", "elm"]),
    (Species::Pine, &["сосн", "pinus", "pine"]),
    (Species::Larch, &["листвен", "larix", "larch"]),
    (Species::Rowan, &["рябин", "sorbus", "rowan"]),
    (Species::Linden, &["липа", "tilia", "linden"]),
    (Species::Spruce, &["ель", "picea", "spruce"]),
    (Species::Willow, &["ива", "salix", "willow"]),
];

impl Species {
    pub const ALL: [Species; 15] = [
        Species::Birch,
        Species::Alder,
        Species::Hazel,
        Species::Oak,
        Species::Poplar,
        Species::Willow,
        Species::Ash,
        Species::Maple,
        Species::Elm,
        Species::Pine,
        Species::Spruce,
        Species::Larch,
        Species::Rowan,
        Species::Linden,
        Species::Other,
    ];

    /// Resolve an inventory or report name ("Берёза повислая", "Acer platanoides").
    ///
    /// Matching is case-insensitive, treats `ё` as `е`, and looks for a known
    /// name fragment anywhere in the input. Unknown and empty names give `Other`.
    #[must_use]
    pub fn from_name(name: &str) -> Species {
        let normalized = name.trim().to_lowercase().replace('ё', "е");
        if normalized.is_empty() {
            return Species::Other;
        }

        SPECIES_ALIASES
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|alias| normalized.contains(alias)))
            .map_or(Species::Other, |(species, _)| *species)
    }

    /// Stable numeric id used across the C ABI: the position in [`Species::ALL`]
    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Species::id`]; unknown ids map to `Other`
    #[must_use]
    pub fn from_id(id: u8) -> Species {
        Species::ALL
            .get(usize::from(id))
            .copied()
            .unwrap_or(Species::Other)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Species::Birch => "birch",
            Species::Alder => "alder",
            Species::Hazel => "hazel",
            Species::Oak => "oak",
            Species::Poplar => "poplar",
            Species::Willow => "willow",
            Species::Ash => "ash",
            Species::Maple => "maple",
            Species::Elm => "elm",
            Species::Pine => "pine",
            Species::Spruce => "spruce",
            Species::Larch => "larch",
            Species::Rowan => "rowan",
            Species::Linden => "linden",
            Species::Other => "other",
        };
        f.write_str(name)
    }
}

/// Age category from the tree inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeClass {
    /// Young trees and saplings
    Young,
    #[default]
    Mature,
    /// Old and overmature trees
    Old,
}

impl AgeClass {
    /// Parse the inventory's free-text age group ("молодое", "саженец", "перестойное").
    #[must_use]
    pub fn from_inventory(text: &str) -> AgeClass {
        let lower = text.to_lowercase();
        if lower.contains("молод") || lower.contains("саженец") || lower.contains("young") {
            AgeClass::Young
        } else if lower.contains("стар") || lower.contains("перестойн") || lower.contains("old") {
            AgeClass::Old
        } else {
            AgeClass::Mature
        }
    }
}

/// Health state code from the tree inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// "ХОР"
    #[default]
    Healthy,
    /// "УД"
    Satisfactory,
    /// "НЕУД"
    Unsatisfactory,
    /// "АВАР"
    Hazardous,
}

impl HealthState {
    /// Parse an inventory state code. Unknown codes count as healthy.
    #[must_use]
    pub fn from_code(code: &str) -> HealthState {
        match code.trim().to_uppercase().as_str() {
            "УД" => HealthState::Satisfactory,
            "НЕУД" => HealthState::Unsatisfactory,
            "АВАР" => HealthState::Hazardous,
            _ => HealthState::Healthy,
        }
    }
}

/// Surface roughness context of the deployment region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    #[default]
    Open,
    Suburban,
    Urban,
}

impl TerrainType {
    /// Parse a terrain name; anything unrecognised is treated as open country.
    #[must_use]
    pub fn from_name(name: &str) -> TerrainType {
        match name.trim().to_lowercase().as_str() {
            "urban" => TerrainType::Urban,
            "suburban" => TerrainType::Suburban,
            _ => TerrainType::Open,
        }
    }

    /// Whether the built-up coefficient tables apply
    #[must_use]
    pub fn is_built_up(self) -> bool {
        matches!(self, TerrainType::Suburban | TerrainType::Urban)
    }
}

/// A single emitting plant, snapshotted for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollenSource {
    pub species: Species,
    pub location: GeoPoint,
    /// Physical height (m); `None` uses the species default
    pub height: Option<f64>,
    /// Crown diameter (m); `None` uses the species default
    pub crown_diameter: Option<f64>,
    pub age: AgeClass,
    pub health: HealthState,
}

impl PollenSource {
    /// A mature, healthy source with species-default dimensions.
    #[must_use]
    pub fn new(species: Species, location: GeoPoint) -> Self {
        Self {
            species,
            location,
            height: None,
            crown_diameter: None,
            age: AgeClass::default(),
            health: HealthState::default(),
        }
    }

    #[must_use]
    pub fn with_dimensions(mut self, height: f64, crown_diameter: f64) -> Self {
        self.height = Some(height);
        self.crown_diameter = Some(crown_diameter);
        self
    }

    #[must_use]
    pub fn with_condition(mut self, age: AgeClass, health: HealthState) -> Self {
        self.age = age;
        self.health = health;
        self
    }

    /// # Errors
    /// `MissingInput` / `InvalidCoordinate` for unusable coordinates or NaN dimensions.
    pub fn validate(&self) -> DispersionResult<()> {
        self.location.validate()?;
        if let Some(height) = self.height {
            DispersionError::require_finite("height", height)?;
        }
        if let Some(crown) = self.crown_diameter {
            DispersionError::require_finite("crown_diameter", crown)?;
        }
        Ok(())
    }
}

/// Loosely typed source row from the tree inventory or a user report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRecord {
    pub species: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub height: Option<f64>,
    pub crown_diameter: Option<f64>,
    pub age_group: Option<String>,
    pub state: Option<String>,
}

impl TryFrom<SourceRecord> for PollenSource {
    type Error = DispersionError;

    fn try_from(record: SourceRecord) -> Result<Self, Self::Error> {
        let species_name = record
            .species
            .ok_or(DispersionError::MissingInput { field: "species" })?;
        let latitude = record
            .latitude
            .ok_or(DispersionError::MissingInput { field: "latitude" })?;
        let longitude = record
            .longitude
            .ok_or(DispersionError::MissingInput { field: "longitude" })?;

        // Zero dimensions in inventory exports mean "not measured"
        let measured = |v: Option<f64>| v.filter(|x| *x > 0.0);

        let source = PollenSource {
            species: Species::from_name(&species_name),
            location: GeoPoint::new(latitude, longitude),
            height: measured(record.height),
            crown_diameter: measured(record.crown_diameter),
            age: record
                .age_group
                .as_deref()
                .map_or_else(AgeClass::default, AgeClass::from_inventory),
            health: record
                .state
                .as_deref()
                .map_or_else(HealthState::default, HealthState::from_code),
        };
        source.validate()?;
        Ok(source)
    }
}

/// Receptor location and height above ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPoint {
    pub location: GeoPoint,
    /// Evaluation height (m)
    pub height: f64,
}

impl TargetPoint {
    /// Human breathing height (m)
    pub const BREATHING_HEIGHT: f64 = 1.5;

    /// A target at breathing height.
    #[must_use]
    pub fn new(location: GeoPoint) -> Self {
        Self {
            location,
            height: Self::BREATHING_HEIGHT,
        }
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// # Errors
    /// `MissingInput` / `InvalidCoordinate` for unusable coordinates or height.
    pub fn validate(&self) -> DispersionResult<()> {
        self.location.validate()?;
        DispersionError::require_finite("target_height", self.height)?;
        Ok(())
    }
}
