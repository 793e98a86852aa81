//! Enum-keyed lookup records
//!
//! Each table has one named field per key, so adding a stability class,
//! terrain or species is a compile error until every table has an entry.

use crate::atmosphere::StabilityClass;
use crate::core_types::{Species, TerrainType};
use serde::{Deserialize, Serialize};

/// One value per Pasquill-Gifford class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ByStability<T> {
    pub a: T,
    pub b: T,
    pub c: T,
    pub d: T,
    pub e: T,
    pub f: T,
}

impl<T> ByStability<T> {
    pub const fn new(a: T, b: T, c: T, d: T, e: T, f: T) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[must_use]
    pub fn get(&self, class: StabilityClass) -> &T {
        match class {
            StabilityClass::A => &self.a,
            StabilityClass::B => &self.b,
            StabilityClass::C => &self.c,
            StabilityClass::D => &self.d,
            StabilityClass::E => &self.e,
            StabilityClass::F => &self.f,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StabilityClass, &T)> {
        StabilityClass::ALL.into_iter().map(move |class| (class, self.get(class)))
    }
}

/// One value per terrain type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ByTerrain<T> {
    pub open: T,
    pub suburban: T,
    pub urban: T,
}

impl<T> ByTerrain<T> {
    #[must_use]
    pub fn get(&self, terrain: TerrainType) -> &T {
        match terrain {
            TerrainType::Open => &self.open,
            TerrainType::Suburban => &self.suburban,
            TerrainType::Urban => &self.urban,
        }
    }
}

/// One record per tabulated species; `other` is the fallback entry.
///
/// Species missing from a parameter file keep their built-in record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de>, BySpecies<T>: Default"))]
pub struct BySpecies<T> {
    pub birch: T,
    pub alder: T,
    pub hazel: T,
    pub oak: T,
    pub poplar: T,
    pub willow: T,
    pub ash: T,
    pub maple: T,
    pub elm: T,
    pub pine: T,
    pub spruce: T,
    pub larch: T,
    pub rowan: T,
    pub linden: T,
    pub other: T,
}

impl<T> BySpecies<T> {
    #[must_use]
    pub fn get(&self, species: Species) -> &T {
        match species {
            Species::Birch => &self.birch,
            Species::Alder => &self.alder,
            Species::Hazel => &self.hazel,
            Species::Oak => &self.oak,
            Species::Poplar => &self.poplar,
            Species::Willow => &self.willow,
            Species::Ash => &self.ash,
            Species::Maple => &self.maple,
            Species::Elm => &self.elm,
            Species::Pine => &self.pine,
            Species::Spruce => &self.spruce,
            Species::Larch => &self.larch,
            Species::Rowan => &self.rowan,
            Species::Linden => &self.linden,
            Species::Other => &self.other,
        }
    }

    pub fn get_mut(&mut self, species: Species) -> &mut T {
        match species {
            Species::Birch => &mut self.birch,
            Species::Alder => &mut self.alder,
            Species::Hazel => &mut self.hazel,
            Species::Oak => &mut self.oak,
            Species::Poplar => &mut self.poplar,
            Species::Willow => &mut self.willow,
            Species::Ash => &mut self.ash,
            Species::Maple => &mut self.maple,
            Species::Elm => &mut self.elm,
            Species::Pine => &mut self.pine,
            Species::Spruce => &mut self.spruce,
            Species::Larch => &mut self.larch,
            Species::Rowan => &mut self.rowan,
            Species::Linden => &mut self.linden,
            Species::Other => &mut self.other,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Species, &T)> {
        Species::ALL.into_iter().map(move |species| (species, self.get(species)))
    }
}

/// A step factor applied when a value exceeds `above`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdFactor {
    pub above: f64,
    pub factor: f64,
}

/// First matching band wins; bands must be sorted by descending `above`.
#[must_use]
pub fn step_factor(bands: &[ThresholdFactor], value: f64) -> f64 {
    bands
        .iter()
        .find(|band| value > band.above)
        .map_or(1.0, |band| band.factor)
}
