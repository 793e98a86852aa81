//! Pollen Dispersion Core Library
//!
//! Estimates airborne pollen concentration downwind of a single tree or
//! reported plant with a parametrised Gaussian plume model:
//! Pasquill-Gifford stability classification, a power-law wind profile,
//! terrain-dependent spread coefficients, emission-rate estimation from
//! species and tree condition, dry-deposition source depletion and a
//! settling-tilted plume centreline.
//!
//! The engine is a pure function of its inputs. It never sums contributions
//! from several sources; [`solver::batch`] returns them per source/target
//! pair for the caller to aggregate.
//!
//! All empirical constants live in a versioned [`ModelParameters`] set that
//! can be loaded from TOML. The built-in values are uncalibrated placeholders.

// Error handling
pub mod error;

// Input records, units and geodesy
pub mod core_types;

// Empirical tables and limits
pub mod params;

// Meteorology and source physics
pub mod atmosphere;
pub mod phenology;
pub mod physics;

// Orchestration
pub mod solver;

pub use error::{DispersionError, DispersionResult};

pub use core_types::{
    AgeClass, GeoPoint, HealthState, InsolationCategory, PollenSource, SourceRecord, Species,
    TargetPoint, TerrainType, TimeOfDay, WeatherObservation, WeatherRecord,
};
pub use params::ModelParameters;

pub use atmosphere::StabilityClass;
pub use solver::{
    evaluate_contributions, BatchOptions, ConcentrationResult, Contribution, DispersionModel,
    Outcome, TargetGrid, ZeroReason,
};
