//! Core types: units, geodesy and the input records of one evaluation

pub mod geo;
pub mod source;
pub mod units;
pub mod weather;

pub use geo::{GeoPoint, PlumeOffset, EARTH_RADIUS_METERS};
pub use source::{
    AgeClass, HealthState, PollenSource, SourceRecord, Species, TargetPoint, TerrainType,
};
pub use units::*;
pub use weather::{InsolationCategory, TimeOfDay, WeatherObservation, WeatherRecord};
