//! Concentration solver
//!
//! [`DispersionModel`] orchestrates one source/target evaluation:
//!
//! 1. Calm wind or zero emission short-circuit to a zero result
//! 2. Stability class, wind-profile exponent and wind at source height
//! 3. Geodesic distance/bearing rotated into downwind/crosswind components
//! 4. Near-field estimate inside 5 m, zero for upwind targets
//! 5. σy/σz, deposition depletion, settled plume height
//! 6. Gaussian plume with ground reflection
//!
//! [`batch`] fans the same evaluation out over many sources and targets.
//!
//! # Example
//!
//! ```rust
//! use pollen_sim_core::core_types::{
//!     Celsius, Degrees, GeoPoint, InsolationCategory, MetersPerSecond, Percent, PollenSource,
//!     Species, TargetPoint, TerrainType, TimeOfDay, WeatherObservation,
//! };
//! use pollen_sim_core::DispersionModel;
//!
//! let model = DispersionModel::default();
//! let birch = PollenSource::new(Species::Birch, GeoPoint::new(55.01, 82.92))
//!     .with_dimensions(20.0, 10.0);
//! let target = TargetPoint::new(GeoPoint::new(55.01, 82.93));
//! let weather = WeatherObservation {
//!     wind_speed: MetersPerSecond::new(3.5),
//!     wind_direction: Degrees::new(270.0),
//!     temperature: Celsius::new(20.0),
//!     relative_humidity: Percent::new(50.0),
//!     precipitation_rate: 0.0,
//!     insolation: InsolationCategory::ModerateSolar,
//!     time_of_day: TimeOfDay::Day,
//! };
//!
//! let c = model.concentration(&birch, &target, &weather, TerrainType::Urban)?;
//! assert!(c > 0.0);
//! # Ok::<(), pollen_sim_core::DispersionError>(())
//! ```

pub mod batch;
mod gaussian;
mod model;
mod result;

pub use batch::{
    evaluate_contributions, plume_radius, severity_level, BatchOptions, Contribution, TargetGrid,
};
pub use gaussian::{gaussian_plume, near_source_estimate};
pub use model::{DispersionModel, SourceConditions};
pub use result::{ConcentrationResult, Outcome, PlumeDiagnostics, ZeroReason};
