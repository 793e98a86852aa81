//! Source-side physics for pollen transport
//!
//! - Emission rate from species, crown size, tree condition and weather
//! - Dry-deposition depletion of the source strength along the plume
//! - Gravitational settling of the plume centreline
//!
//! # Scientific References
//! - Sofiev, M. et al. (2013). "A numerical model of birch pollen emission and
//!   dispersion in the atmosphere." Int. J. Biometeorology, 57, 45-58
//! - Horst, T.W. (1977). "A surface depletion model for deposition from a
//!   Gaussian plume." Atmospheric Environment, 11, 41-46
//! - Csanady, G.T. (1973). "Turbulent Diffusion in the Environment", ch. 8
//!   (tilted plume approximation)

pub(crate) mod deposition;
pub(crate) mod emission;
pub(crate) mod settling;

pub use deposition::{deposition_velocity, depletion_factor};
pub use emission::{crown_factor, emission_rate, SourceGeometry};
pub use settling::effective_plume_height;
