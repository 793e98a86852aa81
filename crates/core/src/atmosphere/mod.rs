//! Near-surface meteorology for plume transport.
//!
//! This module turns a surface weather observation into the quantities the
//! Gaussian plume needs:
//! - Pasquill-Gifford stability class from wind speed and insolation
//! - Wind speed at source height from a power-law profile
//! - Horizontal and vertical plume spread (σy, σz) by terrain family
//!
//! # Scientific Background
//!
//! Turbulent mixing in the surface layer is driven by solar heating by day and
//! suppressed by radiative cooling on clear nights. The Pasquill-Gifford scheme
//! bins that behaviour into six classes, from very unstable (A) to very stable
//! (F). Spread coefficients grow as power laws of downwind distance, faster over
//! rough built-up terrain where buildings add mechanical turbulence.
//!
//! # References
//!
//! - Pasquill, F. (1961). "The estimation of the dispersion of windborne material."
//!   Meteorological Magazine, 90, 33-49.
//! - Briggs, G.A. (1973). "Diffusion estimation for small emissions." ATDL-106, NOAA.
//! - Irwin, J.S. (1979). "A theoretical variation of the wind profile power-law
//!   exponent as a function of surface roughness and stability." Atmos. Env. 13.

mod dispersion;
mod stability;
mod wind_profile;

pub use dispersion::{dispersion_coefficients, Sigmas};
pub use stability::{classify_stability, StabilityClass};
pub use wind_profile::{wind_profile_exponent, wind_speed_at_height};
