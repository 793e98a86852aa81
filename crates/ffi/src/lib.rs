//! C ABI for the pollen dispersion engine
//!
//! Functions return a [`PollenSimErrorCode`]; on failure the message is
//! available from `pollen_sim_get_last_error()` on the same thread. A zero
//! concentration is a successful result.

mod error;
mod evaluate;
mod helpers;
mod instance;

pub use error::{pollen_sim_get_last_error, pollen_sim_get_last_error_code, PollenSimErrorCode};
pub use evaluate::{
    pollen_sim_concentration, pollen_sim_evaluate, pollen_sim_severity_level,
    pollen_sim_species_from_name, ConcentrationFfi, OutcomeCode, PollenSourceFfi, TargetFfi,
    WeatherFfi, POLLEN_SIM_NO_STABILITY,
};
pub use instance::{pollen_sim_destroy, pollen_sim_new, pollen_sim_new_from_file, PollenSimInstance};
