//! Flowering calendar
//!
//! Species with a tabulated window only shed pollen inside it. Species
//! without one are assumed to be flowering, so an incomplete calendar never
//! hides a source.

use crate::core_types::Species;
use crate::error::{DispersionError, DispersionResult};
use crate::params::ModelParameters;

/// Accept calendar months 1-12.
///
/// # Errors
/// `InvalidParameters` for any other value.
pub fn validate_month(month: u32) -> DispersionResult<u32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(DispersionError::InvalidParameters(format!(
            "month {month} outside 1..=12"
        )))
    }
}

/// Whether `species` sheds pollen in `month`.
#[must_use]
pub fn is_flowering(params: &ModelParameters, species: Species, month: u32) -> bool {
    params
        .species_traits(species)
        .flowering
        .is_none_or(|window| window.contains(month))
}

/// All species flowering in `month`, in table order.
#[must_use]
pub fn flowering_species(params: &ModelParameters, month: u32) -> Vec<Species> {
    Species::ALL
        .into_iter()
        .filter(|species| is_flowering(params, *species, month))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birch_season() {
        let params = ModelParameters::default();
        assert!(!is_flowering(&params, Species::Birch, 3));
        assert!(is_flowering(&params, Species::Birch, 4));
        assert!(is_flowering(&params, Species::Birch, 5));
        assert!(!is_flowering(&params, Species::Birch, 6));
    }

    #[test]
    fn test_hazel_is_earliest() {
        let params = ModelParameters::default();
        let february = flowering_species(&params, 2);
        assert!(february.contains(&Species::Hazel));
        assert!(!february.contains(&Species::Birch));
    }

    #[test]
    fn test_species_without_window_always_flower() {
        let params = ModelParameters::default();
        for month in 1..=12 {
            assert!(is_flowering(&params, Species::Pine, month));
            assert!(is_flowering(&params, Species::Other, month));
        }
    }

    #[test]
    fn test_month_validation() {
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
        assert_eq!(validate_month(7).ok(), Some(7));
    }
}
