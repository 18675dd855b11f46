//! FDA reference daily intakes

use serde::Serialize;

use super::nutrients::*;

/// Whether an intake target is a floor or a ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    MinValue,
    MaxValue,
}

/// FDA reference daily intake for one nutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FdaNutrientRdi {
    pub nutrient_id: i64,
    /// Adults and children >= 4 years
    pub adult: Option<f64>,
    /// Infants through 12 months
    pub infant: Option<f64>,
    /// Children 1 through 3 years
    pub children: Option<f64>,
    /// Pregnant and lactating women
    pub pregnant: Option<f64>,
    pub threshold: Threshold,
}

const fn rdi(
    nutrient_id: i64,
    adult: f64,
    infant: Option<f64>,
    children: f64,
    pregnant: f64,
    threshold: Threshold,
) -> FdaNutrientRdi {
    FdaNutrientRdi {
        nutrient_id,
        adult: Some(adult),
        infant,
        children: Some(children),
        pregnant: Some(pregnant),
        threshold,
    }
}

use Threshold::{MaxValue, MinValue};

// Macros: 21 CFR 101.9; vitamins and minerals: FDA daily value tables
pub static FDA_NUTRIENT_RDIS: &[FdaNutrientRdi] = &[
    rdi(ENERGY_NUTRIENT_ID, 2000.0, Some(1000.0), 1000.0, 2000.0, MaxValue),
    rdi(PROTEIN_NUTRIENT_ID, 50.0, Some(11.0), 13.0, 71.0, MinValue),
    rdi(FAT_NUTRIENT_ID, 78.0, Some(30.0), 39.0, 78.0, MinValue),
    rdi(CARBOHYDRATE_NUTRIENT_ID, 275.0, Some(95.0), 150.0, 275.0, MaxValue),
    rdi(TOTAL_FIBER_NUTRIENT_ID, 28.0, None, 14.0, 28.0, MinValue),
    rdi(ADDED_SUGARS_NUTRIENT_ID, 50.0, None, 25.0, 50.0, MaxValue),
    rdi(SATURATED_FAT_NUTRIENT_ID, 20.0, None, 10.0, 20.0, MaxValue),
    rdi(CHOLESTEROL_NUTRIENT_ID, 300.0, None, 300.0, 300.0, MaxValue),
    rdi(SODIUM_NUTRIENT_ID, 2300.0, Some(570.0), 1500.0, 2300.0, MaxValue),
    rdi(VITAMIN_D_NUTRIENT_ID, 20.0, Some(10.0), 15.0, 15.0, MinValue),
    rdi(CALCIUM_NUTRIENT_ID, 1300.0, Some(260.0), 700.0, 1300.0, MinValue),
    rdi(IRON_NUTRIENT_ID, 18.0, Some(11.0), 7.0, 27.0, MinValue),
    rdi(POTASSIUM_NUTRIENT_ID, 4700.0, Some(700.0), 3000.0, 5100.0, MinValue),
    rdi(VITAMIN_A_NUTRIENT_ID, 900.0, Some(500.0), 300.0, 1300.0, MinValue),
    rdi(VITAMIN_C_NUTRIENT_ID, 90.0, Some(50.0), 15.0, 120.0, MinValue),
    rdi(VITAMIN_E_NUTRIENT_ID, 15.0, Some(5.0), 6.0, 19.0, MinValue),
    rdi(VITAMIN_K_NUTRIENT_ID, 120.0, Some(2.5), 30.0, 90.0, MinValue),
    rdi(THIAMIN_NUTRIENT_ID, 1.2, Some(0.3), 0.5, 1.4, MinValue),
    rdi(RIBOFLAVIN_NUTRIENT_ID, 1.3, Some(0.4), 0.5, 1.6, MinValue),
    rdi(NIACIN_NUTRIENT_ID, 16.0, Some(4.0), 6.0, 18.0, MinValue),
    rdi(VITAMIN_B6_NUTRIENT_ID, 1.7, Some(0.3), 0.5, 2.0, MinValue),
    rdi(FOLATE_NUTRIENT_ID, 400.0, Some(80.0), 150.0, 600.0, MinValue),
    rdi(VITAMIN_B12_NUTRIENT_ID, 2.4, Some(0.5), 0.9, 2.8, MinValue),
    rdi(BIOTIN_NUTRIENT_ID, 30.0, Some(6.0), 8.0, 35.0, MinValue),
    rdi(PANTOTHENIC_ACID_NUTRIENT_ID, 5.0, Some(1.8), 2.0, 7.0, MinValue),
    rdi(PHOSPHORUS_NUTRIENT_ID, 1250.0, Some(275.0), 460.0, 1250.0, MinValue),
    rdi(IODINE_NUTRIENT_ID, 150.0, Some(130.0), 90.0, 290.0, MinValue),
    rdi(MAGNESIUM_NUTRIENT_ID, 420.0, Some(75.0), 80.0, 400.0, MinValue),
    rdi(ZINC_NUTRIENT_ID, 11.0, Some(3.0), 3.0, 13.0, MinValue),
    rdi(SELENIUM_NUTRIENT_ID, 55.0, Some(20.0), 20.0, 70.0, MinValue),
    rdi(COPPER_NUTRIENT_ID, 0.9, Some(0.2), 0.3, 1.3, MinValue),
    rdi(MANGANESE_NUTRIENT_ID, 2.3, Some(0.6), 1.2, 2.6, MinValue),
    rdi(CHROMIUM_NUTRIENT_ID, 35.0, Some(5.5), 11.0, 45.0, MinValue),
    rdi(MOLYBDENUM_NUTRIENT_ID, 45.0, Some(3.0), 17.0, 50.0, MinValue),
    rdi(CHOLINE_NUTRIENT_ID, 550.0, Some(150.0), 200.0, 550.0, MinValue),
];

pub fn fda_rdi(nutrient_id: i64) -> Option<&'static FdaNutrientRdi> {
    FDA_NUTRIENT_RDIS.iter().find(|r| r.nutrient_id == nutrient_id)
}

/// Daily target for a nutrient; a user-set threshold wins over the adult RDI
pub fn rdi_amount(user_threshold: Option<f64>, nutrient_id: i64) -> Option<f64> {
    if let Some(threshold) = user_threshold.filter(|t| *t != 0.0) {
        return Some(threshold);
    }

    fda_rdi(nutrient_id).and_then(|r| r.adult)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fda_rdi() {
        assert_eq!(fda_rdi(ENERGY_NUTRIENT_ID).and_then(|r| r.adult), Some(2000.0));
        assert!(fda_rdi(11001100).is_none());
    }

    #[test]
    fn test_rdi_amount_default() {
        assert_eq!(rdi_amount(None, ENERGY_NUTRIENT_ID), Some(2000.0));
        assert_eq!(rdi_amount(None, FAT_NUTRIENT_ID), Some(78.0));
    }

    #[test]
    fn test_rdi_amount_user_threshold() {
        assert_eq!(rdi_amount(Some(1000.0), ENERGY_NUTRIENT_ID), Some(1000.0));
        // Zero threshold falls back to the FDA value
        assert_eq!(rdi_amount(Some(0.0), ENERGY_NUTRIENT_ID), Some(2000.0));
    }

    #[test]
    fn test_rdi_amount_unknown() {
        assert_eq!(rdi_amount(None, 11001100), None);
    }
}
