//! Household measure units
//!
//! USDA measure unit table used to name portions ("cup", "tbsp", ...).

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Unit id USDA uses when the measure could not be determined
pub const UNDETERMINED_MEASURE_UNIT_ID: i64 = 9999;

/// A household measure unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureUnit {
    pub id: i64,
    pub name: String,
    /// Short form, empty when the unit has none
    pub abbreviation: String,
}

impl MeasureUnit {
    /// Abbreviation if present, else the full name
    pub fn display_name(&self) -> &str {
        if self.abbreviation.is_empty() {
            &self.name
        } else {
            &self.abbreviation
        }
    }
}

#[derive(Deserialize)]
struct MeasureUnitDataFile {
    measure_units: Vec<MeasureUnit>,
}

static MEASURE_UNITS_JSON: &str = include_str!("data/measure_units.json");

static DATA: LazyLock<MeasureUnitDataFile> = LazyLock::new(|| {
    serde_json::from_str(MEASURE_UNITS_JSON).expect("measure_units.json should be valid JSON")
});

pub fn all_measure_units() -> &'static [MeasureUnit] {
    &DATA.measure_units
}

pub fn measure_unit(id: i64) -> Option<&'static MeasureUnit> {
    all_measure_units().iter().find(|m| m.id == id)
}

pub fn measure_unit_by_name(name: &str) -> Option<&'static MeasureUnit> {
    all_measure_units().iter().find(|m| m.name == name)
}

pub fn measure_units_sorted_by_name() -> Vec<&'static MeasureUnit> {
    let mut units: Vec<_> = all_measure_units().iter().collect();
    units.sort_by(|a, b| a.name.cmp(&b.name));
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_unit_by_id() {
        assert_eq!(measure_unit(1000).map(|m| m.name.as_str()), Some("cup"));
        assert!(measure_unit(102312321).is_none());
    }

    #[test]
    fn test_measure_unit_by_name() {
        assert_eq!(measure_unit_by_name("cup").map(|m| m.id), Some(1000));
        assert!(measure_unit_by_name("unknown").is_none());
    }

    #[test]
    fn test_display_name_prefers_abbreviation() {
        assert_eq!(measure_unit(1001).unwrap().display_name(), "tbsp");
        assert_eq!(measure_unit(1000).unwrap().display_name(), "cup");
    }

    #[test]
    fn test_sorted_by_name() {
        let sorted = measure_units_sorted_by_name();
        assert_eq!(sorted.len(), all_measure_units().len());
        assert!(sorted.windows(2).all(|w| w[0].name <= w[1].name));
    }

    #[test]
    fn test_undetermined_present() {
        assert!(measure_unit(UNDETERMINED_MEASURE_UNIT_ID).is_some());
    }
}
