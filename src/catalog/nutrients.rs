//! Nutrient definitions
//!
//! USDA nutrient reference table, equivalence classes and unit display names.
//! Data is embedded at compile time and parsed once on first access.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

pub const ENERGY_NUTRIENT_ID: i64 = 1008;
pub const PROTEIN_NUTRIENT_ID: i64 = 1003;
pub const FAT_NUTRIENT_ID: i64 = 1004;
pub const CARBOHYDRATE_NUTRIENT_ID: i64 = 1005;
pub const TOTAL_FIBER_NUTRIENT_ID: i64 = 1079;
pub const CALCIUM_NUTRIENT_ID: i64 = 1087;
pub const IRON_NUTRIENT_ID: i64 = 1089;
pub const MAGNESIUM_NUTRIENT_ID: i64 = 1090;
pub const PHOSPHORUS_NUTRIENT_ID: i64 = 1091;
pub const POTASSIUM_NUTRIENT_ID: i64 = 1092;
pub const SODIUM_NUTRIENT_ID: i64 = 1093;
pub const ZINC_NUTRIENT_ID: i64 = 1095;
pub const CHROMIUM_NUTRIENT_ID: i64 = 1096;
pub const COPPER_NUTRIENT_ID: i64 = 1098;
pub const IODINE_NUTRIENT_ID: i64 = 1100;
pub const MANGANESE_NUTRIENT_ID: i64 = 1101;
pub const MOLYBDENUM_NUTRIENT_ID: i64 = 1102;
pub const SELENIUM_NUTRIENT_ID: i64 = 1103;
pub const VITAMIN_A_NUTRIENT_ID: i64 = 1106;
pub const VITAMIN_E_NUTRIENT_ID: i64 = 1109;
pub const VITAMIN_D_NUTRIENT_ID: i64 = 1114;
pub const VITAMIN_C_NUTRIENT_ID: i64 = 1162;
pub const THIAMIN_NUTRIENT_ID: i64 = 1165;
pub const RIBOFLAVIN_NUTRIENT_ID: i64 = 1166;
pub const NIACIN_NUTRIENT_ID: i64 = 1167;
pub const PANTOTHENIC_ACID_NUTRIENT_ID: i64 = 1170;
pub const VITAMIN_B6_NUTRIENT_ID: i64 = 1175;
pub const BIOTIN_NUTRIENT_ID: i64 = 1176;
pub const VITAMIN_B12_NUTRIENT_ID: i64 = 1178;
pub const CHOLINE_NUTRIENT_ID: i64 = 1180;
pub const VITAMIN_K_NUTRIENT_ID: i64 = 1185;
pub const FOLATE_NUTRIENT_ID: i64 = 1190;
pub const CHOLESTEROL_NUTRIENT_ID: i64 = 1253;
pub const ADDED_SUGARS_NUTRIENT_ID: i64 = 1235;
pub const SATURATED_FAT_NUTRIENT_ID: i64 = 1258;

/// A USDA nutrient definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientDefinition {
    pub id: i64,
    pub name: String,
    /// Stored unit code, e.g. "G", "MG", "UG", "KCAL"
    pub unit_name: String,
    /// Historical nutrient number ("208"), may be empty or non-integer ("205.2")
    pub legacy_number: String,
    pub rank: Option<i64>,
    pub display_name: String,
}

impl NutrientDefinition {
    /// The legacy number as an integer id, if it is one
    pub fn legacy_id(&self) -> Option<i64> {
        if self.legacy_number.is_empty() || !self.legacy_number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.legacy_number.parse().ok()
    }
}

/// A set of nutrient ids declared interchangeable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquivalenceClass(Vec<i64>);

impl EquivalenceClass {
    pub fn contains(&self, nutrient_id: i64) -> bool {
        self.0.contains(&nutrient_id)
    }

    /// Member ids in declaration order
    pub fn members(&self) -> &[i64] {
        &self.0
    }
}

#[derive(Deserialize)]
struct NutrientDataFile {
    nutrients: Vec<NutrientDefinition>,
    equivalence_classes: Vec<EquivalenceClass>,
    alternate_unit_names: HashMap<String, String>,
}

static NUTRIENTS_JSON: &str = include_str!("data/nutrients.json");

static DATA: LazyLock<NutrientDataFile> = LazyLock::new(|| {
    serde_json::from_str(NUTRIENTS_JSON).expect("nutrients.json should be valid JSON")
});

/// All nutrient definitions, in table order
pub fn all_nutrients() -> &'static [NutrientDefinition] {
    &DATA.nutrients
}

/// All equivalence classes
pub fn equivalence_classes() -> &'static [EquivalenceClass] {
    &DATA.equivalence_classes
}

/// Look up a nutrient by id, falling back to its legacy number
pub fn nutrient(nutrient_id: i64) -> Option<&'static NutrientDefinition> {
    let nutrients = all_nutrients();
    if let Some(found) = nutrients.iter().find(|n| n.id == nutrient_id) {
        return Some(found);
    }

    let legacy = nutrient_id.to_string();
    nutrients.iter().find(|n| n.legacy_number == legacy)
}

/// Definitions for every known id, unknown ids skipped
pub fn nutrients(nutrient_ids: &[i64]) -> Vec<&'static NutrientDefinition> {
    nutrient_ids.iter().filter_map(|&id| nutrient(id)).collect()
}

/// Definitions ordered by display rank, unranked nutrients last
pub fn nutrients_by_rank() -> Vec<&'static NutrientDefinition> {
    let mut sorted: Vec<_> = all_nutrients().iter().collect();
    sorted.sort_by_key(|n| (n.rank.is_none(), n.rank.unwrap_or(0), n.id));
    sorted
}

/// Display name for a nutrient
pub fn display_name(nutrient_id: i64) -> Option<&'static str> {
    nutrient(nutrient_id).map(|n| n.display_name.as_str())
}

/// Translate a stored unit code to its display form ("UG" -> "MCG")
pub fn translate_unit_name(unit_name: &str) -> &str {
    DATA.alternate_unit_names
        .get(unit_name)
        .map(String::as_str)
        .unwrap_or(unit_name)
}

/// Lowercased display unit for a nutrient, empty when unknown
pub fn display_unit(nutrient_id: i64) -> String {
    match nutrient(nutrient_id) {
        Some(n) if !n.unit_name.is_empty() => translate_unit_name(&n.unit_name).to_lowercase(),
        _ => String::new(),
    }
}
