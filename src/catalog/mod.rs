//! Static reference catalog
//!
//! Process-wide, read-only tables: nutrients, food categories, measure units
//! and FDA intakes.

pub mod food_categories;
pub mod measure_units;
pub mod nutrients;
pub mod rdi;

pub use food_categories::{
    category_choices, category_display_name, food_category, FoodCategory, ALL_FOODS_CATEGORY_ID,
};
pub use measure_units::{
    measure_unit, measure_unit_by_name, measure_units_sorted_by_name, MeasureUnit,
    UNDETERMINED_MEASURE_UNIT_ID,
};
pub use nutrients::{
    display_name, display_unit, equivalence_classes, nutrient, nutrients, nutrients_by_rank,
    translate_unit_name, EquivalenceClass, NutrientDefinition, ENERGY_NUTRIENT_ID,
    FAT_NUTRIENT_ID, PROTEIN_NUTRIENT_ID,
};
pub use rdi::{fda_rdi, rdi_amount, FdaNutrientRdi, Threshold};
