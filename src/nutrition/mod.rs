//! Nutrition calculation module
//!
//! Alias resolution, per-food lookup and recursive aggregation over meals,
//! recipes, mealplans and day windows.

pub mod aggregate;
pub mod aliases;
pub mod lookup;
pub mod mealplan;
pub mod tracker;
pub mod units;

pub use aggregate::{
    amount_in_containers, reference_serving_size, try_amount_in_containers, AggregateError,
};
pub use aliases::{resolve_aliases, resolve_aliases_for_many};
pub use lookup::{
    amount_across_foods, amount_for, load_records_for_foods, merge_food_records,
    rank_foods_by_nutrient, recent_foods_for_nutrient, DEFAULT_MAX_ITEMS, DEFAULT_MAX_MEALS,
};
pub use mealplan::amount_in_mealplan;
pub use tracker::{amounts_per_day, tracker_amounts, DEFAULT_TRACKER_DAYS};
pub use units::{ServingSizeUnit, G_PER_OZ, ML_PER_FL_OZ, PORTION_SIZE};
