//! Data models
//!
//! Rust structs representing database entities, plus the loaders that hand
//! pre-fetched inputs to the nutrition core.

mod catalog_food;
mod container;
mod ingredient;
mod meal;
mod membership;
mod nutrient_record;
mod portion;
mod recipe;

pub use catalog_food::CatalogFood;
pub use container::{
    contents_of, ingredient_ids_for_parents, recipe_ids_for_parents, ContainerContents, ContainerRef,
};
pub use ingredient::{Ingredient, IngredientCreate};
pub use meal::{Meal, MealCreate};
pub use membership::{would_create_cycle, MemberChild, Membership, MembershipCreate, ParentKind};
pub use nutrient_record::{FoodNutrientRecord, FoodRef, RecordOwner};
pub use portion::{FoodPortion, PortionMeasure, PortionOwner};
pub use recipe::{Recipe, RecipeCreate};
