//! Nourish Library
//!
//! Nutrient alias resolution, portion display and recursive aggregation over
//! foods, recipes, meals and mealplans, backed by SQLite.

pub mod catalog;
pub mod db;
pub mod models;
pub mod nutrition;
pub mod portions;
