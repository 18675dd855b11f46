//! Food categories
//!
//! USDA food groups, plus the WWEIA survey categories some foods carry in
//! place of a food group.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Pseudo-category covering every food
pub const ALL_FOODS_CATEGORY_ID: i64 = 0;

/// A USDA food group ("0100" Dairy and Egg Products)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsdaFoodCategory {
    pub id: i64,
    /// Four-digit group code, absent for the all-foods pseudo-category
    pub code: Option<String>,
    pub description: String,
}

/// A WWEIA survey category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WweiaFoodCategory {
    pub id: i64,
    pub description: String,
}

/// A resolved category of either table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodCategory {
    Usda(&'static UsdaFoodCategory),
    Wweia(&'static WweiaFoodCategory),
}

impl FoodCategory {
    pub fn id(&self) -> i64 {
        match self {
            FoodCategory::Usda(c) => c.id,
            FoodCategory::Wweia(c) => c.id,
        }
    }

    pub fn description(&self) -> &'static str {
        match *self {
            FoodCategory::Usda(c) => &c.description,
            FoodCategory::Wweia(c) => &c.description,
        }
    }
}

#[derive(Deserialize)]
struct FoodCategoryDataFile {
    usda_food_categories: Vec<UsdaFoodCategory>,
    wweia_food_categories: Vec<WweiaFoodCategory>,
}

static FOOD_CATEGORIES_JSON: &str = include_str!("data/food_categories.json");

static DATA: LazyLock<FoodCategoryDataFile> = LazyLock::new(|| {
    serde_json::from_str(FOOD_CATEGORIES_JSON).expect("food_categories.json should be valid JSON")
});

pub fn usda_food_categories() -> &'static [UsdaFoodCategory] {
    &DATA.usda_food_categories
}

pub fn wweia_food_categories() -> &'static [WweiaFoodCategory] {
    &DATA.wweia_food_categories
}

/// Look up a category, trying USDA food groups before WWEIA categories
pub fn food_category(category_id: i64) -> Option<FoodCategory> {
    usda_food_categories()
        .iter()
        .find(|c| c.id == category_id)
        .map(FoodCategory::Usda)
        .or_else(|| {
            wweia_food_categories()
                .iter()
                .find(|c| c.id == category_id)
                .map(FoodCategory::Wweia)
        })
}

/// Category description for display
pub fn category_display_name(category_id: i64) -> Option<&'static str> {
    food_category(category_id).map(|c| c.description())
}

/// Selectable USDA food groups as `(id, description)`, sorted by description,
/// without the all-foods pseudo-category
pub fn category_choices() -> Vec<(i64, &'static str)> {
    let mut choices: Vec<(i64, &'static str)> = usda_food_categories()
        .iter()
        .filter(|c| c.id != ALL_FOODS_CATEGORY_ID)
        .map(|c| (c.id, c.description.as_str()))
        .collect();
    choices.sort_by(|a, b| a.1.cmp(b.1));
    choices
}
