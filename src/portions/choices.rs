//! Selectable portion choices
//!
//! A food's own portions, then its catalog food's portions, then three
//! synthetic defaults (100 units, 1 unit, one ounce).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::format::format_portion;
use crate::models::{CatalogFood, FoodPortion, Ingredient, Recipe};
use crate::nutrition::{ServingSizeUnit, PORTION_SIZE};

/// Non-persisted default portions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticPortion {
    Hundred,
    One,
    OneOunce,
}

impl SyntheticPortion {
    pub const ALL: [SyntheticPortion; 3] = [
        SyntheticPortion::Hundred,
        SyntheticPortion::One,
        SyntheticPortion::OneOunce,
    ];

    /// Negative id callers use to recognize a default choice
    pub fn sentinel_id(&self) -> i64 {
        match self {
            SyntheticPortion::Hundred => -1,
            SyntheticPortion::One => -2,
            SyntheticPortion::OneOunce => -3,
        }
    }

    pub fn from_sentinel_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.sentinel_id() == id)
    }

    /// Size in the canonical unit
    pub fn serving_size(&self, unit: ServingSizeUnit) -> f64 {
        match self {
            SyntheticPortion::Hundred => PORTION_SIZE,
            SyntheticPortion::One => 1.0,
            SyntheticPortion::OneOunce => unit.one_ounce(),
        }
    }

    pub fn display(&self, unit: ServingSizeUnit) -> String {
        match self {
            SyntheticPortion::Hundred => format!("100{}", unit.canonical_unit()),
            SyntheticPortion::One => format!("1{}", unit.canonical_unit()),
            SyntheticPortion::OneOunce => format!("1{}", unit.ounce_unit()),
        }
    }
}

/// Identity of a portion choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortionChoiceId {
    Portion(Uuid),
    Synthetic(SyntheticPortion),
}

/// A portion offered for selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionChoice {
    pub id: PortionChoiceId,
    /// Lowercased display string
    pub display: String,
    pub serving_size: f64,
    pub serving_size_unit: ServingSizeUnit,
    pub servings_per_container: Option<f64>,
    pub quantity: Option<f64>,
}

impl PortionChoice {
    fn from_portion(portion: &FoodPortion) -> Self {
        Self {
            id: PortionChoiceId::Portion(portion.external_id),
            display: format_portion(portion).to_lowercase(),
            serving_size: portion.serving_size(),
            serving_size_unit: portion.serving_size_unit(),
            servings_per_container: portion.servings_per_container,
            quantity: portion.quantity,
        }
    }

    fn synthetic(portion: SyntheticPortion, unit: ServingSizeUnit) -> Self {
        Self {
            id: PortionChoiceId::Synthetic(portion),
            display: portion.display(unit),
            serving_size: portion.serving_size(unit),
            serving_size_unit: unit,
            servings_per_container: None,
            quantity: None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self.id, PortionChoiceId::Synthetic(_))
    }
}

/// A food whose portions can be offered
#[derive(Debug, Clone, Copy)]
pub enum PortionedFood<'a> {
    Ingredient(&'a Ingredient),
    Recipe(&'a Recipe),
}

impl<'a> PortionedFood<'a> {
    pub fn portions(&self) -> &'a [FoodPortion] {
        match *self {
            PortionedFood::Ingredient(ingredient) => &ingredient.portions,
            PortionedFood::Recipe(recipe) => &recipe.portions,
        }
    }
}

/// Ordered portion choices for a food and its catalog food
///
/// Default choices take their unit from the first real choice, falling back
/// to weight.
pub fn display_choices_for(
    food: Option<PortionedFood<'_>>,
    catalog_food: Option<&CatalogFood>,
) -> Vec<PortionChoice> {
    let own = food.map(|f| f.portions()).unwrap_or_default();
    let catalog = catalog_food.map(|c| c.portions.as_slice()).unwrap_or_default();

    let mut choices: Vec<PortionChoice> = own
        .iter()
        .chain(catalog)
        .map(PortionChoice::from_portion)
        .filter(|c| !c.display.is_empty())
        .collect();

    let unit = choices
        .first()
        .map(|c| c.serving_size_unit)
        .unwrap_or_default();
    choices.extend(
        SyntheticPortion::ALL
            .into_iter()
            .map(|p| PortionChoice::synthetic(p, unit)),
    );

    choices
}
