//! Mealplan aggregation
//!
//! Planned items carry a caller-chosen serving size (in reference units)
//! keyed by external id instead of a logged membership.

use std::collections::HashMap;

use uuid::Uuid;

use super::aggregate::amount_in_containers;
use super::aliases::resolve_aliases;
use super::lookup::amount_for_food;
use super::units::PORTION_SIZE;
use crate::models::{ContainerRef, FoodNutrientRecord, Ingredient, Recipe};

/// Total of `nutrient_id` over the planned ingredients and recipes
///
/// Items missing from `quantities` are left out entirely. `None` when no
/// included item yielded a non-zero amount.
pub fn amount_in_mealplan(
    ingredients: &[Ingredient],
    recipes: &[Recipe],
    quantities: &HashMap<Uuid, f64>,
    records: &[FoodNutrientRecord],
    nutrient_id: i64,
    known_recipes: &[Recipe],
) -> Option<f64> {
    let aliases = resolve_aliases(nutrient_id);
    let mut total = None;
    let mut add = |serving_size: f64, amount: f64| {
        total = Some(total.unwrap_or(0.0) + serving_size * amount / PORTION_SIZE);
    };

    for ingredient in ingredients {
        let Some(&serving_size) = quantities.get(&ingredient.external_id) else {
            continue;
        };
        if let Some(amount) = amount_for_food(&ingredient.food_ref(), records, &aliases).filter(|a| *a != 0.0) {
            add(serving_size, amount);
        }
    }

    for recipe in recipes {
        let Some(&serving_size) = quantities.get(&recipe.external_id) else {
            continue;
        };
        let amount = amount_in_containers(&[ContainerRef::Recipe(recipe)], records, nutrient_id, known_recipes);
        if let Some(amount) = amount.filter(|a| *a != 0.0) {
            add(serving_size, amount);
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ENERGY_NUTRIENT_ID;
    use crate::nutrition::aggregate::fixtures::{ingredient, recipe};

    const EPSILON: f64 = 1e-9;

    fn planned_ingredient(id: i64) -> Ingredient {
        Ingredient {
            id,
            external_id: Uuid::new_v4(),
            user_id: 1,
            name: format!("Food {}", id),
            catalog_food_id: None,
            category_id: None,
            portions: Vec::new(),
        }
    }

    #[test]
    fn test_ingredients_and_recipes() {
        let food = planned_ingredient(10);
        let r = recipe(5, None, vec![(ingredient(10), 25.0)]);
        let records = vec![FoodNutrientRecord::user(10, ENERGY_NUTRIENT_ID, Some(8.0))];

        let quantities = HashMap::from([(food.external_id, 62.5), (r.external_id, 100.0)]);
        let total = amount_in_mealplan(
            std::slice::from_ref(&food),
            std::slice::from_ref(&r),
            &quantities,
            &records,
            ENERGY_NUTRIENT_ID,
            &[],
        );
        // 62.5 * 8 / 100 + 100 * (25 * 8 / 100) / 100
        assert!((total.unwrap() - 7.0).abs() < EPSILON);
    }

    #[test]
    fn test_items_without_quantity_are_excluded() {
        let planned = planned_ingredient(10);
        let unplanned = planned_ingredient(11);
        let records = vec![
            FoodNutrientRecord::user(10, ENERGY_NUTRIENT_ID, Some(50.0)),
            FoodNutrientRecord::user(11, ENERGY_NUTRIENT_ID, Some(1000.0)),
        ];
        let quantities = HashMap::from([(planned.external_id, 200.0)]);

        let total = amount_in_mealplan(
            &[planned, unplanned],
            &[],
            &quantities,
            &records,
            ENERGY_NUTRIENT_ID,
            &[],
        );
        assert!((total.unwrap() - 100.0).abs() < EPSILON);

        assert_eq!(
            amount_in_mealplan(&[], &[], &HashMap::new(), &records, ENERGY_NUTRIENT_ID, &[]),
            None
        );
    }
}
