//! Recursive container aggregation
//!
//! Totals a nutrient over meals and recipes. Every stored amount is per
//! reference quantity, so each child's contribution is rescaled by how much of
//! it was logged relative to the container's own reference serving:
//!
//! ```text
//! contribution = logged_serving_size * child_amount / container_reference_size
//! ```
//!
//! All inputs are pre-fetched. Nested recipes must be present in
//! `known_recipes` or their contribution is dropped.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::aliases::resolve_aliases;
use super::lookup::amount_for_food;
use super::units::PORTION_SIZE;
use crate::models::{ContainerRef, FoodNutrientRecord, MemberChild, Recipe};

/// Aggregation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Recipe {recipe_id} contains itself through nested recipes")]
    RecipeCycle { recipe_id: i64 },
}

/// Reference serving a container's members are expressed against
pub fn reference_serving_size(container: &ContainerRef<'_>) -> f64 {
    container
        .portions()
        .first()
        .map(|p| p.serving_size())
        .unwrap_or(PORTION_SIZE)
}

struct Aggregator<'a> {
    records: &'a [FoodNutrientRecord],
    aliases: Vec<i64>,
    recipes: HashMap<i64, &'a Recipe>,
    /// Recipes on the current descent path
    path: HashSet<i64>,
}

impl<'a> Aggregator<'a> {
    fn new(records: &'a [FoodNutrientRecord], nutrient_id: i64, known_recipes: &'a [Recipe]) -> Self {
        Self {
            records,
            aliases: resolve_aliases(nutrient_id),
            recipes: known_recipes.iter().map(|r| (r.id, r)).collect(),
            path: HashSet::new(),
        }
    }

    fn containers(&mut self, containers: &[ContainerRef<'a>]) -> Result<Option<f64>, AggregateError> {
        let mut total = None;
        for container in containers {
            if let Some(amount) = self.container(*container)? {
                total = Some(total.unwrap_or(0.0) + amount);
            }
        }
        Ok(total)
    }

    fn container(&mut self, container: ContainerRef<'a>) -> Result<Option<f64>, AggregateError> {
        let recipe_id = match container {
            ContainerRef::Recipe(recipe) => {
                if !self.path.insert(recipe.id) {
                    return Err(AggregateError::RecipeCycle { recipe_id: recipe.id });
                }
                Some(recipe.id)
            }
            ContainerRef::Meal(_) => None,
        };

        let mut total = None;
        for member in container.members() {
            let child_amount = match member.child {
                MemberChild::Ingredient(food) => amount_for_food(&food, self.records, &self.aliases),
                MemberChild::Recipe { id } => match self.recipes.get(&id).copied() {
                    Some(recipe) => self.container(ContainerRef::Recipe(recipe))?,
                    None => {
                        tracing::warn!(recipe_id = id, "Nested recipe missing from known recipes");
                        None
                    }
                },
            };

            let Some(child_amount) = child_amount.filter(|a| *a != 0.0) else {
                continue;
            };

            let reference = reference_serving_size(&container);
            if !(reference.is_finite() && reference > 0.0) {
                tracing::warn!(
                    reference,
                    membership_id = member.id,
                    "Skipping contribution with unusable reference serving size"
                );
                continue;
            }

            let contribution = member.portion.serving_size() * child_amount / reference;
            total = Some(total.unwrap_or(0.0) + contribution);
        }

        if let Some(id) = recipe_id {
            self.path.remove(&id);
        }
        Ok(total)
    }
}

/// Total of `nutrient_id` across `containers`, failing on recipe cycles
pub fn try_amount_in_containers<'a>(
    containers: &[ContainerRef<'a>],
    records: &'a [FoodNutrientRecord],
    nutrient_id: i64,
    known_recipes: &'a [Recipe],
) -> Result<Option<f64>, AggregateError> {
    let mut aggregator = Aggregator::new(records, nutrient_id, known_recipes);
    if aggregator.aliases.is_empty() {
        return Ok(None);
    }
    aggregator.containers(containers)
}

/// Total of `nutrient_id` across `containers`
///
/// `None` when no member contributed. A recipe cycle also yields `None`.
pub fn amount_in_containers<'a>(
    containers: &[ContainerRef<'a>],
    records: &'a [FoodNutrientRecord],
    nutrient_id: i64,
    known_recipes: &'a [Recipe],
) -> Option<f64> {
    match try_amount_in_containers(containers, records, nutrient_id, known_recipes) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(nutrient_id, "{}", e);
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::fixtures::{ingredient, meal, recipe};
    use super::*;
    use crate::catalog::ENERGY_NUTRIENT_ID;
    use crate::models::MemberChild;

    const EPSILON: f64 = 1e-9;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()
    }

    fn energy(ingredient_id: i64, amount: f64) -> FoodNutrientRecord {
        FoodNutrientRecord::user(ingredient_id, ENERGY_NUTRIENT_ID, Some(amount))
    }

    #[test]
    fn test_meal_scales_by_logged_serving() {
        let m = meal(1, day(), vec![(ingredient(10), 50.0)]);
        let records = vec![energy(10, 100.0)];

        let total = amount_in_containers(&[ContainerRef::from(&m)], &records, ENERGY_NUTRIENT_ID, &[]);
        assert!((total.unwrap() - 50.0).abs() < EPSILON);
    }

    #[test]
    fn test_nested_recipe_scaling() {
        let r = recipe(5, Some(100.0), vec![(ingredient(10), 25.0)]);
        let m = meal(1, day(), vec![(MemberChild::Recipe { id: 5 }, 50.0)]);
        let records = vec![energy(10, 100.0)];
        let known = vec![r];

        let total = amount_in_containers(&[ContainerRef::from(&m)], &records, ENERGY_NUTRIENT_ID, &known);
        assert!((total.unwrap() - 12.5).abs() < EPSILON);
    }

    #[test]
    fn test_recipe_without_portion_uses_default_reference() {
        let r = recipe(5, None, vec![(ingredient(10), 50.0)]);
        let records = vec![energy(10, 80.0)];

        let total = amount_in_containers(&[ContainerRef::from(&r)], &records, ENERGY_NUTRIENT_ID, &[]);
        assert!((total.unwrap() - 40.0).abs() < EPSILON);
    }

    #[test]
    fn test_missing_known_recipe_drops_contribution() {
        let m = meal(1, day(), vec![(MemberChild::Recipe { id: 5 }, 50.0)]);
        let records = vec![energy(10, 100.0)];

        let total = amount_in_containers(&[ContainerRef::from(&m)], &records, ENERGY_NUTRIENT_ID, &[]);
        assert_eq!(total, None);
    }

    #[test]
    fn test_no_data_is_none_and_zero_is_skipped() {
        let m = meal(1, day(), vec![(ingredient(10), 50.0), (ingredient(11), 20.0)]);
        let records = vec![energy(11, 0.0)];

        let total = amount_in_containers(&[ContainerRef::from(&m)], &records, ENERGY_NUTRIENT_ID, &[]);
        assert_eq!(total, None);
    }

    #[test]
    fn test_sums_across_containers() {
        let a = meal(1, day(), vec![(ingredient(10), 50.0)]);
        let b = meal(2, day(), vec![(ingredient(10), 150.0)]);
        let records = vec![energy(10, 10.0)];

        let total = amount_in_containers(
            &[ContainerRef::from(&a), ContainerRef::from(&b)],
            &records,
            ENERGY_NUTRIENT_ID,
            &[],
        );
        assert!((total.unwrap() - 20.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_reference_serving_skipped() {
        let r = recipe(5, Some(0.0), vec![(ingredient(10), 25.0)]);
        let records = vec![energy(10, 100.0)];

        let total = amount_in_containers(&[ContainerRef::from(&r)], &records, ENERGY_NUTRIENT_ID, &[]);
        assert_eq!(total, None);
    }

    #[test]
    fn test_recipe_cycle_detected() {
        let a = recipe(1, Some(100.0), vec![(MemberChild::Recipe { id: 2 }, 10.0)]);
        let b = recipe(2, Some(100.0), vec![(MemberChild::Recipe { id: 1 }, 10.0), (ingredient(10), 5.0)]);
        let records = vec![energy(10, 100.0)];
        let known = vec![a, b];
        let m = meal(9, day(), vec![(MemberChild::Recipe { id: 1 }, 100.0)]);

        let result = try_amount_in_containers(&[ContainerRef::from(&m)], &records, ENERGY_NUTRIENT_ID, &known);
        assert!(matches!(result, Err(AggregateError::RecipeCycle { .. })));
        assert_eq!(
            amount_in_containers(&[ContainerRef::from(&m)], &records, ENERGY_NUTRIENT_ID, &known),
            None
        );
    }

    #[test]
    fn test_shared_recipe_is_not_a_cycle() {
        let shared = recipe(3, Some(100.0), vec![(ingredient(10), 100.0)]);
        let m = meal(
            1,
            day(),
            vec![(MemberChild::Recipe { id: 3 }, 50.0), (MemberChild::Recipe { id: 3 }, 50.0)],
        );
        let records = vec![energy(10, 10.0)];
        let known = vec![shared];

        let total = try_amount_in_containers(&[ContainerRef::from(&m)], &records, ENERGY_NUTRIENT_ID, &known);
        assert!((total.unwrap().unwrap() - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_unknown_nutrient() {
        let m = meal(1, day(), vec![(ingredient(10), 50.0)]);
        let records = vec![energy(10, 100.0)];
        assert_eq!(
            amount_in_containers(&[ContainerRef::from(&m)], &records, 999_999_999, &[]),
            None
        );
    }
}
