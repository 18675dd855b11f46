//! Nutrient amount lookup
//!
//! Resolves how much of a nutrient a food carries, given its records. Amounts
//! are per 100 reference units; `None` means nobody measured it.

use std::collections::HashSet;

use rusqlite::Connection;

use super::aliases::resolve_aliases;
use crate::catalog::nutrient;
use crate::db::DbResult;
use crate::models::{ContainerRef, FoodNutrientRecord, FoodRef, Ingredient, Meal, RecordOwner};

/// Default cap for ranked food lists
pub const DEFAULT_MAX_ITEMS: usize = 10;
/// Default number of recent meals scanned for ranking
pub const DEFAULT_MAX_MEALS: usize = 10;

/// Amount of the first record matching any alias of `nutrient_id`
///
/// First match, never a sum: a single food has at most one record per nutrient.
pub fn amount_for(records: &[FoodNutrientRecord], nutrient_id: i64) -> Option<f64> {
    let aliases = resolve_aliases(nutrient_id);
    if aliases.is_empty() {
        return None;
    }

    records
        .iter()
        .find(|r| aliases.contains(&r.nutrient_id))
        .and_then(|r| r.amount)
}

pub(crate) fn amount_for_food(food: &FoodRef, records: &[FoodNutrientRecord], aliases: &[i64]) -> Option<f64> {
    records
        .iter()
        .find(|r| aliases.contains(&r.nutrient_id) && r.belongs_to(food))
        .and_then(|r| r.amount)
}

/// Summed amount across `foods`
///
/// `None` when no food has a value; otherwise missing values count as zero.
pub fn amount_across_foods(
    foods: &[FoodRef],
    records: &[FoodNutrientRecord],
    nutrient_id: i64,
) -> Option<f64> {
    let aliases = resolve_aliases(nutrient_id);
    if aliases.is_empty() {
        return None;
    }

    foods
        .iter()
        .filter_map(|food| amount_for_food(food, records, &aliases))
        .fold(None, |total, amount| Some(total.unwrap_or(0.0) + amount))
}

/// Combine user and catalog records for `foods`
///
/// For each food, user records come first; a catalog record is dropped when
/// the user has a record for the same nutrient id on that food.
pub fn merge_food_records(
    foods: &[FoodRef],
    user_records: &[FoodNutrientRecord],
    catalog_records: &[FoodNutrientRecord],
) -> Vec<FoodNutrientRecord> {
    let mut merged = Vec::new();

    for food in foods {
        let mut overridden = HashSet::new();
        for record in user_records
            .iter()
            .filter(|r| r.owner == RecordOwner::UserFood(food.ingredient_id))
        {
            overridden.insert(record.nutrient_id);
            merged.push(record.clone());
        }

        let Some(catalog_food_id) = food.catalog_food_id else {
            continue;
        };
        merged.extend(
            catalog_records
                .iter()
                .filter(|r| {
                    r.owner == RecordOwner::CatalogFood(catalog_food_id)
                        && !overridden.contains(&r.nutrient_id)
                })
                .cloned(),
        );
    }

    merged
}

/// Load and merge records for `foods`, optionally limited to one nutrient's aliases
pub fn load_records_for_foods(
    conn: &Connection,
    user_id: i64,
    foods: &[FoodRef],
    nutrient_id: Option<i64>,
) -> DbResult<Vec<FoodNutrientRecord>> {
    let aliases = match nutrient_id {
        Some(id) => {
            let aliases = resolve_aliases(id);
            if aliases.is_empty() {
                return Ok(Vec::new());
            }
            Some(aliases)
        }
        None => None,
    };

    let ingredient_ids: Vec<i64> = foods.iter().map(|f| f.ingredient_id).collect();
    let catalog_food_ids: Vec<i64> = foods.iter().filter_map(|f| f.catalog_food_id).collect();

    let user_records =
        FoodNutrientRecord::load_user_records(conn, user_id, &ingredient_ids, aliases.as_deref())?;
    let catalog_records =
        FoodNutrientRecord::load_catalog_records(conn, &catalog_food_ids, aliases.as_deref())?;

    Ok(merge_food_records(foods, &user_records, &catalog_records))
}

/// Foods carrying a non-zero amount of the nutrient, highest amount first
pub fn rank_foods_by_nutrient<'a>(
    foods: &'a [FoodRef],
    records: &[FoodNutrientRecord],
    nutrient_id: i64,
    max_items: usize,
) -> Vec<&'a FoodRef> {
    let aliases = resolve_aliases(nutrient_id);
    if aliases.is_empty() || max_items == 0 {
        return Vec::new();
    }

    let mut matching: Vec<(&FoodNutrientRecord, f64)> = records
        .iter()
        .filter(|r| aliases.contains(&r.nutrient_id))
        .filter_map(|r| r.amount.filter(|a| *a != 0.0).map(|a| (r, a)))
        .collect();
    matching.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut ranked: Vec<&FoodRef> = Vec::new();
    for (record, _) in matching {
        let Some(food) = foods.iter().find(|f| record.belongs_to(f)) else {
            continue;
        };
        if !ranked.contains(&food) {
            ranked.push(food);
            if ranked.len() == max_items {
                break;
            }
        }
    }

    ranked
}

/// Ingredients from the user's recent meals, richest in the nutrient first
pub fn recent_foods_for_nutrient(
    conn: &Connection,
    user_id: i64,
    nutrient_id: i64,
    max_items: usize,
    max_meals: usize,
) -> DbResult<Vec<Ingredient>> {
    if nutrient(nutrient_id).is_none() {
        return Ok(Vec::new());
    }

    let meals = Meal::load_recent(conn, user_id, max_meals)?;
    let parents: Vec<ContainerRef<'_>> = meals.iter().map(ContainerRef::from).collect();
    let ingredients = Ingredient::load_for_parents(conn, user_id, &parents)?;

    let foods: Vec<FoodRef> = ingredients.iter().map(Ingredient::food_ref).collect();
    let records = load_records_for_foods(conn, user_id, &foods, Some(nutrient_id))?;
    let ranked = rank_foods_by_nutrient(&foods, &records, nutrient_id, max_items);

    tracing::debug!(user_id, nutrient_id, count = ranked.len(), "Ranked recent foods");

    Ok(ranked
        .into_iter()
        .filter_map(|food| ingredients.iter().find(|i| i.id == food.ingredient_id).cloned())
        .collect())
}
