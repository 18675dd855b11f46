//! Per-day nutrient tracker
//!
//! One independent total per day over a window ending today. Records and
//! nested recipes are fetched once for the whole window.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use rusqlite::Connection;

use super::aggregate::amount_in_containers;
use super::lookup::load_records_for_foods;
use crate::db::DbResult;
use crate::models::{ContainerRef, FoodNutrientRecord, FoodRef, Ingredient, Meal, Recipe};

/// Default window length in days
pub const DEFAULT_TRACKER_DAYS: u32 = 5;

/// The `total_days` dates ending at `today`, oldest first
pub fn window(today: NaiveDate, total_days: u32) -> Vec<NaiveDate> {
    (0..total_days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .collect()
}

/// Amount per day for the window, from pre-fetched meals and records
pub fn amounts_per_day(
    meals: &[Meal],
    records: &[FoodNutrientRecord],
    nutrient_id: i64,
    known_recipes: &[Recipe],
    today: NaiveDate,
    total_days: u32,
) -> BTreeMap<NaiveDate, Option<f64>> {
    window(today, total_days)
        .into_iter()
        .map(|date| {
            let day_meals: Vec<ContainerRef<'_>> = meals
                .iter()
                .filter(|m| m.meal_date == date)
                .map(ContainerRef::from)
                .collect();
            let amount = amount_in_containers(&day_meals, records, nutrient_id, known_recipes);
            (date, amount)
        })
        .collect()
}

/// Load a user's window and compute the per-day amounts
pub fn tracker_amounts(
    conn: &Connection,
    user_id: i64,
    nutrient_id: i64,
    total_days: u32,
    today: NaiveDate,
) -> DbResult<BTreeMap<NaiveDate, Option<f64>>> {
    let dates = window(today, total_days);
    let Some(&start) = dates.first() else {
        return Ok(BTreeMap::new());
    };

    let meals = Meal::load_in_range(conn, user_id, start, today)?;
    let parents: Vec<ContainerRef<'_>> = meals.iter().map(ContainerRef::from).collect();
    let ingredients = Ingredient::load_for_parents(conn, user_id, &parents)?;
    let known_recipes = Recipe::load_for_parents(conn, user_id, &parents)?;

    let foods: Vec<FoodRef> = ingredients.iter().map(Ingredient::food_ref).collect();
    let records = load_records_for_foods(conn, user_id, &foods, Some(nutrient_id))?;

    tracing::debug!(
        user_id,
        nutrient_id,
        meals = meals.len(),
        recipes = known_recipes.len(),
        records = records.len(),
        "Computing tracker window"
    );

    Ok(amounts_per_day(
        &meals,
        &records,
        nutrient_id,
        &known_recipes,
        today,
        total_days,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ENERGY_NUTRIENT_ID;
    use crate::db::connection::test_connection;
    use crate::models::{
        IngredientCreate, MealCreate, MemberChild, Membership, MembershipCreate, ParentKind,
        RecipeCreate,
    };
    use crate::nutrition::aggregate::fixtures::{ingredient, meal};
    use crate::nutrition::ServingSizeUnit;
    use crate::models::FoodPortion;

    const EPSILON: f64 = 1e-9;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_window() {
        assert_eq!(window(date(9), 3), vec![date(7), date(8), date(9)]);
        assert!(window(date(9), 0).is_empty());
    }

    #[test]
    fn test_days_are_independent() {
        let meals = vec![
            meal(1, date(7), vec![(ingredient(10), 100.0)]),
            meal(2, date(9), vec![(ingredient(10), 50.0)]),
            meal(3, date(9), vec![(ingredient(10), 50.0)]),
            meal(4, date(1), vec![(ingredient(10), 500.0)]),
        ];
        let records = vec![FoodNutrientRecord::user(10, ENERGY_NUTRIENT_ID, Some(200.0))];

        let per_day = amounts_per_day(&meals, &records, ENERGY_NUTRIENT_ID, &[], date(9), 3);
        assert_eq!(per_day.len(), 3);
        assert!((per_day[&date(7)].unwrap() - 200.0).abs() < EPSILON);
        assert_eq!(per_day[&date(8)], None);
        assert!((per_day[&date(9)].unwrap() - 200.0).abs() < EPSILON);
    }

    #[test]
    fn test_tracker_amounts_from_database() {
        let conn = test_connection();
        let cfood = crate::models::CatalogFood::create(&conn, "Bread").unwrap();
        crate::models::FoodNutrientRecord::set_catalog_amount(&conn, cfood.id, 2047, Some(260.0)).unwrap();
        let bread = Ingredient::create(
            &conn,
            &IngredientCreate {
                user_id: 1,
                name: "Bread".to_string(),
                catalog_food_id: Some(cfood.id),
                category_id: None,
            },
        )
        .unwrap();

        let mut toast = Recipe::create(
            &conn,
            &RecipeCreate {
                user_id: 1,
                name: "Toast".to_string(),
            },
        )
        .unwrap();
        toast
            .add_portion(&conn, &FoodPortion::serving(50.0, ServingSizeUnit::Weight))
            .unwrap();
        Membership::create(
            &conn,
            &MembershipCreate {
                user_id: 1,
                parent_kind: ParentKind::Recipe,
                parent_id: toast.id,
                child: MemberChild::Ingredient(bread.food_ref()),
                portion: FoodPortion::serving(50.0, ServingSizeUnit::Weight),
            },
        )
        .unwrap();

        let breakfast = Meal::create(
            &conn,
            &MealCreate {
                user_id: 1,
                meal_date: date(8),
            },
        )
        .unwrap();
        Membership::create(
            &conn,
            &MembershipCreate {
                user_id: 1,
                parent_kind: ParentKind::Meal,
                parent_id: breakfast.id,
                child: MemberChild::Recipe { id: toast.id },
                portion: FoodPortion::serving(100.0, ServingSizeUnit::Weight),
            },
        )
        .unwrap();

        let per_day = tracker_amounts(&conn, 1, ENERGY_NUTRIENT_ID, 5, date(9)).unwrap();
        assert_eq!(per_day.len(), 5);
        // toast: 50 * 260 / 50 = 260 per serving; meal: 100 * 260 / 100
        assert!((per_day[&date(8)].unwrap() - 260.0).abs() < EPSILON);
        assert_eq!(per_day[&date(9)], None);
        assert_eq!(per_day[&date(5)], None);
    }
}
