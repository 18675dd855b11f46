//! Logged serving statistics over meals

use std::collections::HashSet;

use crate::models::{Ingredient, Meal, MemberChild};

fn same_child(a: &MemberChild, b: &MemberChild) -> bool {
    match (a, b) {
        (MemberChild::Ingredient(x), MemberChild::Ingredient(y)) => x.ingredient_id == y.ingredient_id,
        (MemberChild::Recipe { id: x }, MemberChild::Recipe { id: y }) => x == y,
        _ => false,
    }
}

/// Total logged serving size of `child` across `meals`
pub fn serving_size_in_meals(meals: &[Meal], child: &MemberChild) -> f64 {
    meals
        .iter()
        .flat_map(|meal| &meal.members)
        .filter(|member| same_child(&member.child, child))
        .map(|member| member.portion.serving_size())
        .sum()
}

/// Total logged serving size of every ingredient in a category
pub fn category_serving_size_in_meals(meals: &[Meal], category: &[Ingredient]) -> f64 {
    category
        .iter()
        .map(|ingredient| serving_size_in_meals(meals, &MemberChild::Ingredient(ingredient.food_ref())))
        .sum()
}

/// How many distinct ingredients of a category were logged
pub fn category_food_count_in_meals(meals: &[Meal], category: &[Ingredient]) -> usize {
    let logged: HashSet<i64> = meals
        .iter()
        .flat_map(|meal| &meal.members)
        .filter_map(|member| match member.child {
            MemberChild::Ingredient(food) => Some(food.ingredient_id),
            MemberChild::Recipe { .. } => None,
        })
        .collect();

    category
        .iter()
        .map(|ingredient| ingredient.id)
        .collect::<HashSet<_>>()
        .intersection(&logged)
        .count()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::nutrition::aggregate::fixtures::{ingredient, meal};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()
    }

    fn category_food(id: i64) -> Ingredient {
        Ingredient {
            id,
            external_id: Uuid::new_v4(),
            user_id: 1,
            name: format!("Food {}", id),
            catalog_food_id: None,
            category_id: Some(1),
            portions: Vec::new(),
        }
    }

    fn meals() -> Vec<Meal> {
        vec![
            meal(
                1,
                day(),
                vec![(ingredient(10), 50.0), (MemberChild::Recipe { id: 10 }, 70.0)],
            ),
            meal(2, day(), vec![(ingredient(10), 25.0)]),
        ]
    }

    #[test]
    fn test_serving_size_in_meals() {
        let meals = meals();
        assert_eq!(serving_size_in_meals(&meals, &ingredient(10)), 75.0);
        assert_eq!(serving_size_in_meals(&meals, &MemberChild::Recipe { id: 10 }), 70.0);
        assert_eq!(serving_size_in_meals(&meals, &MemberChild::Recipe { id: 11 }), 0.0);
    }

    #[test]
    fn test_category_totals() {
        let meals = meals();
        let present = category_food(10);
        let absent = category_food(11);

        assert_eq!(category_serving_size_in_meals(&meals, std::slice::from_ref(&present)), 75.0);
        assert_eq!(category_serving_size_in_meals(&meals, std::slice::from_ref(&absent)), 0.0);
        assert_eq!(category_food_count_in_meals(&meals, &[present.clone()]), 1);
        assert_eq!(category_food_count_in_meals(&meals, &[absent.clone()]), 0);
        assert_eq!(category_food_count_in_meals(&meals, &[present, absent]), 1);
    }
}
