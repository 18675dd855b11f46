//! Containers and transitive closure loaders
//!
//! Meals and recipes both hold members. The aggregation core needs every
//! nested recipe and ingredient pre-fetched, so these loaders walk the
//! membership graph down to the leaves.

use std::collections::BTreeSet;

use rusqlite::Connection;

use super::ingredient::Ingredient;
use super::meal::Meal;
use super::membership::{MemberChild, Membership};
use super::portion::FoodPortion;
use super::recipe::Recipe;
use crate::db::DbResult;

/// A meal or recipe viewed as a holder of members
#[derive(Debug, Clone, Copy)]
pub enum ContainerRef<'a> {
    Meal(&'a Meal),
    Recipe(&'a Recipe),
}

impl<'a> ContainerRef<'a> {
    pub fn members(&self) -> &'a [Membership] {
        match *self {
            ContainerRef::Meal(meal) => &meal.members,
            ContainerRef::Recipe(recipe) => &recipe.members,
        }
    }

    /// Servings defined on the container itself (meals have none)
    pub fn portions(&self) -> &'a [FoodPortion] {
        match *self {
            ContainerRef::Meal(_) => &[],
            ContainerRef::Recipe(recipe) => &recipe.portions,
        }
    }
}

impl<'a> From<&'a Meal> for ContainerRef<'a> {
    fn from(meal: &'a Meal) -> Self {
        ContainerRef::Meal(meal)
    }
}

impl<'a> From<&'a Recipe> for ContainerRef<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        ContainerRef::Recipe(recipe)
    }
}

/// Everything reachable below a set of containers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerContents {
    pub ingredient_ids: BTreeSet<i64>,
    pub recipe_ids: BTreeSet<i64>,
}

/// Walk members of `parents`, descending into nested recipes
pub fn contents_of(
    conn: &Connection,
    user_id: i64,
    parents: &[ContainerRef<'_>],
) -> DbResult<ContainerContents> {
    let mut contents = ContainerContents::default();
    let mut frontier: Vec<i64> = Vec::new();

    for parent in parents {
        visit(parent.members(), &mut contents, &mut frontier);
    }

    while !frontier.is_empty() {
        let recipes = Recipe::load_many(conn, user_id, &frontier)?;
        frontier.clear();
        for recipe in &recipes {
            visit(&recipe.members, &mut contents, &mut frontier);
        }
    }

    tracing::debug!(
        ingredients = contents.ingredient_ids.len(),
        recipes = contents.recipe_ids.len(),
        "Resolved container contents"
    );
    Ok(contents)
}

fn visit(members: &[Membership], contents: &mut ContainerContents, frontier: &mut Vec<i64>) {
    for member in members {
        match member.child {
            MemberChild::Ingredient(food) => {
                contents.ingredient_ids.insert(food.ingredient_id);
            }
            MemberChild::Recipe { id } => {
                if contents.recipe_ids.insert(id) {
                    frontier.push(id);
                }
            }
        }
    }
}

/// All ingredient ids reachable from `parents`
pub fn ingredient_ids_for_parents(
    conn: &Connection,
    user_id: i64,
    parents: &[ContainerRef<'_>],
) -> DbResult<BTreeSet<i64>> {
    Ok(contents_of(conn, user_id, parents)?.ingredient_ids)
}

/// All recipe ids reachable from `parents`
pub fn recipe_ids_for_parents(
    conn: &Connection,
    user_id: i64,
    parents: &[ContainerRef<'_>],
) -> DbResult<BTreeSet<i64>> {
    Ok(contents_of(conn, user_id, parents)?.recipe_ids)
}

impl Ingredient {
    /// Every ingredient reachable from `parents`
    pub fn load_for_parents(
        conn: &Connection,
        user_id: i64,
        parents: &[ContainerRef<'_>],
    ) -> DbResult<Vec<Self>> {
        let ids: Vec<i64> = ingredient_ids_for_parents(conn, user_id, parents)?
            .into_iter()
            .collect();
        Self::load_many(conn, user_id, &ids)
    }
}

impl Recipe {
    /// Every recipe reachable from `parents`, suitable as the known-recipes set
    pub fn load_for_parents(
        conn: &Connection,
        user_id: i64,
        parents: &[ContainerRef<'_>],
    ) -> DbResult<Vec<Self>> {
        let ids: Vec<i64> = recipe_ids_for_parents(conn, user_id, parents)?
            .into_iter()
            .collect();
        Self::load_many(conn, user_id, &ids)
    }
}
