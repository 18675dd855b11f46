//! Recipe model
//!
//! A container of ingredients and other recipes, with its own servings.

use rusqlite::{params, params_from_iter, types::Value, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::membership::{Membership, ParentKind};
use super::portion::{FoodPortion, PortionOwner};
use crate::db::{placeholders, DbError, DbResult};

/// A recipe with its portions and direct members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub external_id: Uuid,
    pub user_id: i64,
    pub name: String,
    pub portions: Vec<FoodPortion>,
    pub members: Vec<Membership>,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub user_id: i64,
    pub name: String,
}

impl Recipe {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            external_id: row.get("external_id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            portions: Vec::new(),
            members: Vec::new(),
        })
    }

    /// Create a new, empty recipe
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        if data.name.trim().is_empty() {
            return Err(DbError::InvalidInput("Recipe name is required".to_string()));
        }

        conn.execute(
            "INSERT INTO recipes (external_id, user_id, name) VALUES (?1, ?2, ?3)",
            params![Uuid::new_v4(), data.user_id, data.name.trim()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "recipe", id })
    }

    /// Get a recipe by ID, with portions and members
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(recipe) => Ok(Self::hydrate(conn, vec![recipe])?.pop()),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Load a user's recipes by id, with portions and members
    pub fn load_many(conn: &Connection, user_id: i64, ids: &[i64]) -> DbResult<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT * FROM recipes WHERE user_id = ? AND id IN ({}) ORDER BY id",
            placeholders(ids.len())
        );
        let mut values: Vec<Value> = vec![user_id.into()];
        values.extend(ids.iter().map(|id| Value::from(*id)));

        let mut stmt = conn.prepare(&sql)?;
        let recipes = stmt
            .query_map(params_from_iter(values), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::hydrate(conn, recipes)
    }

    fn hydrate(conn: &Connection, mut recipes: Vec<Self>) -> DbResult<Vec<Self>> {
        let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let mut portions = FoodPortion::load_for_owners(conn, PortionOwner::Recipe, &ids)?;
        let mut members = Membership::load_for_parents(conn, ParentKind::Recipe, &ids)?;

        for recipe in &mut recipes {
            recipe.portions = portions.remove(&recipe.id).unwrap_or_default();
            recipe.members = members.remove(&recipe.id).unwrap_or_default();
        }
        Ok(recipes)
    }

    /// Attach a serving definition to this recipe
    pub fn add_portion(&mut self, conn: &Connection, portion: &FoodPortion) -> DbResult<&FoodPortion> {
        let saved = FoodPortion::create(conn, PortionOwner::Recipe, self.id, portion)?;
        self.portions.push(saved);
        Ok(&self.portions[self.portions.len() - 1])
    }
}
