//! Food Nutrient Record model
//!
//! "Nutrient N is present at amount A per 100 reference units of food F",
//! where F is either a user ingredient or a catalog food.

use rusqlite::{params, params_from_iter, types::Value, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{placeholders, DbError, DbResult};

/// Which food a nutrient record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RecordOwner {
    /// User override attached to an ingredient
    UserFood(i64),
    /// Imported catalog value
    CatalogFood(i64),
}

/// The identity of a food for record ownership tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodRef {
    pub ingredient_id: i64,
    pub catalog_food_id: Option<i64>,
}

impl FoodRef {
    pub fn new(ingredient_id: i64, catalog_food_id: Option<i64>) -> Self {
        Self {
            ingredient_id,
            catalog_food_id,
        }
    }
}

/// A single nutrient amount for a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrientRecord {
    pub owner: RecordOwner,
    pub nutrient_id: i64,
    /// None means "not measured", which is distinct from zero
    pub amount: Option<f64>,
}

impl FoodNutrientRecord {
    pub fn user(ingredient_id: i64, nutrient_id: i64, amount: Option<f64>) -> Self {
        Self {
            owner: RecordOwner::UserFood(ingredient_id),
            nutrient_id,
            amount,
        }
    }

    pub fn catalog(catalog_food_id: i64, nutrient_id: i64, amount: Option<f64>) -> Self {
        Self {
            owner: RecordOwner::CatalogFood(catalog_food_id),
            nutrient_id,
            amount,
        }
    }

    /// Whether this record carries a value for `food`
    pub fn belongs_to(&self, food: &FoodRef) -> bool {
        match self.owner {
            RecordOwner::UserFood(id) => id == food.ingredient_id,
            RecordOwner::CatalogFood(id) => food.catalog_food_id == Some(id),
        }
    }

    fn from_user_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self::user(
            row.get("ingredient_id")?,
            row.get("nutrient_id")?,
            row.get("amount")?,
        ))
    }

    fn from_catalog_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self::catalog(
            row.get("catalog_food_id")?,
            row.get("nutrient_id")?,
            row.get("amount")?,
        ))
    }

    /// User records for the given ingredients, optionally limited to nutrient ids
    pub fn load_user_records(
        conn: &Connection,
        user_id: i64,
        ingredient_ids: &[i64],
        nutrient_ids: Option<&[i64]>,
    ) -> DbResult<Vec<Self>> {
        if ingredient_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = format!(
            "SELECT * FROM user_food_nutrients WHERE user_id = ? AND ingredient_id IN ({})",
            placeholders(ingredient_ids.len())
        );
        let mut values: Vec<Value> = vec![user_id.into()];
        values.extend(ingredient_ids.iter().map(|id| Value::from(*id)));

        if let Some(nutrient_ids) = nutrient_ids {
            sql.push_str(&format!(" AND nutrient_id IN ({})", placeholders(nutrient_ids.len())));
            values.extend(nutrient_ids.iter().map(|id| Value::from(*id)));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(values), Self::from_user_row)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = records.len(), "Loaded user nutrient records");
        Ok(records)
    }

    /// Catalog records for the given catalog foods, optionally limited to nutrient ids
    pub fn load_catalog_records(
        conn: &Connection,
        catalog_food_ids: &[i64],
        nutrient_ids: Option<&[i64]>,
    ) -> DbResult<Vec<Self>> {
        if catalog_food_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = format!(
            "SELECT * FROM catalog_food_nutrients WHERE catalog_food_id IN ({})",
            placeholders(catalog_food_ids.len())
        );
        let mut values: Vec<Value> = catalog_food_ids.iter().map(|id| Value::from(*id)).collect();

        if let Some(nutrient_ids) = nutrient_ids {
            sql.push_str(&format!(" AND nutrient_id IN ({})", placeholders(nutrient_ids.len())));
            values.extend(nutrient_ids.iter().map(|id| Value::from(*id)));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(values), Self::from_catalog_row)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = records.len(), "Loaded catalog nutrient records");
        Ok(records)
    }

    /// Insert or replace a user's amount for an ingredient
    pub fn set_user_amount(
        conn: &Connection,
        user_id: i64,
        ingredient_id: i64,
        nutrient_id: i64,
        amount: Option<f64>,
    ) -> DbResult<Self> {
        validate_amount(amount)?;
        conn.execute(
            r#"
            INSERT INTO user_food_nutrients (user_id, ingredient_id, nutrient_id, amount)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(ingredient_id, nutrient_id) DO UPDATE SET amount = excluded.amount
            "#,
            params![user_id, ingredient_id, nutrient_id, amount],
        )?;
        Ok(Self::user(ingredient_id, nutrient_id, amount))
    }

    /// Insert or replace a catalog amount
    pub fn set_catalog_amount(
        conn: &Connection,
        catalog_food_id: i64,
        nutrient_id: i64,
        amount: Option<f64>,
    ) -> DbResult<Self> {
        validate_amount(amount)?;
        conn.execute(
            r#"
            INSERT INTO catalog_food_nutrients (catalog_food_id, nutrient_id, amount)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(catalog_food_id, nutrient_id) DO UPDATE SET amount = excluded.amount
            "#,
            params![catalog_food_id, nutrient_id, amount],
        )?;
        Ok(Self::catalog(catalog_food_id, nutrient_id, amount))
    }
}

fn validate_amount(amount: Option<f64>) -> DbResult<()> {
    match amount {
        Some(a) if a < 0.0 || !a.is_finite() => Err(DbError::InvalidInput(format!(
            "Nutrient amount must be finite and non-negative, got {}",
            a
        ))),
        _ => Ok(()),
    }
}
