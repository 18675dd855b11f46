//! Food Portion model
//!
//! A named serving of a catalog food, ingredient or recipe, and the logged
//! serving of a membership.

use std::collections::HashMap;

use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{placeholders, DbError, DbResult};
use crate::nutrition::ServingSizeUnit;

/// What a portion row is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortionOwner {
    CatalogFood,
    Ingredient,
    Recipe,
    Membership,
}

impl PortionOwner {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortionOwner::CatalogFood => "catalog_food",
            PortionOwner::Ingredient => "ingredient",
            PortionOwner::Recipe => "recipe",
            PortionOwner::Membership => "membership",
        }
    }
}

/// How large a portion is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortionMeasure {
    /// Explicit serving size in grams or milliliters
    Serving { size: f64, unit: ServingSizeUnit },
    /// Catalog-only portions: grams per single measure
    GramWeight { grams: f64 },
}

/// A named serving of a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodPortion {
    pub id: i64,
    pub external_id: Uuid,
    pub servings_per_container: Option<f64>,
    pub measure: PortionMeasure,
    /// Multiplier, treated as 1 when absent
    pub quantity: Option<f64>,
    /// Measure-unit count, e.g. 3 in "3 tsp"
    pub amount: Option<f64>,
    pub measure_unit_id: Option<i64>,
    pub portion_description: Option<String>,
    pub modifier: Option<String>,
}

impl FoodPortion {
    /// Unsaved portion with an explicit serving size
    pub fn serving(size: f64, unit: ServingSizeUnit) -> Self {
        Self {
            id: 0,
            external_id: Uuid::new_v4(),
            servings_per_container: None,
            measure: PortionMeasure::Serving { size, unit },
            quantity: None,
            amount: None,
            measure_unit_id: None,
            portion_description: None,
            modifier: None,
        }
    }

    /// Effective quantity (absent means 1)
    pub fn quantity_or_one(&self) -> f64 {
        match self.quantity {
            Some(q) if q != 0.0 => q,
            _ => 1.0,
        }
    }

    /// Total size in the canonical unit
    pub fn serving_size(&self) -> f64 {
        match self.measure {
            PortionMeasure::Serving { size, .. } => size,
            PortionMeasure::GramWeight { grams } => grams * self.quantity_or_one(),
        }
    }

    pub fn serving_size_unit(&self) -> ServingSizeUnit {
        match self.measure {
            PortionMeasure::Serving { unit, .. } => unit,
            PortionMeasure::GramWeight { .. } => ServingSizeUnit::Weight,
        }
    }

    /// Every numeric field must be finite and non-negative
    pub fn validate(&self) -> DbResult<()> {
        let numbers = [
            self.servings_per_container,
            self.quantity,
            self.amount,
            Some(self.serving_size()),
        ];
        if numbers.iter().flatten().any(|n| *n < 0.0 || !n.is_finite()) {
            return Err(DbError::InvalidInput(
                "Portion values must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let serving_size: Option<f64> = row.get("serving_size")?;
        let unit: Option<String> = row.get("serving_size_unit")?;
        let gram_weight: Option<f64> = row.get("gram_weight")?;

        let measure = match serving_size {
            Some(size) => PortionMeasure::Serving {
                size,
                unit: unit
                    .as_deref()
                    .and_then(ServingSizeUnit::from_str)
                    .unwrap_or_default(),
            },
            None => PortionMeasure::GramWeight {
                grams: gram_weight.unwrap_or_default(),
            },
        };

        Ok(Self {
            id: row.get("id")?,
            external_id: row.get("external_id")?,
            servings_per_container: row.get("servings_per_container")?,
            measure,
            quantity: row.get("quantity")?,
            amount: row.get("amount")?,
            measure_unit_id: row.get("measure_unit_id")?,
            portion_description: row.get("portion_description")?,
            modifier: row.get("modifier")?,
        })
    }

    /// Persist a portion for an owner
    pub fn create(
        conn: &Connection,
        owner: PortionOwner,
        owner_id: i64,
        portion: &FoodPortion,
    ) -> DbResult<Self> {
        portion.validate()?;

        let (serving_size, unit, gram_weight) = match portion.measure {
            PortionMeasure::Serving { size, unit } => (Some(size), Some(unit.to_db_str()), None),
            PortionMeasure::GramWeight { grams } => (None, None, Some(grams)),
        };

        conn.execute(
            r#"
            INSERT INTO food_portions (
                external_id, owner_type, owner_id, servings_per_container,
                serving_size, serving_size_unit, gram_weight, quantity, amount,
                measure_unit_id, portion_description, modifier
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                portion.external_id,
                owner.as_str(),
                owner_id,
                portion.servings_per_container,
                serving_size,
                unit,
                gram_weight,
                portion.quantity,
                portion.amount,
                portion.measure_unit_id,
                portion.portion_description,
                portion.modifier,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "food portion", id })
    }

    /// Get a portion by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_portions WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(portion) => Ok(Some(portion)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All portions of one owner, in creation order
    pub fn list_for_owner(conn: &Connection, owner: PortionOwner, owner_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_portions WHERE owner_type = ?1 AND owner_id = ?2 ORDER BY id",
        )?;

        let portions = stmt
            .query_map(params![owner.as_str(), owner_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(portions)
    }

    /// Portions for many owners of one kind, grouped by owner id
    pub fn load_for_owners(
        conn: &Connection,
        owner: PortionOwner,
        owner_ids: &[i64],
    ) -> DbResult<HashMap<i64, Vec<Self>>> {
        let mut grouped: HashMap<i64, Vec<Self>> = HashMap::new();
        if owner_ids.is_empty() {
            return Ok(grouped);
        }

        let sql = format!(
            "SELECT * FROM food_portions WHERE owner_type = ? AND owner_id IN ({}) ORDER BY id",
            placeholders(owner_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;

        let mut values: Vec<rusqlite::types::Value> = vec![owner.as_str().to_string().into()];
        values.extend(owner_ids.iter().map(|id| (*id).into()));

        let rows = stmt.query_map(params_from_iter(values), |row| {
            Ok((row.get::<_, i64>("owner_id")?, Self::from_row(row)?))
        })?;
        for row in rows {
            let (owner_id, portion) = row?;
            grouped.entry(owner_id).or_default().push(portion);
        }

        Ok(grouped)
    }

    /// Delete every portion of an owner
    pub fn delete_for_owner(conn: &Connection, owner: PortionOwner, owner_id: i64) -> DbResult<usize> {
        let rows = conn.execute(
            "DELETE FROM food_portions WHERE owner_type = ?1 AND owner_id = ?2",
            params![owner.as_str(), owner_id],
        )?;
        Ok(rows)
    }
}
