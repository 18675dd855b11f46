//! Catalog Food model
//!
//! Imported reference foods. Nutrient amounts live in `catalog_food_nutrients`.

use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::portion::{FoodPortion, PortionOwner};
use crate::db::{placeholders, DbError, DbResult};

/// A catalog food with its recorded portions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFood {
    pub id: i64,
    pub external_id: Uuid,
    pub name: String,
    pub portions: Vec<FoodPortion>,
}

impl CatalogFood {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            external_id: row.get("external_id")?,
            name: row.get("name")?,
            portions: Vec::new(),
        })
    }

    /// Create a new catalog food
    pub fn create(conn: &Connection, name: &str) -> DbResult<Self> {
        if name.trim().is_empty() {
            return Err(DbError::InvalidInput("Catalog food name is required".to_string()));
        }

        conn.execute(
            "INSERT INTO catalog_foods (external_id, name) VALUES (?1, ?2)",
            params![Uuid::new_v4(), name.trim()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "catalog food", id })
    }

    /// Get a catalog food by ID, with portions
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM catalog_foods WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(mut food) => {
                food.portions = FoodPortion::list_for_owner(conn, PortionOwner::CatalogFood, id)?;
                Ok(Some(food))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Load many catalog foods, with portions
    pub fn load_many(conn: &Connection, ids: &[i64]) -> DbResult<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT * FROM catalog_foods WHERE id IN ({}) ORDER BY id",
            placeholders(ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut foods = stmt
            .query_map(params_from_iter(ids), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut portions = FoodPortion::load_for_owners(conn, PortionOwner::CatalogFood, ids)?;
        for food in &mut foods {
            food.portions = portions.remove(&food.id).unwrap_or_default();
        }

        Ok(foods)
    }

    /// Attach a portion to this catalog food
    pub fn add_portion(&mut self, conn: &Connection, portion: &FoodPortion) -> DbResult<&FoodPortion> {
        let saved = FoodPortion::create(conn, PortionOwner::CatalogFood, self.id, portion)?;
        self.portions.push(saved);
        Ok(&self.portions[self.portions.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_connection;
    use crate::models::PortionMeasure;
    use crate::nutrition::ServingSizeUnit;

    #[test]
    fn test_create_and_load() {
        let conn = test_connection();
        let mut food = CatalogFood::create(&conn, "  Whole milk ").unwrap();
        assert_eq!(food.name, "Whole milk");

        let mut cup = FoodPortion::serving(0.0, ServingSizeUnit::Weight);
        cup.measure = PortionMeasure::GramWeight { grams: 244.0 };
        cup.amount = Some(1.0);
        cup.measure_unit_id = Some(1000);
        food.add_portion(&conn, &cup).unwrap();

        let loaded = CatalogFood::load_many(&conn, &[food.id]).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].portions.len(), 1);
        assert_eq!(loaded[0].portions[0].serving_size(), 244.0);
    }

    #[test]
    fn test_empty_name_rejected() {
        let conn = test_connection();
        assert!(matches!(
            CatalogFood::create(&conn, "   "),
            Err(DbError::InvalidInput(_))
        ));
    }
}
