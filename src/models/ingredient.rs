//! Ingredient model
//!
//! A user's food, optionally backed by a catalog food.

use rusqlite::{params, params_from_iter, types::Value, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::nutrient_record::FoodRef;
use super::portion::{FoodPortion, PortionOwner};
use crate::catalog::ALL_FOODS_CATEGORY_ID;
use crate::db::{placeholders, DbError, DbResult};

/// A user ingredient with its portions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub external_id: Uuid,
    pub user_id: i64,
    pub name: String,
    pub catalog_food_id: Option<i64>,
    pub category_id: Option<i64>,
    pub portions: Vec<FoodPortion>,
}

/// Data for creating a new ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub user_id: i64,
    pub name: String,
    pub catalog_food_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl Ingredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            external_id: row.get("external_id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            catalog_food_id: row.get("catalog_food_id")?,
            category_id: row.get("category_id")?,
            portions: Vec::new(),
        })
    }

    /// Identity used to match nutrient records
    pub fn food_ref(&self) -> FoodRef {
        FoodRef::new(self.id, self.catalog_food_id)
    }

    /// Create a new ingredient
    pub fn create(conn: &Connection, data: &IngredientCreate) -> DbResult<Self> {
        if data.name.trim().is_empty() {
            return Err(DbError::InvalidInput("Ingredient name is required".to_string()));
        }

        conn.execute(
            r#"
            INSERT INTO ingredients (external_id, user_id, name, catalog_food_id, category_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                Uuid::new_v4(),
                data.user_id,
                data.name.trim(),
                data.catalog_food_id,
                data.category_id,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "ingredient", id })
    }

    /// Get an ingredient by ID, with portions
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(mut ingredient) => {
                ingredient.portions = FoodPortion::list_for_owner(conn, PortionOwner::Ingredient, id)?;
                Ok(Some(ingredient))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Load a user's ingredients by id, with portions
    pub fn load_many(conn: &Connection, user_id: i64, ids: &[i64]) -> DbResult<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT * FROM ingredients WHERE user_id = ? AND id IN ({}) ORDER BY id",
            placeholders(ids.len())
        );
        let mut values: Vec<Value> = vec![user_id.into()];
        values.extend(ids.iter().map(|id| Value::from(*id)));

        let mut stmt = conn.prepare(&sql)?;
        let ingredients = stmt
            .query_map(params_from_iter(values), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_portions(conn, ingredients)
    }

    /// A user's ingredients in a food category
    ///
    /// The all-foods category lists every ingredient of the user.
    pub fn list_for_category(conn: &Connection, user_id: i64, category_id: i64) -> DbResult<Vec<Self>> {
        let ingredients = if category_id == ALL_FOODS_CATEGORY_ID {
            let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE user_id = ?1 ORDER BY name")?;
            let rows = stmt
                .query_map([user_id], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        } else {
            let mut stmt = conn.prepare(
                "SELECT * FROM ingredients WHERE user_id = ?1 AND category_id = ?2 ORDER BY name",
            )?;
            let rows = stmt
                .query_map(params![user_id, category_id], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        Self::with_portions(conn, ingredients)
    }

    fn with_portions(conn: &Connection, mut ingredients: Vec<Self>) -> DbResult<Vec<Self>> {
        let ids: Vec<i64> = ingredients.iter().map(|i| i.id).collect();
        let mut portions = FoodPortion::load_for_owners(conn, PortionOwner::Ingredient, &ids)?;
        for ingredient in &mut ingredients {
            ingredient.portions = portions.remove(&ingredient.id).unwrap_or_default();
        }
        Ok(ingredients)
    }

    /// Attach a portion to this ingredient
    pub fn add_portion(&mut self, conn: &Connection, portion: &FoodPortion) -> DbResult<&FoodPortion> {
        let saved = FoodPortion::create(conn, PortionOwner::Ingredient, self.id, portion)?;
        self.portions.push(saved);
        Ok(&self.portions[self.portions.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_connection;
    use crate::nutrition::ServingSizeUnit;

    fn create(conn: &Connection, user_id: i64, name: &str, category_id: Option<i64>) -> Ingredient {
        Ingredient::create(
            conn,
            &IngredientCreate {
                user_id,
                name: name.to_string(),
                catalog_food_id: None,
                category_id,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_load_many_is_scoped_to_user() {
        let conn = test_connection();
        let mine = create(&conn, 1, "Apple", None);
        let theirs = create(&conn, 2, "Pear", None);

        let loaded = Ingredient::load_many(&conn, 1, &[mine.id, theirs.id]).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Apple");
        assert_eq!(loaded[0].food_ref(), FoodRef::new(mine.id, None));
    }

    #[test]
    fn test_portions_attached() {
        let conn = test_connection();
        let mut apple = create(&conn, 1, "Apple", Some(3));
        apple
            .add_portion(&conn, &FoodPortion::serving(182.0, ServingSizeUnit::Weight))
            .unwrap();
        create(&conn, 1, "Banana", Some(3));

        let fruit = Ingredient::list_for_category(&conn, 1, 3).unwrap();
        assert_eq!(fruit.len(), 2);
        assert_eq!(fruit[0].portions.len(), 1);
        assert!(fruit[1].portions.is_empty());

        create(&conn, 1, "Butter", Some(4));
        create(&conn, 2, "Cherry", Some(3));
        let all = Ingredient::list_for_category(&conn, 1, ALL_FOODS_CATEGORY_ID).unwrap();
        let names: Vec<&str> = all.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Banana", "Butter"]);
    }
}
