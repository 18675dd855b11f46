//! Meal model
//!
//! A dated container of logged ingredients and recipes. Meals are never
//! members of anything.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::membership::{Membership, ParentKind};
use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub external_id: Uuid,
    pub user_id: i64,
    pub meal_date: NaiveDate,
    pub members: Vec<Membership>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealCreate {
    pub user_id: i64,
    pub meal_date: NaiveDate,
}

impl Meal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            external_id: row.get("external_id")?,
            user_id: row.get("user_id")?,
            meal_date: row.get("meal_date")?,
            members: Vec::new(),
        })
    }

    pub fn create(conn: &Connection, data: &MealCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO meals (external_id, user_id, meal_date) VALUES (?1, ?2, ?3)",
            params![Uuid::new_v4(), data.user_id, data.meal_date],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "meal", id })
    }

    /// Get a meal by ID, with members
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(meal) => Ok(Self::hydrate(conn, vec![meal])?.pop()),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A user's meals dated within `[start, end]`, oldest first
    pub fn load_in_range(
        conn: &Connection,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM meals
            WHERE user_id = ?1 AND meal_date >= ?2 AND meal_date <= ?3
            ORDER BY meal_date, id
            "#,
        )?;
        let meals = stmt
            .query_map(params![user_id, start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(user_id, %start, %end, count = meals.len(), "Loaded meals");
        Self::hydrate(conn, meals)
    }

    /// A user's most recent meals, newest first
    pub fn load_recent(conn: &Connection, user_id: i64, max_meals: usize) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meals WHERE user_id = ?1 ORDER BY meal_date DESC, id DESC LIMIT ?2",
        )?;
        let meals = stmt
            .query_map(params![user_id, max_meals as i64], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::hydrate(conn, meals)
    }

    fn hydrate(conn: &Connection, mut meals: Vec<Self>) -> DbResult<Vec<Self>> {
        let ids: Vec<i64> = meals.iter().map(|m| m.id).collect();
        let mut members = Membership::load_for_parents(conn, ParentKind::Meal, &ids)?;
        for meal in &mut meals {
            meal.members = members.remove(&meal.id).unwrap_or_default();
        }
        Ok(meals)
    }
}
