//! Membership model
//!
//! Directed edges meal => {ingredient|recipe} and recipe => {ingredient|recipe}.
//! Every membership owns the portion it was logged at.

use std::collections::{HashMap, HashSet};

use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::nutrient_record::FoodRef;
use super::portion::{FoodPortion, PortionOwner};
use crate::db::{in_transaction, placeholders, DbError, DbResult};

/// Kind of container a membership hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentKind {
    Meal,
    Recipe,
}

impl ParentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentKind::Meal => "meal",
            ParentKind::Recipe => "recipe",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "meal" => Some(ParentKind::Meal),
            "recipe" => Some(ParentKind::Recipe),
            _ => None,
        }
    }
}

/// What a membership points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberChild {
    Ingredient(FoodRef),
    Recipe { id: i64 },
}

impl MemberChild {
    fn type_str(&self) -> &'static str {
        match self {
            MemberChild::Ingredient(_) => "ingredient",
            MemberChild::Recipe { .. } => "recipe",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            MemberChild::Ingredient(food) => food.ingredient_id,
            MemberChild::Recipe { id } => *id,
        }
    }
}

/// A child logged into a meal or recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: i64,
    pub external_id: Uuid,
    pub user_id: i64,
    pub parent_kind: ParentKind,
    pub parent_id: i64,
    pub child: MemberChild,
    /// The serving the child was logged at
    pub portion: FoodPortion,
}

/// Data for logging a child into a container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipCreate {
    pub user_id: i64,
    pub parent_kind: ParentKind,
    pub parent_id: i64,
    pub child: MemberChild,
    pub portion: FoodPortion,
}

const SELECT_MEMBERSHIPS: &str = r#"
    SELECT m.*, i.catalog_food_id AS child_catalog_food_id
    FROM memberships m
    LEFT JOIN ingredients i ON m.child_type = 'ingredient' AND i.id = m.child_id
"#;

/// Row data before the owned portion is attached
struct MembershipRow {
    id: i64,
    external_id: Uuid,
    user_id: i64,
    parent_kind: ParentKind,
    parent_id: i64,
    child: MemberChild,
}

impl MembershipRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let child_id: i64 = row.get("child_id")?;

        let child = match text_column(row, "child_type")?.as_str() {
            "recipe" => MemberChild::Recipe { id: child_id },
            "ingredient" => {
                MemberChild::Ingredient(FoodRef::new(child_id, row.get("child_catalog_food_id")?))
            }
            other => return Err(invalid_column(row, "child_type", other)),
        };

        Ok(Self {
            id: row.get("id")?,
            external_id: row.get("external_id")?,
            user_id: row.get("user_id")?,
            parent_kind: parent_kind_column(row)?,
            parent_id: row.get("parent_id")?,
            child,
        })
    }

    fn with_portion(self, portion: FoodPortion) -> Membership {
        Membership {
            id: self.id,
            external_id: self.external_id,
            user_id: self.user_id,
            parent_kind: self.parent_kind,
            parent_id: self.parent_id,
            child: self.child,
            portion,
        }
    }
}

fn text_column(row: &Row, column: &str) -> rusqlite::Result<String> {
    row.get(column)
}

fn invalid_column(row: &Row, column: &str, value: &str) -> rusqlite::Error {
    let index = row.as_ref().column_index(column).unwrap_or_default();
    rusqlite::Error::FromSqlConversionFailure(
        index,
        Type::Text,
        format!("unknown {} '{}'", column, value).into(),
    )
}

fn parent_kind_column(row: &Row) -> rusqlite::Result<ParentKind> {
    let parent_type = text_column(row, "parent_type")?;
    ParentKind::from_str(&parent_type).ok_or_else(|| invalid_column(row, "parent_type", &parent_type))
}

impl Membership {
    /// Log a child into a meal or recipe
    ///
    /// Refuses self-membership and any recipe edge that would close a cycle.
    pub fn create(conn: &Connection, data: &MembershipCreate) -> DbResult<Self> {
        if let (ParentKind::Recipe, MemberChild::Recipe { id: child_id }) = (data.parent_kind, data.child) {
            if child_id == data.parent_id {
                return Err(DbError::InvalidInput(
                    "A recipe cannot contain itself".to_string(),
                ));
            }
            if would_create_cycle(conn, data.parent_id, child_id)? {
                return Err(DbError::InvalidInput(
                    "Adding this recipe would create a circular reference".to_string(),
                ));
            }
        }

        data.portion.validate()?;

        in_transaction(conn, |conn| {
            conn.execute(
                r#"
                INSERT INTO memberships (external_id, user_id, parent_type, parent_id, child_type, child_id)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    Uuid::new_v4(),
                    data.user_id,
                    data.parent_kind.as_str(),
                    data.parent_id,
                    data.child.type_str(),
                    data.child.id(),
                ],
            )?;

            let id = conn.last_insert_rowid();
            FoodPortion::create(conn, PortionOwner::Membership, id, &data.portion)?;

            Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "membership", id })
        })
    }

    /// Get a membership by ID, with its logged portion
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(&format!("{} WHERE m.id = ?1", SELECT_MEMBERSHIPS))?;

        let row = match stmt.query_row([id], MembershipRow::from_row) {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let portion = FoodPortion::list_for_owner(conn, PortionOwner::Membership, id)?
            .into_iter()
            .next()
            .ok_or(DbError::NotFound { entity: "membership portion", id })?;

        Ok(Some(row.with_portion(portion)))
    }

    /// Memberships of many parents of one kind, grouped by parent id
    pub fn load_for_parents(
        conn: &Connection,
        parent_kind: ParentKind,
        parent_ids: &[i64],
    ) -> DbResult<HashMap<i64, Vec<Self>>> {
        let mut grouped: HashMap<i64, Vec<Self>> = HashMap::new();
        if parent_ids.is_empty() {
            return Ok(grouped);
        }

        let sql = format!(
            "{} WHERE m.parent_type = ? AND m.parent_id IN ({}) ORDER BY m.id",
            SELECT_MEMBERSHIPS,
            placeholders(parent_ids.len())
        );
        let mut values: Vec<Value> = vec![parent_kind.as_str().to_string().into()];
        values.extend(parent_ids.iter().map(|id| Value::from(*id)));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), MembershipRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut portions = FoodPortion::load_for_owners(conn, PortionOwner::Membership, &ids)?;

        for row in rows {
            let id = row.id;
            let portion = portions
                .remove(&id)
                .and_then(|p| p.into_iter().next())
                .ok_or(DbError::NotFound { entity: "membership portion", id })?;
            grouped.entry(row.parent_id).or_default().push(row.with_portion(portion));
        }

        Ok(grouped)
    }

    /// Remove a membership and its portion
    ///
    /// A meal left without members is deleted as well.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        in_transaction(conn, |conn| {
            let Some(membership) = Self::get_by_id(conn, id)? else {
                return Ok(false);
            };

            FoodPortion::delete_for_owner(conn, PortionOwner::Membership, id)?;
            conn.execute("DELETE FROM memberships WHERE id = ?1", [id])?;

            if membership.parent_kind == ParentKind::Meal {
                let remaining: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM memberships WHERE parent_type = 'meal' AND parent_id = ?1",
                    [membership.parent_id],
                    |row| row.get(0),
                )?;
                if remaining == 0 {
                    tracing::debug!(meal_id = membership.parent_id, "Deleting empty meal");
                    conn.execute("DELETE FROM meals WHERE id = ?1", [membership.parent_id])?;
                }
            }

            Ok(true)
        })
    }
}

/// Recipe ids directly contained in a recipe
fn child_recipe_ids(conn: &Connection, recipe_id: i64) -> DbResult<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT child_id FROM memberships WHERE parent_type = 'recipe' AND parent_id = ?1 AND child_type = 'recipe'",
    )?;
    let ids = stmt
        .query_map([recipe_id], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

/// Check if adding `child_recipe_id` to `recipe_id` would create a circular reference
pub fn would_create_cycle(conn: &Connection, recipe_id: i64, child_recipe_id: i64) -> DbResult<bool> {
    // A cycle exists if recipe_id is reachable from child_recipe_id
    let mut visited = HashSet::new();
    let mut to_check = vec![child_recipe_id];

    while let Some(current) = to_check.pop() {
        if current == recipe_id {
            return Ok(true);
        }

        if !visited.insert(current) {
            continue;
        }

        to_check.extend(child_recipe_ids(conn, current)?);
    }

    Ok(false)
}
