//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        tracing::info!("Applying schema migration v1");
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: foods, nutrients, portions, recipes, meals and memberships
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- CATALOG FOODS
        -- Imported reference foods (USDA / branded)
        -- ============================================
        CREATE TABLE catalog_foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            external_id BLOB NOT NULL UNIQUE,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Amount per 100 reference units; NULL means not measured
        CREATE TABLE catalog_food_nutrients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            catalog_food_id INTEGER NOT NULL REFERENCES catalog_foods(id) ON DELETE CASCADE,
            nutrient_id INTEGER NOT NULL,
            amount REAL CHECK(amount IS NULL OR amount >= 0),
            UNIQUE(catalog_food_id, nutrient_id)
        );

        -- ============================================
        -- USER INGREDIENTS
        -- User foods, optionally backed by a catalog food
        -- ============================================
        CREATE TABLE ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            external_id BLOB NOT NULL UNIQUE,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            catalog_food_id INTEGER REFERENCES catalog_foods(id) ON DELETE SET NULL,
            category_id INTEGER,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_ingredients_user ON ingredients(user_id);

        -- User overrides, per nutrient
        CREATE TABLE user_food_nutrients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
            nutrient_id INTEGER NOT NULL,
            amount REAL CHECK(amount IS NULL OR amount >= 0),
            UNIQUE(ingredient_id, nutrient_id)
        );

        CREATE INDEX idx_user_food_nutrients_user ON user_food_nutrients(user_id);

        -- ============================================
        -- RECIPES AND MEALS
        -- ============================================
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            external_id BLOB NOT NULL UNIQUE,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipes_user ON recipes(user_id);

        CREATE TABLE meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            external_id BLOB NOT NULL UNIQUE,
            user_id INTEGER NOT NULL,
            meal_date TEXT NOT NULL,             -- ISO date: "2025-01-09"
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meals_user_date ON meals(user_id, meal_date);

        -- ============================================
        -- MEMBERSHIPS
        -- meal => {ingredient|recipe}, recipe => {ingredient|recipe}
        -- ============================================
        CREATE TABLE memberships (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            external_id BLOB NOT NULL UNIQUE,
            user_id INTEGER NOT NULL,
            parent_type TEXT NOT NULL CHECK(parent_type IN ('meal', 'recipe')),
            parent_id INTEGER NOT NULL,
            child_type TEXT NOT NULL CHECK(child_type IN ('ingredient', 'recipe')),
            child_id INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            CHECK(NOT (parent_type = child_type AND parent_id = child_id))
        );

        CREATE INDEX idx_memberships_parent ON memberships(parent_type, parent_id);
        CREATE INDEX idx_memberships_child ON memberships(child_type, child_id);

        -- ============================================
        -- FOOD PORTIONS
        -- Named servings of catalog foods, ingredients, recipes,
        -- and the logged serving of a membership
        -- ============================================
        CREATE TABLE food_portions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            external_id BLOB NOT NULL UNIQUE,
            owner_type TEXT NOT NULL CHECK(owner_type IN ('catalog_food', 'ingredient', 'recipe', 'membership')),
            owner_id INTEGER NOT NULL,
            servings_per_container REAL CHECK(servings_per_container IS NULL OR servings_per_container >= 0),
            serving_size REAL CHECK(serving_size IS NULL OR serving_size >= 0),
            serving_size_unit TEXT CHECK(serving_size_unit IS NULL OR serving_size_unit IN ('g', 'ml')),
            gram_weight REAL CHECK(gram_weight IS NULL OR gram_weight >= 0),
            quantity REAL CHECK(quantity IS NULL OR quantity >= 0),
            amount REAL CHECK(amount IS NULL OR amount >= 0),
            measure_unit_id INTEGER,
            portion_description TEXT,
            modifier TEXT,
            CHECK(serving_size IS NOT NULL OR gram_weight IS NOT NULL)
        );

        CREATE INDEX idx_food_portions_owner ON food_portions(owner_type, owner_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_self_membership_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO memberships (external_id, user_id, parent_type, parent_id, child_type, child_id)
             VALUES (x'00', 1, 'recipe', 7, 'recipe', 7)",
            [],
        );
        assert!(result.is_err());
    }
}
