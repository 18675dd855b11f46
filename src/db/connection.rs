//! Database connection management
//!
//! Provides SQLite connection pooling and management.

use std::path::Path;
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Pragmas applied to every new connection
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;
     PRAGMA journal_mode = WAL;
     PRAGMA synchronous = NORMAL;
     PRAGMA temp_store = MEMORY;";

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl Database {
    /// Create a new database connection pool
    pub fn new<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));

        let pool = Pool::builder().max_size(10).build(manager)?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get a connection from the pool
    pub fn get_conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Execute a closure with a database connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> DbResult<T>,
    {
        let conn = self.get_conn()?;
        f(&conn)
    }
}

/// Run `f` atomically, rolling back on error
///
/// Inside an already open transaction `f` joins it instead of nesting.
pub fn in_transaction<F, T>(conn: &Connection, f: F) -> DbResult<T>
where
    F: FnOnce(&Connection) -> DbResult<T>,
{
    if !conn.is_autocommit() {
        return f(conn);
    }

    let tx = conn.unchecked_transaction()?;
    let result = f(&tx)?;
    tx.commit()?;
    Ok(result)
}

/// Build "?, ?, ?" for an IN list of `count` parameters
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[cfg(test)]
pub(crate) fn test_connection() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().expect("in-memory database");
    conn.execute_batch("PRAGMA foreign_keys = ON;").expect("pragma");
    super::migrations::run_migrations(&conn).expect("migrations");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }

    #[test]
    fn test_file_database_runs_migrations() {
        let dir = std::env::temp_dir().join(format!("nourish-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let db = Database::new(dir.join("nourish.db")).unwrap();

        let version = db
            .with_conn(|conn| {
                super::super::migrations::run_migrations(conn)?;
                super::super::migrations::get_schema_version(conn)
            })
            .unwrap();
        assert_eq!(version, super::super::migrations::SCHEMA_VERSION);

        std::fs::remove_dir_all(&dir).ok();
    }

    fn meal_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM meals", [], |row| row.get(0)).unwrap()
    }

    fn insert_meal(conn: &Connection) -> DbResult<()> {
        conn.execute(
            "INSERT INTO meals (external_id, user_id, meal_date) VALUES (?1, 1, '2025-01-09')",
            [uuid::Uuid::new_v4()],
        )?;
        Ok(())
    }

    #[test]
    fn test_in_transaction_rolls_back_on_error() {
        let conn = test_connection();

        let result: DbResult<()> = in_transaction(&conn, |conn| {
            insert_meal(conn)?;
            Err(DbError::InvalidInput("abort".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(meal_count(&conn), 0);
        assert!(conn.is_autocommit());

        in_transaction(&conn, insert_meal).unwrap();
        assert_eq!(meal_count(&conn), 1);
    }

    #[test]
    fn test_in_transaction_joins_open_transaction() {
        let conn = test_connection();
        let outer = conn.unchecked_transaction().unwrap();
        in_transaction(&outer, insert_meal).unwrap();
        outer.rollback().unwrap();
        assert_eq!(meal_count(&conn), 0);
    }
}
