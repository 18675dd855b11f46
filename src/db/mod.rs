//! Database module
//!
//! Handles SQLite connection and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{in_transaction, Database, DbError, DbResult};
pub(crate) use connection::placeholders;
