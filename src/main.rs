//! Nourish
//!
//! Command line front end for the nutrient aggregation engine.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nourish::catalog;
use nourish::db::{self, Database, DbError};
use nourish::models::{CatalogFood, Ingredient};
use nourish::nutrition::{self, DEFAULT_MAX_ITEMS, DEFAULT_MAX_MEALS, DEFAULT_TRACKER_DAYS};
use nourish::portions::{display_choices_for, PortionedFood};

#[derive(Parser)]
#[command(name = "nourish", version, about = "Nutrient totals for foods, recipes and meals")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Per-day totals of a nutrient over a window ending today
    Tracker {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        nutrient: i64,
        #[arg(long, default_value_t = DEFAULT_TRACKER_DAYS)]
        days: u32,
        /// Last day of the window (YYYY-MM-DD), defaults to the local date
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Ingredients from recent meals richest in a nutrient
    Recent {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        nutrient: i64,
        #[arg(long, default_value_t = DEFAULT_MAX_ITEMS)]
        max_items: usize,
        #[arg(long, default_value_t = DEFAULT_MAX_MEALS)]
        max_meals: usize,
    },
    /// Selectable portions for an ingredient
    Portions {
        #[arg(long)]
        ingredient: i64,
    },
    /// Every id that refers to the same nutrient
    Aliases { nutrient: i64 },
    /// Food groups an ingredient can be filed under
    Categories,
    /// Apply pending schema migrations
    Migrate,
}

/// Get the database path from environment or use default
fn get_database_path() -> PathBuf {
    std::env::var("NOURISH_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("nourish.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nourish=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let db_path = get_database_path();
    tracing::info!(path = %db_path.display(), "Opening database");
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;
    let migrated = database.with_conn(|conn| {
        let pending = db::migrations::needs_migration(conn)?;
        if pending {
            tracing::info!("Applying pending migrations");
            db::migrations::run_migrations(conn)?;
        }
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!(version, "Database schema ready");
        Ok(pending)
    })?;

    match cli.command {
        Command::Tracker {
            user,
            nutrient,
            days,
            today,
        } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let per_day = database
                .with_conn(|conn| nutrition::tracker_amounts(conn, user, nutrient, days, today))?;
            let output = serde_json::json!({
                "nutrient": catalog::display_name(nutrient),
                "unit": catalog::display_unit(nutrient),
                "days": per_day,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Recent {
            user,
            nutrient,
            max_items,
            max_meals,
        } => {
            let foods = database.with_conn(|conn| {
                nutrition::recent_foods_for_nutrient(conn, user, nutrient, max_items, max_meals)
            })?;
            for food in foods {
                println!("{}\t{}", food.id, food.name);
            }
        }
        Command::Portions { ingredient } => {
            let choices = database.with_conn(|conn| {
                let food = Ingredient::get_by_id(conn, ingredient)?.ok_or(DbError::NotFound {
                    entity: "ingredient",
                    id: ingredient,
                })?;
                let catalog_food = match food.catalog_food_id {
                    Some(id) => CatalogFood::get_by_id(conn, id)?,
                    None => None,
                };
                Ok(display_choices_for(
                    Some(PortionedFood::Ingredient(&food)),
                    catalog_food.as_ref(),
                ))
            })?;
            println!("{}", serde_json::to_string_pretty(&choices)?);
        }
        Command::Aliases { nutrient } => {
            let aliases = nutrition::resolve_aliases(nutrient);
            if aliases.is_empty() {
                eprintln!("Unknown nutrient: {}", nutrient);
                std::process::exit(1);
            }
            let name = catalog::display_name(nutrient).unwrap_or_default();
            let ids: Vec<String> = aliases.iter().map(|id| id.to_string()).collect();
            println!("{} ({}): {}", name, catalog::display_unit(nutrient), ids.join(", "));
        }
        Command::Categories => {
            for (id, description) in catalog::category_choices() {
                println!("{}\t{}", id, description);
            }
        }
        Command::Migrate => {
            let version = database.with_conn(db::migrations::get_schema_version)?;
            if migrated {
                println!("Migrated to schema version {}", version);
            } else {
                println!("Schema version {} is up to date", version);
            }
        }
    }

    Ok(())
}
