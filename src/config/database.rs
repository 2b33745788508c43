//! Database configuration module for the points service.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches the
//! Rust structs without hand-written SQL.

use crate::entities::{
    Pharmacy, Product, ProductForm, Request, Trade, User, UserProductPoints,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/pharmacy_points.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to [`DEFAULT_DATABASE_URL`] if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    connect_to(&get_database_url()).await
}

/// Connects to `database_url`, creating the parent directory of a file-backed
/// `SQLite` database first.
///
/// # Errors
/// Returns `Error::Io` if the directory cannot be created, or `Error::Database`
/// if the connection fails.
pub async fn connect_to(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url)
        .as_deref()
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
        debug!("Ensured database directory {}", parent.display());
    }

    debug!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// File path of a `SQLite` URL, or `None` for in-memory and non-`SQLite` URLs.
fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Creates all tables that do not exist yet.
///
/// Referenced tables are created before the tables holding foreign keys to them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(ProductForm),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Pharmacy),
        schema.create_table_from_entity(UserProductPoints),
        schema.create_table_from_entity(Trade),
        schema.create_table_from_entity(Request),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    info!("Database tables ensured ({} tables).", statements.len());
    Ok(())
}
