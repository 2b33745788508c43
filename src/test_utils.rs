//! Shared test utilities for the points service.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::catalog::{self, NewProduct},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a dispensing form.
pub async fn create_test_form(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product_form::Model> {
    catalog::create_product_form(db, name).await
}

/// Creates a product with a custom price outside the program.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    product_form_id: i64,
    price: f64,
) -> Result<entities::product::Model> {
    catalog::create_product(
        db,
        NewProduct {
            name: name.to_string(),
            product_form_id,
            description: None,
            price,
        },
    )
    .await
}

/// Creates a user whose email is derived from the name.
pub async fn create_test_user(db: &DatabaseConnection, name: &str) -> Result<entities::user::Model> {
    let email = format!("{}@example.com", name.to_lowercase());
    catalog::create_user(db, name, &email).await
}

/// Creates a pharmacy at a fixed test address.
pub async fn create_test_pharmacy(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::pharmacy::Model> {
    catalog::create_pharmacy(db, name, "1 Test Street").await
}

/// Sets up a database holding a "tablet" form and one product "Test Product".
///
/// # Defaults
/// * price: 10.0
/// * not enrolled in the program
pub async fn setup_with_product() -> Result<(DatabaseConnection, entities::product::Model)> {
    let db = setup_test_db().await?;
    let form = create_test_form(&db, "tablet").await?;
    let product = create_custom_product(&db, "Test Product", form.id, 10.0).await?;
    Ok((db, product))
}
