//! Catalog management - Creates the reference data the points program runs on.
//!
//! Product forms, products, users and pharmacies are created here with input
//! validation. `seed_catalog` loads a [`CatalogConfig`] into an empty or partly
//! populated database without creating duplicates.

use crate::{
    config::catalog::CatalogConfig,
    core::product::{ProductService, validate_points_parameters},
    entities::{Pharmacy, Product, ProductForm, pharmacy, product, product_form, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::{debug, info, instrument};

/// Fields required to create a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Product name without the form
    pub name: String,
    /// Dispensing form id
    pub product_form_id: i64,
    /// Optional description
    pub description: Option<String>,
    /// Unit price
    pub price: f64,
}

/// Number of rows inserted by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Product forms inserted
    pub product_forms: usize,
    /// Products inserted
    pub products: usize,
    /// Products enrolled in the program while seeding
    pub enrolled: usize,
    /// Pharmacies inserted
    pub pharmacies: usize,
}

fn require_name(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input(format!("{what} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Creates a dispensing form.
///
/// # Errors
/// Returns an error if the name is empty or the insert fails.
pub async fn create_product_form(
    db: &DatabaseConnection,
    name: &str,
) -> Result<product_form::Model> {
    let form = product_form::ActiveModel {
        name: Set(require_name(name, "Product form name")?),
        ..Default::default()
    };
    form.insert(db).await.map_err(Into::into)
}

/// Creates a product outside the points program.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - The product form does not exist
/// - The database insert operation fails
pub async fn create_product(db: &DatabaseConnection, new: NewProduct) -> Result<product::Model> {
    let name = require_name(&new.name, "Product name")?;

    if new.price < 0.0 || !new.price.is_finite() {
        return Err(Error::invalid_input(format!(
            "Invalid product price: {}",
            new.price
        )));
    }

    ProductForm::find_by_id(new.product_form_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Product form", new.product_form_id))?;

    let product = product::ActiveModel {
        name: Set(name),
        product_form_id: Set(new.product_form_id),
        description: Set(new.description),
        price: Set(new.price),
        is_in_program: Set(false),
        points_per_purchase: Set(None),
        points_for_redemption: Set(None),
        ..Default::default()
    };
    let product = product.insert(db).await?;
    debug!("Created product '{}' (ID: {})", product.name, product.id);
    Ok(product)
}

/// Creates a program member.
///
/// # Errors
/// Returns an error if the name or email is empty or the insert fails.
pub async fn create_user(db: &DatabaseConnection, name: &str, email: &str) -> Result<user::Model> {
    let user = user::ActiveModel {
        name: Set(require_name(name, "User name")?),
        email: Set(require_name(email, "User email")?),
        ..Default::default()
    };
    user.insert(db).await.map_err(Into::into)
}

/// Creates a pharmacy.
///
/// # Errors
/// Returns an error if the name is empty or the insert fails.
pub async fn create_pharmacy(
    db: &DatabaseConnection,
    name: &str,
    address: &str,
) -> Result<pharmacy::Model> {
    let pharmacy = pharmacy::ActiveModel {
        name: Set(require_name(name, "Pharmacy name")?),
        address: Set(address.trim().to_string()),
        ..Default::default()
    };
    pharmacy.insert(db).await.map_err(Into::into)
}

/// Seeds forms, products and pharmacies from a catalog configuration.
///
/// Existing rows (matched by name, and by name and form for products) are left
/// untouched, so running the seed twice inserts nothing the second time.
/// Products with both point parameters configured are enrolled when inserted.
///
/// # Errors
/// Returns an error if a product names an unknown form, a value fails
/// validation, or a database operation fails.
#[instrument(skip(db, config))]
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for form_name in &config.product_forms {
        let existing = ProductForm::find()
            .filter(product_form::Column::Name.eq(form_name.trim()))
            .one(db)
            .await?;
        if existing.is_none() {
            create_product_form(db, form_name).await?;
            summary.product_forms += 1;
        }
    }

    let service = ProductService::new(db.clone());
    for seed in &config.products {
        let form = ProductForm::find()
            .filter(product_form::Column::Name.eq(seed.form.trim()))
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("Product form", &seed.form))?;

        let existing = Product::find()
            .filter(product::Column::Name.eq(seed.name.trim()))
            .filter(product::Column::ProductFormId.eq(form.id))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        // Checked before the insert so a bad seed never leaves a stored, unenrolled product
        let enrollment = match (seed.points_per_purchase, seed.points_for_redemption) {
            (Some(per_purchase), Some(for_redemption)) => {
                validate_points_parameters(per_purchase, for_redemption)?;
                Some((per_purchase, for_redemption))
            }
            (per_purchase, for_redemption) => {
                validate_points_parameters(
                    per_purchase.unwrap_or(0),
                    for_redemption.unwrap_or(0),
                )?;
                None
            }
        };

        let product = create_product(
            db,
            NewProduct {
                name: seed.name.clone(),
                product_form_id: form.id,
                description: seed.description.clone(),
                price: seed.price,
            },
        )
        .await?;
        summary.products += 1;

        if let Some((per_purchase, for_redemption)) = enrollment {
            service
                .register_product_in_program(product.id, per_purchase, for_redemption)
                .await?;
            summary.enrolled += 1;
        }
    }

    for seed in &config.pharmacies {
        let existing = Pharmacy::find()
            .filter(pharmacy::Column::Name.eq(seed.name.trim()))
            .one(db)
            .await?;
        if existing.is_none() {
            create_pharmacy(db, &seed.name, &seed.address).await?;
            summary.pharmacies += 1;
        }
    }

    info!(
        "Catalog seeded: {} forms, {} products ({} enrolled), {} pharmacies inserted",
        summary.product_forms, summary.products, summary.enrolled, summary.pharmacies
    );
    Ok(summary)
}
