//! Seed catalog loading from catalog.toml
//!
//! The catalog file lists the dispensing forms, products and pharmacies that
//! should exist when the service starts. Products that carry both point
//! parameters are enrolled in the program while seeding.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Path used when `CATALOG_CONFIG` is not set.
pub const DEFAULT_CATALOG_PATH: &str = "catalog.toml";

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Dispensing form names
    #[serde(default)]
    pub product_forms: Vec<String>,
    /// Products to create
    #[serde(default)]
    pub products: Vec<ProductSeed>,
    /// Pharmacies to create
    #[serde(default)]
    pub pharmacies: Vec<PharmacySeed>,
}

/// A product entry in the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSeed {
    /// Product name without the form
    pub name: String,
    /// Name of a form listed in `product_forms` or already stored
    pub form: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price
    pub price: f64,
    /// Points earned per unit; enrolls the product together with `points_for_redemption`
    #[serde(default)]
    pub points_per_purchase: Option<i64>,
    /// Points needed to redeem one unit
    #[serde(default)]
    pub points_for_redemption: Option<i64>,
}

/// A pharmacy entry in the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct PharmacySeed {
    /// Pharmacy name
    pub name: String,
    /// Street address
    #[serde(default)]
    pub address: String,
}

/// Loads the catalog from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load catalog from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Path of the catalog file, from `CATALOG_CONFIG` or the default.
#[must_use]
pub fn catalog_path() -> String {
    std::env::var("CATALOG_CONFIG").unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string())
}
