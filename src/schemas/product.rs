//! Product projections and points statistics.
//!
//! A product is exposed in two shapes: [`ProductOut`] carries price, description
//! and program parameters, while [`SimpleProduct`] is the summary used by
//! listings. Both display the product name joined with its dispensing form.

use crate::{
    entities::product,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Full product detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOut {
    /// Product id
    pub id: i64,
    /// Name followed by the form, e.g. "Ibuprofen tablet"
    pub name: String,
    /// Name without the form
    pub only_name: String,
    /// Dispensing form name
    pub product_form: String,
    /// Optional description
    pub description: Option<String>,
    /// Unit price
    pub price: f64,
    /// Program enrollment flag
    pub is_in_program: bool,
    /// Points earned per unit purchased
    pub points_per_purchase: Option<i64>,
    /// Points required to redeem one unit
    pub points_for_redemption: Option<i64>,
    /// Points held by the requesting user, 0 when not user-scoped
    pub points_count: i64,
}

impl ProductOut {
    /// Projects a product model with its form name and a points count.
    #[must_use]
    pub fn from_model(product: &product::Model, form_name: &str, points_count: i64) -> Self {
        Self {
            id: product.id,
            name: display_name(&product.name, form_name),
            only_name: product.name.clone(),
            product_form: form_name.to_string(),
            description: product.description.clone(),
            price: product.price,
            is_in_program: product.is_in_program,
            points_per_purchase: product.points_per_purchase,
            points_for_redemption: product.points_for_redemption,
            points_count,
        }
    }
}

/// Summary shape used by product listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleProduct {
    /// Product id
    pub id: i64,
    /// Name followed by the form
    pub name: String,
    /// Name without the form
    pub only_name: String,
    /// Dispensing form name
    pub product_form: String,
    /// Points held by the requesting user, 0 when not user-scoped
    pub points_count: i64,
    /// Program enrollment flag
    pub is_in_program: bool,
}

impl SimpleProduct {
    /// Projects a product model with its form name and a points count.
    #[must_use]
    pub fn from_model(product: &product::Model, form_name: &str, points_count: i64) -> Self {
        Self {
            id: product.id,
            name: display_name(&product.name, form_name),
            only_name: product.name.clone(),
            product_form: form_name.to_string(),
            points_count,
            is_in_program: product.is_in_program,
        }
    }
}

/// Result of listing products with an optional textual enrollment filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProductListing {
    /// No filter given: every product, summary shape
    Simple(Vec<SimpleProduct>),
    /// Filtered by enrollment: full detail shape
    Detailed(Vec<ProductOut>),
}

impl ProductListing {
    /// Number of products in the listing.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Simple(products) => products.len(),
            Self::Detailed(products) => products.len(),
        }
    }

    /// Whether the listing is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Enrollment filter accepted by product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramFilter {
    /// Only products enrolled in the program
    Enrolled,
    /// Only products not enrolled
    NotEnrolled,
}

impl ProgramFilter {
    /// Value of `is_in_program` selected by this filter.
    #[must_use]
    pub const fn is_in_program(self) -> bool {
        matches!(self, Self::Enrolled)
    }
}

impl FromStr for ProgramFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "true" => Ok(Self::Enrolled),
            "false" => Ok(Self::NotEnrolled),
            _ => Err(Error::invalid_input("Invalid input. True or False expected")),
        }
    }
}

/// Points accounting for one product of one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPointsStats {
    /// Points consumed by trades
    pub used_points: i64,
    /// Redeemable balance
    pub available_points: i64,
    /// `available_points + used_points`
    pub total_points: i64,
}

fn display_name(name: &str, form_name: &str) -> String {
    format!("{name} {form_name}")
}
