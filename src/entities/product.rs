//! Product entity - Items sold in pharmacies, optionally enrolled in the points program.
//!
//! `points_per_purchase` and `points_for_redemption` are only meaningful once
//! `is_in_program` is true. Enrollment is one-way.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product without its form (e.g., "Ibuprofen 400mg")
    pub name: String,
    /// ID of the dispensing form
    pub product_form_id: i64,
    /// Optional free-text description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Unit price
    pub price: f64,
    /// Whether the product is enrolled in the points program
    pub is_in_program: bool,
    /// Points earned per unit purchased
    pub points_per_purchase: Option<i64>,
    /// Points required to redeem one unit
    pub points_for_redemption: Option<i64>,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product has one dispensing form
    #[sea_orm(
        belongs_to = "super::product_form::Entity",
        from = "Column::ProductFormId",
        to = "super::product_form::Column::Id"
    )]
    ProductForm,
    /// Per-user point balances for this product
    #[sea_orm(has_many = "super::user_product_points::Entity")]
    UserPoints,
    /// Redemptions of this product
    #[sea_orm(has_many = "super::trade::Entity")]
    Trades,
    /// Purchase requests claiming this product
    #[sea_orm(has_many = "super::request::Entity")]
    Requests,
}

impl Related<super::product_form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductForm.def()
    }
}

impl Related<super::user_product_points::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserPoints.def()
    }
}

impl Related<super::trade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trades.def()
    }
}

impl Related<super::request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
