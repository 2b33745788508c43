//! Request entity - A purchase claim submitted by a user to earn points.
//!
//! The invoice image is stored as an already-encoded text blob and is opaque to
//! this crate. `request_state` is free text; no transition rules are enforced.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase request database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Invoice number printed on the receipt
    pub invoice_id: i64,
    /// Date of the purchase
    pub purchase_date: Date,
    /// Units purchased
    pub product_quantity: i64,
    /// Encoded invoice image
    #[sea_orm(column_type = "Text")]
    pub invoice_image: String,
    /// Current workflow state (e.g. `"pending"`)
    pub request_state: String,
    /// Pharmacy where the purchase was made
    pub pharmacy_id: i64,
    /// User claiming the purchase
    pub user_id: i64,
    /// Product purchased
    pub product_id: i64,
}

/// Defines relationships between Request and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each request names one pharmacy
    #[sea_orm(
        belongs_to = "super::pharmacy::Entity",
        from = "Column::PharmacyId",
        to = "super::pharmacy::Column::Id"
    )]
    Pharmacy,
    /// Each request is submitted by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each request claims one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::pharmacy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pharmacy.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
