//! Product form entity - Dispensing forms such as "tablet" or "syrup".
//!
//! Forms are a lookup table referenced by every product. The product service
//! only reads them; they are created by catalog seeding.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product form database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_forms")]
pub struct Model {
    /// Unique identifier for the form
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Form name (e.g., "tablet", "syrup")
    #[sea_orm(unique)]
    pub name: String,
}

/// Defines relationships between `ProductForm` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One form is shared by many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
