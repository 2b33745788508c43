//! Association between users and products holding the accumulated point balance.
//!
//! The table is sparse: a missing `(user_id, product_id)` row means a zero
//! balance, not an error.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-user, per-product point balance
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_product_points")]
pub struct Model {
    /// Owner of the balance
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    /// Product the points were earned on
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i64,
    /// Redeemable points
    pub points: i64,
}

/// Defines relationships between `UserProductPoints` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each balance belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each balance belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
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
