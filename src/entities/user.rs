//! User entity - Program members who accrue and redeem points.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, shown as the client name on requests
    pub name: String,
    /// Contact email
    #[sea_orm(unique)]
    pub email: String,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Point balances held by this user
    #[sea_orm(has_many = "super::user_product_points::Entity")]
    Points,
    /// Redemptions made by this user
    #[sea_orm(has_many = "super::trade::Entity")]
    Trades,
    /// Purchase requests submitted by this user
    #[sea_orm(has_many = "super::request::Entity")]
    Requests,
}

impl Related<super::user_product_points::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Points.def()
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
