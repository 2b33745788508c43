//! Pharmacy entity - Where a claimed purchase was made.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pharmacy database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pharmacies")]
pub struct Model {
    /// Unique identifier for the pharmacy
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Pharmacy name
    #[sea_orm(unique)]
    pub name: String,
    /// Street address
    pub address: String,
}

/// Defines relationships between Pharmacy and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Purchase requests made at this pharmacy
    #[sea_orm(has_many = "super::request::Entity")]
    Requests,
}

impl Related<super::request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
