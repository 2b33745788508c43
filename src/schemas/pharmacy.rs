use crate::entities::pharmacy;
use serde::{Deserialize, Serialize};

/// Pharmacy as embedded in a [`RequestOut`](super::RequestOut).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PharmacyOut {
    /// Pharmacy id
    pub id: i64,
    /// Pharmacy name
    pub name: String,
    /// Street address
    pub address: String,
}

impl From<pharmacy::Model> for PharmacyOut {
    fn from(model: pharmacy::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
        }
    }
}
