use crate::entities::user;
use serde::{Deserialize, Serialize};

/// User as embedded in a [`RequestOut`](super::RequestOut).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOut {
    /// User id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
}

impl From<user::Model> for UserOut {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}
