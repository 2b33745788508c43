//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod pharmacy;
pub mod product;
pub mod product_form;
pub mod request;
pub mod trade;
pub mod user;
pub mod user_product_points;

// Re-export specific types to avoid conflicts
pub use pharmacy::{Column as PharmacyColumn, Entity as Pharmacy, Model as PharmacyModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_form::{
    Column as ProductFormColumn, Entity as ProductForm, Model as ProductFormModel,
};
pub use request::{Column as RequestColumn, Entity as Request, Model as RequestModel};
pub use trade::{Column as TradeColumn, Entity as Trade, Model as TradeModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use user_product_points::{
    Column as UserProductPointsColumn, Entity as UserProductPoints,
    Model as UserProductPointsModel,
};
