//! Core business logic - framework-agnostic catalog, points and request operations.

/// Creation and seeding of forms, products, users and pharmacies
pub mod catalog;
/// Point balances, trades and points statistics
pub mod points;
/// Product queries and program enrollment
pub mod product;
/// Purchase request workflow
pub mod request;

pub use product::ProductService;
