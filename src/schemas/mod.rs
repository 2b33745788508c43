//! Transfer records crossing the service boundary.
//!
//! Entities stay inside the crate's core; callers only ever see these shapes.

pub mod pharmacy;
pub mod product;
pub mod request;
pub mod user;

pub use pharmacy::PharmacyOut;
pub use product::{ProductListing, ProductOut, ProductPointsStats, ProgramFilter, SimpleProduct};
pub use request::{RequestIn, RequestOut, RequestStateUpdate, SimpleRequest};
pub use user::UserOut;
