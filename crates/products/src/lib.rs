//! Products domain module.
//!
//! This crate holds the product entity, its field rules, and the repository
//! contract that storage adapters implement. No IO lives here.

pub mod product;
pub mod repository;

pub use product::Product;
pub use repository::{ProductsRepository, RepositoryError, RepositoryResult};
