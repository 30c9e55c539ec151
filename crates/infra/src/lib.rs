//! Infrastructure layer: storage adapters behind the product repository contract.

pub mod repository;

pub use repository::{InMemoryProductsRepository, PostgresProductsRepository};
