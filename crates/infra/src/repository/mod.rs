//! Product repository adapters, one per store technology.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductsRepository;
pub use postgres::PostgresProductsRepository;
