//! `catalog-core`: shared building blocks for the catalog service.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no storage).

pub mod error;
pub mod id;
pub mod pagination;

pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use pagination::{PageRequest, PaginationResult};
