//! Repository contract between request handling and product storage.
//!
//! ## Booleans vs errors
//!
//! Write operations answer `Ok(false)` when the store declined the write (the
//! id is already taken, the row to update is gone, the commit failed). An
//! `Err(RepositoryError)` means the store itself could not be reached or
//! returned data that does not decode; callers treat it as an infrastructure
//! fault, not as a business outcome.
//!
//! ## Concurrency
//!
//! Implementations are shared across concurrent requests and own all locking
//! and isolation. Callers hold no state between calls.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::{PageRequest, PaginationResult, ProductId};

use crate::product::Product;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store failed (connection, query, lock poisoning).
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// A stored row could not be decoded into a product.
    #[error("corrupt product record: {0}")]
    Corrupt(String),
}

impl RepositoryError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

/// Product storage operations.
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// One page of products ordered by ascending id, plus the total page count.
    ///
    /// Out-of-range pages come back with an empty `result`.
    async fn get_products(&self, page: PageRequest) -> RepositoryResult<PaginationResult<Product>>;

    /// Fetch a product by identity. Callers check [`Self::product_exists`] first.
    async fn get_product(&self, id: ProductId) -> RepositoryResult<Option<Product>>;

    async fn product_exists(&self, id: ProductId) -> RepositoryResult<bool>;

    /// Persist a new product.
    ///
    /// An unassigned id is allocated by the store; an assigned one is kept if free.
    async fn create_product(&self, product: Product) -> RepositoryResult<bool>;

    /// Overwrite the product whose id matches `product.id`.
    async fn update_product(&self, product: Product) -> RepositoryResult<bool>;

    /// Commit pending writes.
    async fn save(&self) -> RepositoryResult<bool>;
}

#[async_trait]
impl<S> ProductsRepository for Arc<S>
where
    S: ProductsRepository + ?Sized,
{
    async fn get_products(&self, page: PageRequest) -> RepositoryResult<PaginationResult<Product>> {
        (**self).get_products(page).await
    }

    async fn get_product(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        (**self).get_product(id).await
    }

    async fn product_exists(&self, id: ProductId) -> RepositoryResult<bool> {
        (**self).product_exists(id).await
    }

    async fn create_product(&self, product: Product) -> RepositoryResult<bool> {
        (**self).create_product(product).await
    }

    async fn update_product(&self, product: Product) -> RepositoryResult<bool> {
        (**self).update_product(product).await
    }

    async fn save(&self) -> RepositoryResult<bool> {
        (**self).save().await
    }
}
