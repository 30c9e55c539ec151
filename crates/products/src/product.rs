use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, ProductId};

/// A catalog product (the client calls it a "book").
///
/// Wire shape: `{ "id": 1, "name": "...", "price": 9.5 }`. `id` may be omitted
/// on create and then reads as [`ProductId::UNASSIGNED`]; a missing `price`
/// reads as `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    /// Copy of this product carrying a different identity.
    pub fn with_id(&self, id: ProductId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    /// Field rule violations; empty when the product is valid.
    ///
    /// Price has no enforced range.
    pub fn validation_errors(&self) -> Vec<DomainError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(DomainError::validation("name", "The Name field is required."));
        }
        if !self.price.is_finite() {
            errors.push(DomainError::validation("price", "The Price field must be a finite number."));
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }
}
