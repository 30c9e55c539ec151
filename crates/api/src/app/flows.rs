//! Per-request decision sequences for the product resource.
//!
//! Each flow is a plain function of (bound request, repository) and holds no
//! state between calls. The order of checks is part of the contract: it decides
//! which status wins when several preconditions fail, and which repository
//! calls happen before a request is rejected.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use catalog_core::{PageRequest, PaginationResult, ProductId};
use catalog_products::{Product, ProductsRepository};

use crate::app::binding::Bound;
use crate::app::errors::ApiError;

/// Successful outcomes of the product flows.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductOutcome {
    /// 200 with the page envelope.
    Page(PaginationResult<Product>),
    /// 200 with one product.
    Product(Product),
    /// 200 with the raw boolean from the store; `false` is still a 200.
    Created(bool),
    /// 204, empty body.
    NoContent,
}

impl IntoResponse for ProductOutcome {
    fn into_response(self) -> axum::response::Response {
        match self {
            ProductOutcome::Page(page) => (StatusCode::OK, Json(page)).into_response(),
            ProductOutcome::Product(product) => (StatusCode::OK, Json(product)).into_response(),
            ProductOutcome::Created(created) => (StatusCode::OK, Json(created)).into_response(),
            ProductOutcome::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

pub type FlowResult = Result<ProductOutcome, ApiError>;

/// `GET /`: one page of products.
///
/// Binding is checked before the store is queried.
pub async fn list_products(repo: &dyn ProductsRepository, query: Bound<PageRequest>) -> FlowResult {
    let page = match query.into_parts() {
        (Some(page), state) if state.is_valid() => page,
        _ => {
            tracing::debug!("list rejected: invalid paging parameters");
            return Err(ApiError::bad_request());
        }
    };

    let result = repo.get_products(page).await?;
    Ok(ProductOutcome::Page(result))
}

/// `GET /{id}`: one product.
///
/// Existence is checked before binding state, so an unknown id is a 404 even
/// when the request is otherwise malformed.
pub async fn get_product(repo: &dyn ProductsRepository, id: Bound<ProductId>) -> FlowResult {
    let product_id = id.value().copied().unwrap_or_default();

    if !repo.product_exists(product_id).await? {
        tracing::debug!(%product_id, "get: product not found");
        return Err(ApiError::NotFound);
    }

    if !id.is_valid() {
        return Err(ApiError::bad_request());
    }

    match repo.get_product(product_id).await? {
        Some(product) => Ok(ProductOutcome::Product(product)),
        // Deleted between the existence check and the read.
        None => Err(ApiError::NotFound),
    }
}

/// `POST /`: create a product; answers with the store's boolean verbatim.
pub async fn create_product(repo: &dyn ProductsRepository, body: Bound<Product>) -> FlowResult {
    let (product, state) = body.into_parts();

    let Some(product) = product else {
        return Err(ApiError::bad_request_with(state));
    };

    if !state.is_valid() {
        return Err(ApiError::bad_request());
    }

    let created = repo.create_product(product).await?;
    if !created {
        tracing::debug!("create: store declined the write");
    }
    Ok(ProductOutcome::Created(created))
}

/// `PUT /{id}`: overwrite an existing product.
///
/// Nothing touches the store until the body is present, valid, and carries
/// the same id as the path. The binding-validity step (e.g. a blank name) is
/// an addition over the plain null / id / exists / update sequence, so an
/// update is held to the same field rules as a create.
pub async fn update_product(
    repo: &dyn ProductsRepository,
    id: Bound<ProductId>,
    body: Bound<Product>,
) -> FlowResult {
    let path_id = id.value().copied().unwrap_or_default();
    let (product, body_state) = body.into_parts();

    let Some(product) = product else {
        return Err(ApiError::bad_request_with(body_state.merged(id.state())));
    };

    if !id.is_valid() || !body_state.is_valid() {
        return Err(ApiError::bad_request());
    }

    if path_id != product.id {
        tracing::debug!(%path_id, body_id = %product.id, "update rejected: id mismatch");
        return Err(ApiError::bad_request());
    }

    if !repo.product_exists(path_id).await? {
        return Err(ApiError::NotFound);
    }

    if !repo.update_product(product).await? {
        return Err(ApiError::update_failed());
    }

    Ok(ProductOutcome::NoContent)
}
