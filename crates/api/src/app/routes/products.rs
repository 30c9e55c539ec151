use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Extension, Path, Query},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::app::{binding, flows};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product).put(update_product))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> axum::response::Response {
    let query = binding::bind_page_query(query.map(|Query(params)| params));
    flows::list_products(services.products(), query).await.into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = binding::bind_product_id(&id);
    flows::get_product(services.products(), id).await.into_response()
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let body = binding::bind_product_body(&body);
    flows::create_product(services.products(), body).await.into_response()
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    let id = binding::bind_product_id(&id);
    let body = binding::bind_product_body(&body);
    flows::update_product(services.products(), id, body)
        .await
        .into_response()
}
