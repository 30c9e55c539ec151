//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: repository selection and wiring
//! - `binding.rs`: lenient request binding and validation state
//! - `flows.rs`: per-request decision sequences over the repository
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod binding;
pub mod errors;
pub mod flows;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router from configuration (entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let services = services::build_services(&config.store).await?;
    Ok(router(services))
}

/// Router over already-built services (tests plug in their own repository).
pub fn router(services: AppServices) -> Router {
    let services = Arc::new(services);

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router().layer(Extension(services)))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::trace_requests)))
}
