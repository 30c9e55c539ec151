use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use catalog_products::RepositoryError;

use crate::app::binding::ValidationState;

pub const UPDATE_FAILED_MESSAGE: &str = "Something went wrong while updating the product";

/// Failure outcomes of the product flows.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    /// Malformed or missing request data. Carries the validation state only
    /// when the entity itself was absent.
    #[error("bad request")]
    BadRequest(Option<ValidationState>),

    #[error("product not found")]
    NotFound,

    /// The store declined a write.
    #[error("{0}")]
    WriteFailure(String),

    /// The store could not be reached or returned garbage.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl ApiError {
    pub fn bad_request() -> Self {
        Self::BadRequest(None)
    }

    pub fn bad_request_with(state: ValidationState) -> Self {
        Self::BadRequest(Some(state))
    }

    pub fn update_failed() -> Self {
        Self::WriteFailure(UPDATE_FAILED_MESSAGE.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::WriteFailure(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::BadRequest(None) => StatusCode::BAD_REQUEST.into_response(),
            ApiError::BadRequest(Some(state)) => {
                (StatusCode::BAD_REQUEST, axum::Json(state)).into_response()
            }
            ApiError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
            ApiError::WriteFailure(msg) => {
                tracing::warn!(message = %msg, "product write failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "write_failure", msg)
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "product store failure");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
            }
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
