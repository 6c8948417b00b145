use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orders_types::domain::customer::CustomerId;
use orders_types::domain::product::ProductId;
use orders_types::ports::RepoError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Customer not found")]
    CustomerNotFound(CustomerId),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict(m) => AppError::Conflict(m),
            other => AppError::Internal(anyhow::anyhow!(other.to_string())),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = match &self {
            AppError::CustomerNotFound(_) | AppError::ProductNotFound(_) | AppError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let msg = match &self {
            AppError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        let body = serde_json::to_string(&ErrorBody { error: msg })
            .unwrap_or_else(|_| "{\"error\":\"internal serialization\"}".into());
        (code, [("content-type", "application/json")], body).into_response()
    }
}
