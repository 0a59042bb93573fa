//! Order service error types and their HTTP mapping (§6, §7).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use orderflow_domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the order core's HTTP handlers.
///
/// `Validation` and `NotFound` are the only two kinds the distilled
/// contract names explicitly (400/404). `InvalidRequest` covers a
/// request body that is well-formed JSON but fails to match the
/// expected shape (an unknown field, a wrong type), which must also map
/// to 400 rather than axum's default 422. `Timeout` and `Unavailable`
/// cover the 504/503 mapping for a storage deadline or an unreachable
/// pool; a bare `Storage` variant covers any other database failure the
/// original contract leaves to a generic 5xx.
///
/// The distilled contract's 499 ("client cancellation") describes
/// behavior of the external gateway this core no longer sits behind:
/// when the client itself disconnects mid-request there is no longer
/// anyone to send a status line to, so this service does not attempt to
/// synthesize one.
#[derive(Debug, Error)]
pub enum OrderServiceError {
    #[error("{0}")]
    Validation(#[from] DomainError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("order not found")]
    NotFound,

    #[error("storage operation timed out")]
    Timeout,

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(sqlx::Error),
}

impl From<sqlx::Error> for OrderServiceError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => OrderServiceError::Timeout,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                OrderServiceError::Unavailable(error.to_string())
            }
            other => OrderServiceError::Storage(other),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for OrderServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            OrderServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            OrderServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            OrderServiceError::NotFound => StatusCode::NOT_FOUND,
            OrderServiceError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            OrderServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            OrderServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
