//! HTTP surface for the order core (§4.8, §6).

use crate::error::OrderServiceError;
use crate::repository;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use orderflow_domain::OrderItem;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Wraps [`Json`], remapping a well-formed-but-unrecognized body (an
/// unknown field under `deny_unknown_fields`) to 400 rather than axum's
/// default 422 — §6/§8 specify 400 for every malformed request body, not
/// just a JSON syntax error.
struct StrictJson<T>(T);

impl<T, S> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(StrictJson(value)),
            Err(JsonRejection::JsonDataError(err)) => {
                Err(OrderServiceError::InvalidRequest(err.to_string()).into_response())
            }
            Err(other) => Err(other.into_response()),
        }
    }
}

/// Request bodies are capped at 1 MiB and reject unknown fields, per §6.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
}

pub fn router(pool: PgPool) -> Router {
    let state = Arc::new(ApiState { pool });

    Router::new()
        .route("/health", get(health))
        .route("/orders", post(create_order))
        .route("/orders/:id", get(get_order))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health(State(state): State<Arc<ApiState>>) -> Result<Json<HealthResponse>, OrderServiceError> {
    sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&state.pool).await?;
    Ok(Json(HealthResponse { status: "ok" }))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateOrderItemRequest {
    product_id: i64,
    quantity: i32,
    price: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateOrderRequest {
    user_id: i64,
    items: Vec<CreateOrderItemRequest>,
}

#[derive(Serialize)]
struct CreateOrderResponse {
    order_id: i64,
}

async fn create_order(
    State(state): State<Arc<ApiState>>,
    StrictJson(request): StrictJson<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, OrderServiceError> {
    let items = request
        .items
        .into_iter()
        .map(|item| OrderItem::new(item.product_id, item.quantity, item.price))
        .collect::<Result<Vec<_>, _>>()?;

    let (order_id, _created_at) = repository::create_order(&state.pool, request.user_id, items).await?;

    Ok(Json(CreateOrderResponse { order_id }))
}

#[derive(Serialize)]
struct OrderItemResponse {
    product_id: i64,
    quantity: i32,
    price: i64,
}

#[derive(Serialize)]
struct OrderResponse {
    order_id: i64,
    user_id: i64,
    status: String,
    items: Vec<OrderItemResponse>,
    total_amount: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct GetOrderResponse {
    order: OrderResponse,
}

async fn get_order(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<GetOrderResponse>, OrderServiceError> {
    let order = repository::get_order(&state.pool, id).await?;

    Ok(Json(GetOrderResponse {
        order: OrderResponse {
            order_id: order.id,
            user_id: order.user_id,
            status: order.status.as_str().to_string(),
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price.as_minor_units(),
                })
                .collect(),
            total_amount: order.total_amount.as_minor_units(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        },
    }))
}

/// axum's routing already returns 404 for a missing `/orders/{id}` path
/// segment and 400 for a non-numeric one (the `Path<i64>` extractor
/// rejects it before the handler runs), matching §8's boundary cases.
pub const MISSING_ID_STATUS: StatusCode = StatusCode::NOT_FOUND;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_matches_contract() {
        assert_eq!(MAX_BODY_BYTES, 1024 * 1024);
    }
}
