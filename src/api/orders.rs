use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiError;
use crate::auth::CallerIdentity;
use crate::domain::{
    authorize, authorize_order_access, Action, DomainError, OrderInput, Resource,
};
use crate::infrastructure::AppState;
use crate::models::OrderStatus;

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// GET /api/orders - the caller's own orders, newest first
pub async fn list_orders(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Order, Action::List)?;
    let user_id = caller
        .user_id()
        .ok_or_else(|| DomainError::Authentication("Unknown caller".to_string()))?;

    let orders = state.orders.list_orders(user_id).await?;

    Ok(Json(json!({
        "orders": orders,
        "total": orders.len()
    })))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    responses(
        (status = 201, description = "Order created with computed total"),
        (status = 400, description = "Empty items, bad quantity or not enough stock"),
        (status = 401, description = "Anonymous caller")
    )
)]
pub async fn create_order(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Json(payload): Json<OrderInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Order, Action::Create)?;
    let user_id = caller
        .user_id()
        .ok_or_else(|| DomainError::Authentication("Unknown caller".to_string()))?;

    let order = state.orders.create_order(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders/:id - owner or staff only
pub async fn get_order(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Order, Action::Retrieve)?;

    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    authorize_order_access(&caller, order.user_id)?;

    Ok(Json(order))
}

/// PATCH /api/orders/:id - status is the only mutable field, staff only
pub async fn update_order_status(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Order, Action::UpdateStatus)?;

    let status = OrderStatus::parse(&payload.status).ok_or_else(|| {
        DomainError::field(
            "status",
            format!("\"{}\" is not a valid choice.", payload.status),
        )
    })?;

    let order = state.orders.update_status(id, status).await?;

    Ok(Json(order))
}

/// PUT /api/orders/:id - full replacement of an order is structurally
/// disallowed, for every caller.
pub async fn replace_order(Path(_id): Path<i32>) -> ApiError {
    ApiError(DomainError::MethodNotSupported("PUT".to_string()))
}
