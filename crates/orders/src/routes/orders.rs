//! Order creation and CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::builder::OrderBuilder;
use crate::catalog::CatalogClient;
use crate::checkout::OrderValidator;
use crate::error::ApiError;
use crate::model::{LineItem, Order, OrderId};
use crate::status::OrderStatus;
use crate::store::OrderStore;

/// Shared application state accessible from all handlers.
pub struct AppState<C: CatalogClient> {
    pub store: OrderStore,
    pub validator: OrderValidator<C>,
    pub builder: OrderBuilder,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<LineItem>,
    pub customer_email: String,
}

/// Status updates arrive as the wire string so unknown values can be
/// rejected with a helpful message instead of a bare deserialization
/// failure.
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// -- Handlers --

/// POST /orders — validate against the catalog, price, and commit.
///
/// The returned record carries the server-assigned ID and total; nothing
/// is stored when validation fails.
#[tracing::instrument(skip(state, req))]
pub async fn create<C: CatalogClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let priced = state.validator.validate(req.items).await?;

    let order = state.builder.build(priced, req.customer_email);
    state.store.insert(order.clone()).await;

    metrics::counter!("orders_created_total").increment(1);
    tracing::info!(order_id = %order.id, total_price = order.total_price, "order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders — list all orders in insertion order.
#[tracing::instrument(skip(state))]
pub async fn list<C: CatalogClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Json<Vec<Order>> {
    Json(state.store.list().await)
}

/// GET /orders/:id — fetch one order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<C: CatalogClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<u64>,
) -> Result<Json<Order>, ApiError> {
    let id = OrderId::new(id);
    state
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))
}

/// PATCH /orders/:id/status — set the order's lifecycle status.
#[tracing::instrument(skip(state, req))]
pub async fn set_status<C: CatalogClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    let status: OrderStatus = req.status.parse()?;

    let id = OrderId::new(id);
    let order = state
        .store
        .set_status(id, status)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    tracing::info!(order_id = %id, status = %status, "order status updated");

    Ok(Json(order))
}

/// DELETE /orders/:id — remove an order. Its ID is never reused.
#[tracing::instrument(skip(state))]
pub async fn remove<C: CatalogClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let id = OrderId::new(id);
    if state.store.delete(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Order {id} not found")))
    }
}
