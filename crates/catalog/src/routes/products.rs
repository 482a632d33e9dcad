//! Product CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{Product, ProductId};
use serde::Deserialize;

use crate::error::ApiError;
use crate::store::ProductStore;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub store: ProductStore,
}

// -- Request types --

/// Body for both product creation and full-replace updates.
#[derive(Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub price: f64,
    pub stock: u32,
}

impl ProductPayload {
    fn validate(&self) -> Result<(), ApiError> {
        if self.price < 0.0 {
            return Err(ApiError::BadRequest(format!(
                "Invalid price {}: must not be negative",
                self.price
            )));
        }
        Ok(())
    }
}

// -- Handlers --

/// GET /products — list all products in insertion order.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.store.list().await)
}

/// GET /products/:id — fetch one product by ID.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Product>, ApiError> {
    let id = ProductId::new(id);
    state
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))
}

/// POST /products — add a product, assigning the next ID.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    payload.validate()?;

    let product = state
        .store
        .create(payload.name, payload.price, payload.stock)
        .await;

    metrics::counter!("catalog_products_created_total").increment(1);
    tracing::info!(product_id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/:id — replace a product's name, price, and stock.
#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ApiError> {
    payload.validate()?;

    let id = ProductId::new(id);
    state
        .store
        .update(id, payload.name, payload.price, payload.stock)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))
}

/// DELETE /products/:id — remove a product. Its ID is never reused.
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let id = ProductId::new(id);
    if state.store.delete(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Product {id} not found")))
    }
}
