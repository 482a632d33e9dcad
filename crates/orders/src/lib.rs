//! Order service.
//!
//! Accepts orders, validates and prices them against the product catalog
//! over HTTP, and serves CRUD on the resulting records, with structured
//! logging (tracing) and Prometheus metrics. Checkout is the one
//! workflow with cross-service behavior; everything after it is plain
//! in-memory bookkeeping.

pub mod builder;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod model;
pub mod routes;
pub mod status;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use builder::OrderBuilder;
use catalog::CatalogClient;
use checkout::OrderValidator;
use model::{LineItem, Order, OrderId};
use routes::orders::AppState;
use status::OrderStatus;
use store::OrderStore;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C: CatalogClient + 'static>(
    state: Arc<AppState<C>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<C>))
        .route("/orders", get(routes::orders::list::<C>))
        .route("/orders/{id}", get(routes::orders::get::<C>))
        .route("/orders/{id}/status", patch(routes::orders::set_status::<C>))
        .route("/orders/{id}", delete(routes::orders::remove::<C>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state, preloaded with the demo order.
/// The ID counter continues above it.
pub fn create_default_state<C: CatalogClient>(catalog: C) -> Arc<AppState<C>> {
    let demo = demo_order();
    let next_id = OrderId::new(demo.id.as_u64() + 1);

    Arc::new(AppState {
        store: OrderStore::with_orders(vec![demo]),
        validator: OrderValidator::new(catalog),
        builder: OrderBuilder::starting_at(next_id),
    })
}

/// The demo order a fresh service starts with: one laptop and two mice
/// from the demo catalog, priced as of seeding.
fn demo_order() -> Order {
    Order {
        id: OrderId::new(1),
        items: vec![LineItem::new(1u64, 1), LineItem::new(2u64, 2)],
        customer_email: "customer@example.com".to_string(),
        total_price: 1059.97,
        status: OrderStatus::Pending,
        created_at: Utc::now(),
    }
}
