//! Product catalog service.
//!
//! Owns product identity, price, and stock, and exposes the read endpoint
//! the order service consults during checkout. Data lives in process
//! memory and is lost on restart; IDs are monotonic for the process
//! lifetime, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use common::{Product, ProductId};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::products::AppState;
use store::ProductStore;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", post(routes::products::create))
        .route("/products", get(routes::products::list))
        .route("/products/{id}", get(routes::products::get))
        .route("/products/{id}", put(routes::products::update))
        .route("/products/{id}", delete(routes::products::remove))
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

/// Creates the default application state, preloaded with the demo catalog.
pub fn create_default_state() -> Arc<AppState> {
    Arc::new(AppState {
        store: ProductStore::with_products(demo_products()),
    })
}

/// The demo catalog a fresh service starts with. IDs continue at 4.
fn demo_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            name: "Laptop".to_string(),
            price: 999.99,
            stock: 50,
        },
        Product {
            id: ProductId::new(2),
            name: "Mouse".to_string(),
            price: 29.99,
            stock: 200,
        },
        Product {
            id: ProductId::new(3),
            name: "Keyboard".to_string(),
            price: 79.99,
            stock: 150,
        },
    ]
}
