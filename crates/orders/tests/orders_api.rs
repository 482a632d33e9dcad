//! Integration tests for the order service HTTP API.
//!
//! The catalog is replaced by the in-memory client so every checkout
//! outcome, including outages, can be produced deterministically.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{Product, ProductId};
use metrics_exporter_prometheus::PrometheusHandle;
use orders::catalog::InMemoryCatalog;
use orders::routes::orders::AppState;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

/// The demo catalog contents, served from memory.
fn demo_catalog() -> InMemoryCatalog {
    InMemoryCatalog::with_products(vec![
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
    ])
}

fn setup() -> axum::Router {
    let (app, _, _) = setup_with_state();
    app
}

fn setup_with_state() -> (
    axum::Router,
    InMemoryCatalog,
    Arc<AppState<InMemoryCatalog>>,
) {
    let catalog = demo_catalog();
    let state = orders::create_default_state(catalog.clone());
    let app = orders::create_app(state.clone(), get_metrics_handle());
    (app, catalog, state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_order(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "orders");
}

#[tokio::test]
async fn test_create_order() {
    let app = setup();

    let response = app
        .oneshot(post_order(serde_json::json!({
            "items": [
                { "product_id": 1, "quantity": 1 },
                { "product_id": 2, "quantity": 2 }
            ],
            "customer_email": "buyer@example.com"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let order = body_json(response).await;
    // The demo order holds ID 1
    assert_eq!(order["id"], 2);
    // 999.99 + 2 * 29.99
    assert_eq!(order["total_price"], 1059.97);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["customer_email"], "buyer@example.com");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][0]["product_id"], 1);
    assert_eq!(order["items"][1]["quantity"], 2);
    assert!(order["created_at"].as_str().is_some());
}

#[tokio::test]
async fn test_create_order_with_unknown_product() {
    let (app, _, state) = setup_with_state();

    let response = app
        .oneshot(post_order(serde_json::json!({
            "items": [{ "product_id": 99, "quantity": 1 }],
            "customer_email": "buyer@example.com"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Product 99 not found");

    // Nothing was stored
    assert_eq!(state.store.count().await, 1);
}

#[tokio::test]
async fn test_create_order_with_insufficient_stock() {
    let (app, _, state) = setup_with_state();

    let response = app
        .oneshot(post_order(serde_json::json!({
            "items": [{ "product_id": 1, "quantity": 51 }],
            "customer_email": "buyer@example.com"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("available 50"));
    assert!(message.contains("requested 51"));

    assert_eq!(state.store.count().await, 1);
}

#[tokio::test]
async fn test_create_order_when_catalog_is_down() {
    let (app, catalog, state) = setup_with_state();
    catalog.set_down(true);

    let response = app
        .oneshot(post_order(serde_json::json!({
            "items": [{ "product_id": 1, "quantity": 1 }],
            "customer_email": "buyer@example.com"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(state.store.count().await, 1);
}

#[tokio::test]
async fn test_create_order_fails_when_later_item_is_unreachable() {
    let (app, catalog, state) = setup_with_state();
    catalog.set_unreachable(ProductId::new(2));

    // The first item validates fine; the second cannot be checked.
    let response = app
        .oneshot(post_order(serde_json::json!({
            "items": [
                { "product_id": 1, "quantity": 1 },
                { "product_id": 2, "quantity": 1 }
            ],
            "customer_email": "buyer@example.com"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(catalog.fetch_count(), 2);
    assert_eq!(state.store.count().await, 1);
}

#[tokio::test]
async fn test_create_order_reports_first_listed_violation() {
    let (app, catalog, _) = setup_with_state();

    // Both items are invalid; the earlier one is reported and the rest
    // is never checked.
    let response = app
        .oneshot(post_order(serde_json::json!({
            "items": [
                { "product_id": 99, "quantity": 1 },
                { "product_id": 1, "quantity": 500 }
            ],
            "customer_email": "buyer@example.com"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Product 99 not found");
    assert_eq!(catalog.fetch_count(), 1);
}

#[tokio::test]
async fn test_create_order_with_no_items() {
    let (app, _, state) = setup_with_state();

    let response = app
        .oneshot(post_order(serde_json::json!({
            "items": [],
            "customer_email": "buyer@example.com"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.store.count().await, 1);
}

#[tokio::test]
async fn test_create_order_with_zero_quantity() {
    let (app, catalog, state) = setup_with_state();

    let response = app
        .oneshot(post_order(serde_json::json!({
            "items": [{ "product_id": 1, "quantity": 0 }],
            "customer_email": "buyer@example.com"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    // Rejected before the catalog is consulted
    assert_eq!(catalog.fetch_count(), 0);
    assert_eq!(state.store.count().await, 1);
}

#[tokio::test]
async fn test_create_order_with_malformed_body() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_demo_order() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/orders/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let order = body_json(response).await;
    assert_eq!(order["id"], 1);
    assert_eq!(order["customer_email"], "customer@example.com");
    assert_eq!(order["total_price"], 1059.97);
    assert_eq!(order["status"], "pending");
}

#[tokio::test]
async fn test_get_nonexistent_order() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/orders/99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Order 99 not found");
}

#[tokio::test]
async fn test_invalid_order_id_format() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/orders/not-a-number")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_orders() {
    let app = setup();

    let create_response = app
        .clone()
        .oneshot(post_order(serde_json::json!({
            "items": [{ "product_id": 3, "quantity": 1 }],
            "customer_email": "second@example.com"
        })))
        .await
        .unwrap();
    assert_eq!(create_response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let orders = body_json(response).await;
    let orders = orders.as_array().unwrap().clone();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], 1);
    assert_eq!(orders[1]["id"], 2);
    assert_eq!(orders[1]["total_price"], 79.99);
}

#[tokio::test]
async fn test_update_order_status() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/orders/1/status")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&serde_json::json!({ "status": "confirmed" })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["status"], "confirmed");

    // The change is visible on subsequent reads
    let get_response = app
        .oneshot(
            Request::builder()
                .uri("/orders/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let order = body_json(get_response).await;
    assert_eq!(order["status"], "confirmed");
}

#[tokio::test]
async fn test_update_status_rejects_unknown_value() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/orders/1/status")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&serde_json::json!({ "status": "teleported" })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("teleported"));
    assert!(message.contains("pending"));
    assert!(message.contains("cancelled"));

    // The order kept its status
    let get_response = app
        .oneshot(
            Request::builder()
                .uri("/orders/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let order = body_json(get_response).await;
    assert_eq!(order["status"], "pending");
}

#[tokio::test]
async fn test_update_status_of_nonexistent_order() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/orders/42/status")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&serde_json::json!({ "status": "shipped" })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_can_move_backwards() {
    let app = setup();

    for status in ["cancelled", "pending", "delivered"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/orders/1/status")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_string(&serde_json::json!({ "status": status })).unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let order = body_json(response).await;
        assert_eq!(order["status"], status);
    }
}

#[tokio::test]
async fn test_delete_order() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/orders/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let get_response = app
        .oneshot(
            Request::builder()
                .uri("/orders/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_nonexistent_order() {
    let (app, _, state) = setup_with_state();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/orders/7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The demo order is untouched
    assert_eq!(state.store.count().await, 1);
}

#[tokio::test]
async fn test_order_ids_are_not_reused_after_delete() {
    let app = setup();

    let order_body = serde_json::json!({
        "items": [{ "product_id": 2, "quantity": 1 }],
        "customer_email": "buyer@example.com"
    });

    let first = app.clone().oneshot(post_order(order_body.clone())).await.unwrap();
    let first = body_json(first).await;
    assert_eq!(first["id"], 2);

    let delete_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/orders/2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(delete_response.status(), StatusCode::NO_CONTENT);

    // ID 2 stays retired
    let second = app.oneshot(post_order(order_body)).await.unwrap();
    let second = body_json(second).await;
    assert_eq!(second["id"], 3);
}

#[tokio::test]
async fn test_total_is_unaffected_by_later_price_changes() {
    let (app, catalog, _) = setup_with_state();

    let create_response = app
        .clone()
        .oneshot(post_order(serde_json::json!({
            "items": [{ "product_id": 2, "quantity": 2 }],
            "customer_email": "buyer@example.com"
        })))
        .await
        .unwrap();
    let created = body_json(create_response).await;
    assert_eq!(created["total_price"], 59.98);

    // The catalog price doubles after the order was committed.
    catalog.insert(Product {
        id: ProductId::new(2),
        name: "Mouse".to_string(),
        price: 59.98,
        stock: 200,
    });

    let get_response = app
        .oneshot(
            Request::builder()
                .uri("/orders/2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let order = body_json(get_response).await;
    assert_eq!(order["total_price"], 59.98);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
