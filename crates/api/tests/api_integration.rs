//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use api::config::Config;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use checkout::{DisabledNotificationRelay, InMemoryNotificationRelay};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{InMemoryOrderStore, OrderId};
use serde_json::{Value, json};
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

struct TestApp {
    app: axum::Router,
    store: InMemoryOrderStore,
    relay: InMemoryNotificationRelay,
}

fn config() -> Config {
    Config {
        notify_recipient: "orders@example.com".to_string(),
        manual_order_phone: "+91 90000 00000".to_string(),
        shipping_flat_rate_cents: 4_000,
        ..Config::default()
    }
}

fn setup() -> TestApp {
    let store = InMemoryOrderStore::new();
    let relay = InMemoryNotificationRelay::new();
    let state = api::create_state(Arc::new(store.clone()), Arc::new(relay.clone()), &config());
    let app = api::create_app(state, get_metrics_handle());
    TestApp { app, store, relay }
}

fn order_body() -> Value {
    json!({
        "items": [{
            "productId": "coconut-oil",
            "brandLabel": "Kera Gold Coconut Oil",
            "variantLabel": "1L",
            "unitPrice": 25000,
            "quantity": 2
        }],
        "customerName": "Lakshmi",
        "customerPhone": "9000000001",
        "address": {
            "door": "14B",
            "street": "Temple Road",
            "district": "Thrissur",
            "state": "Kerala",
            "postalCode": "680001"
        },
        "notes": "Call before delivery"
    })
}

async fn post_json(app: axum::Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let app = setup().app;

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

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_submit_order() {
    let t = setup();

    let (status, json) = post_json(t.app, "/orders", &order_body()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["notified"], true);

    let order_id = OrderId::from_string(json["orderId"].as_str().unwrap());
    let order = t.store.get(&order_id).await.unwrap();
    assert_eq!(order.subtotal.cents(), 50_000);
    assert_eq!(order.shipping_cost.cents(), 4_000);
    assert_eq!(order.total.cents(), 54_000);
    assert_eq!(order.delivery_address.postal_code, "680001");
    assert_eq!(order.items[0].id.as_str(), "11:coconut-oil/1L");
    assert_eq!(t.relay.sent().await.len(), 1);
}

#[tokio::test]
async fn test_blank_phone_returns_400_with_fields() {
    let t = setup();
    let mut body = order_body();
    body["customerName"] = json!("A");
    body["customerPhone"] = json!("");

    let (status, json) = post_json(t.app, "/orders", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["fields"], json!(["customerPhone"]));
    assert!(json["error"].as_str().unwrap().contains("customerPhone"));
    assert_eq!(t.store.order_count().await, 0);
}

#[tokio::test]
async fn test_missing_address_reports_every_field() {
    let t = setup();
    let mut body = order_body();
    body.as_object_mut().unwrap().remove("address");

    let (status, json) = post_json(t.app, "/orders", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["fields"],
        json!([
            "address.door",
            "address.street",
            "address.district",
            "address.state",
            "address.postalCode"
        ])
    );
}

#[tokio::test]
async fn test_empty_items_returns_400() {
    let t = setup();
    let mut body = order_body();
    body["items"] = json!([]);

    let (status, json) = post_json(t.app, "/orders", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json.get("fields").is_none());
}

#[tokio::test]
async fn test_malformed_body_returns_400() {
    let t = setup();
    let mut body = order_body();
    body["items"][0]["quantity"] = json!(-1);

    let (status, json) = post_json(t.app, "/orders", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_out_of_range_amount_returns_400() {
    let t = setup();
    let mut body = order_body();
    body["items"][0]["unitPrice"] = json!(i64::MAX / 2 + 1);
    body["items"][0]["quantity"] = json!(2);

    let (status, json) = post_json(t.app, "/orders", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("amount out of range"));
    assert_eq!(t.store.order_count().await, 0);
}

#[tokio::test]
async fn test_total_with_shipping_out_of_range_returns_400() {
    let t = setup();
    let mut body = order_body();
    body["items"][0]["unitPrice"] = json!(i64::MAX - 1);
    body["items"][0]["quantity"] = json!(1);

    let (status, json) = post_json(t.app, "/orders", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Order total is out of range");
    assert_eq!(t.store.order_count().await, 0);
}

#[tokio::test]
async fn test_store_failure_returns_500() {
    let t = setup();
    t.store.set_unavailable(true).await;

    let (status, json) = post_json(t.app, "/orders", &order_body()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Could not place order");
    assert_eq!(t.relay.attempts().await, 0);
}

#[tokio::test]
async fn test_relay_failure_still_returns_201() {
    let t = setup();
    t.relay.set_fail_on_send(true).await;

    let (status, json) = post_json(t.app, "/orders", &order_body()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["notified"], false);
    assert_eq!(t.store.order_count().await, 1);
}

#[tokio::test]
async fn test_disabled_relay_reports_not_notified() {
    let store = InMemoryOrderStore::new();
    let state = api::create_state(
        Arc::new(store.clone()),
        Arc::new(DisabledNotificationRelay),
        &config(),
    );
    let app = api::create_app(state, get_metrics_handle());

    let (status, json) = post_json(app, "/orders", &order_body()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["notified"], false);
    assert_eq!(store.order_count().await, 1);
}

#[tokio::test]
async fn test_manual_order_message() {
    let t = setup();
    let body = json!({
        "items": order_body()["items"],
        "customerName": "Lakshmi",
        "address": { "door": "14B", "district": "Thrissur" }
    });

    let (status, json) = post_json(t.app, "/orders/manual", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("1. Kera Gold Coconut Oil 1L × 2 = ₹500.00"));
    assert!(message.contains("Name: Lakshmi"));
    assert!(message.contains("Address: 14B, Thrissur"));
    assert!(
        json["destination"]
            .as_str()
            .unwrap()
            .starts_with("https://wa.me/919000000000?text=")
    );
    assert_eq!(t.store.order_count().await, 0);
}

#[tokio::test]
async fn test_manual_order_without_items_returns_400() {
    let t = setup();

    let (status, json) = post_json(t.app, "/orders/manual", &json!({ "items": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let t = setup();
    let _ = post_json(t.app.clone(), "/orders", &order_body()).await;

    let response = t
        .app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("orders_submitted_total"));
}
