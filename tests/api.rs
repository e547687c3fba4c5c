use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use sandwich_api::{build_router, AppState, Catalog};
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn app() -> Router {
    build_router(AppState::in_memory(Catalog::builtin()), 64 * 1024)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => {
            let text = b.to_string();
            builder
                .header("content-type", "application/json")
                .header("content-length", text.len())
                .body(Body::from(text))
                .unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn sandwich_lifecycle() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/sandwiches", Some(json!({ "sandwich_name": "BLT", "price": 5.5 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"], json!({ "id": 1, "sandwich_name": "BLT", "price": 5.5 }));

    let (status, body) = send(&app, Method::POST, "/sandwiches/", Some(json!({ "sandwich_name": "Club", "price": 7 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], json!(2));

    let (status, body) = send(&app, Method::GET, "/sandwiches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": [
                { "id": 1, "sandwich_name": "BLT", "price": 5.5 },
                { "id": 2, "sandwich_name": "Club", "price": 7.0 }
            ],
            "meta": { "count": 2 }
        })
    );

    let (status, body) = send(&app, Method::PUT, "/sandwiches/1", Some(json!({ "sandwich_name": "BLT Deluxe" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "id": 1, "sandwich_name": "BLT Deluxe", "price": 5.5 }));

    let (status, body) = send(&app, Method::DELETE, "/sandwiches/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "message": "Sandwich deleted successfully" }));

    let (status, body) = send(&app, Method::GET, "/sandwiches/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("not_found"));
    assert_eq!(body["error"]["message"], json!("Sandwich not found"));

    let (_, body) = send(&app, Method::GET, "/sandwiches/1", None).await;
    assert_eq!(body["data"]["sandwich_name"], json!("BLT Deluxe"));
}

#[tokio::test]
async fn patch_is_partial_and_keeps_id() {
    let app = app();
    send(&app, Method::POST, "/resources", Some(json!({ "item": "bread", "amount": 10 }))).await;
    let (status, body) = send(&app, Method::PATCH, "/resources/1", Some(json!({ "id": 99, "amount": 4 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "id": 1, "item": "bread", "amount": 4 }));
    let (status, _) = send(&app, Method::GET, "/resources/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_records_are_404_on_every_operation() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/orders/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], json!("Order not found"));
    let (status, _) = send(&app, Method::PUT, "/orders/5", Some(json!({ "description": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, Method::DELETE, "/order-details/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], json!("Order detail not found"));
}

#[tokio::test]
async fn entities_have_independent_ids() {
    let app = app();
    send(&app, Method::POST, "/orders", Some(json!({ "customer_name": "Ada" }))).await;
    send(&app, Method::POST, "/orders", Some(json!({ "customer_name": "Grace" }))).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/order-details",
        Some(json!({ "order_id": 2, "sandwich_id": 1, "amount": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], json!(1));

    let (_, body) = send(&app, Method::GET, "/orders/1", None).await;
    assert_eq!(body["data"]["customer_name"], json!("Ada"));
    assert_eq!(body["data"]["description"], Value::Null);
    assert!(body["data"]["order_date"].is_string());
}

#[tokio::test]
async fn order_details_do_not_check_references() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/order-details",
        Some(json!({ "order_id": 404, "sandwich_id": 404, "amount": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn bad_input() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/recipes", Some(json!({ "sandwich_id": 1 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("validation_error"));

    let (status, _) = send(&app, Method::POST, "/recipes", Some(json!([1, 2, 3]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/recipes/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("bad_request"));

    let (status, body) = send(&app, Method::GET, "/widgets", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("unknown_entity"));
}

async fn send_raw(app: &Router, uri: &str, content_type: Option<&str>, text: impl Into<String>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let response = app.clone().oneshot(builder.body(Body::from(text.into())).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn unreadable_bodies_get_the_error_envelope() {
    let app = app();
    let (status, body) = send_raw(&app, "/sandwiches", Some("application/json"), r#"{"sandwich_name": "BLT", "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("bad_request"));
    assert!(body["error"]["message"].is_string());

    let (status, body) = send_raw(&app, "/sandwiches", None, r#"{"sandwich_name": "BLT", "price": 5}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("bad_request"));

    let (status, body) = send(&app, Method::GET, "/sandwiches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], json!(0));
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let app = build_router(AppState::in_memory(Catalog::builtin()), 64);
    let big = "x".repeat(500);
    let (status, _) = send(&app, Method::POST, "/resources", Some(json!({ "item": big, "amount": 1 }))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    // Without a content-length the limit trips while the body is read.
    let big = format!(r#"{{"item": "{}", "amount": 1}}"#, "x".repeat(500));
    let (status, body) = send_raw(&app, "/resources", Some("application/json"), big).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], json!("payload_too_large"));
}

#[tokio::test]
async fn health_and_version_routes() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], json!("ok"));

    let (status, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("sandwich-api"));
}
