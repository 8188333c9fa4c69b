//! Router-level tests: full middleware stack dispatched in-process via
//! `tower::ServiceExt::oneshot`, no network socket involved.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use mall_server::db::repository::{product, user};
use mall_server::routes::build_app;
use mall_server::{Config, ServerState};
use shared::models::{ProductCreate, UserCreate};

async fn setup() -> (Router, ServerState, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config)
        .await
        .expect("Failed to initialize server state");
    let app = build_app(&state);
    (app, state, dir)
}

async fn seed_user(state: &ServerState, username: &str) -> i64 {
    let data = UserCreate {
        username: username.to_string(),
        password: "ignored".to_string(),
        phone: None,
        email: None,
    };
    user::create(state.pool(), &data, "$argon2id$fake-hash")
        .await
        .expect("Failed to seed user")
        .id
}

async fn seed_product(state: &ServerState, name: &str, price: f64, stock: i64) -> i64 {
    let data = ProductCreate {
        name: name.to_string(),
        category: "test".to_string(),
        price,
        stock: Some(stock),
        description: None,
        image_url: None,
    };
    product::create(state.pool(), data)
        .await
        .expect("Failed to seed product")
        .id
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("Failed to build request")
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

async fn body_json(response: http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}

fn user_token(state: &ServerState, id: i64, username: &str) -> String {
    state
        .get_jwt_service()
        .generate_token(id, username, "user")
        .expect("Failed to generate token")
}

fn admin_token(state: &ServerState) -> String {
    state
        .get_jwt_service()
        .generate_token(1, "root", "admin")
        .expect("Failed to generate token")
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state, _dir) = setup().await;

    let response = app.oneshot(get("/health")).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_order_then_listed_as_pending() {
    let (app, state, _dir) = setup().await;
    let user_id = seed_user(&state, "alice").await;
    let a = seed_product(&state, "Widget", 20.0, 10).await;
    let b = seed_product(&state, "Gadget", 20.0, 10).await;

    // Order creation is open by default (no Authorization header)
    let payload = json!({
        "user_id": user_id,
        "total_amount": 100.0,
        "items": [
            {"product_id": a, "quantity": 2, "price": 20.0},
            {"product_id": b, "quantity": 3, "price": 20.0},
        ],
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/orders", payload, None))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let order_no = body["order_no"].as_str().expect("order_no should be set");
    assert!(order_no.starts_with("ORD"));

    // The listing is public and shows the new order as pending
    let response = app
        .oneshot(get("/api/orders"))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let orders = body["data"].as_array().expect("data should be an array");
    let found = orders
        .iter()
        .find(|o| o["order_no"] == order_no)
        .expect("Created order should be listed");
    assert_eq!(found["status"], "pending");
    assert_eq!(found["total_amount"], 100.0);
    assert_eq!(found["username"], "alice");
}

#[tokio::test]
async fn test_create_order_rejects_total_mismatch() {
    let (app, state, _dir) = setup().await;
    let user_id = seed_user(&state, "alice").await;
    let a = seed_product(&state, "Widget", 20.0, 10).await;

    let payload = json!({
        "user_id": user_id,
        "total_amount": 99.0,
        "items": [{"product_id": a, "quantity": 2, "price": 20.0}],
    });
    let response = app
        .oneshot(json_request("POST", "/api/orders", payload, None))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_create_order_rejects_empty_items() {
    let (app, state, _dir) = setup().await;
    let user_id = seed_user(&state, "alice").await;

    let payload = json!({"user_id": user_id, "total_amount": 0.0, "items": []});
    let response = app
        .oneshot(json_request("POST", "/api/orders", payload, None))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_out_of_stock_order_returns_400_and_persists_nothing() {
    let (app, state, _dir) = setup().await;
    let user_id = seed_user(&state, "alice").await;
    let a = seed_product(&state, "Widget", 20.0, 1).await;

    let payload = json!({
        "user_id": user_id,
        "total_amount": 40.0,
        "items": [{"product_id": a, "quantity": 2, "price": 20.0}],
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/orders", payload, None))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let stock = product::find_by_id(state.pool(), a)
        .await
        .expect("Failed to read product")
        .expect("Product should exist")
        .stock;
    assert_eq!(stock, 1);

    let response = app
        .oneshot(get("/api/orders"))
        .await
        .expect("Request failed");
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn test_process_is_rejected_the_second_time() {
    let (app, state, _dir) = setup().await;
    let user_id = seed_user(&state, "alice").await;
    let a = seed_product(&state, "Widget", 10.0, 10).await;
    let token = user_token(&state, user_id, "alice");

    let payload = json!({
        "user_id": user_id,
        "total_amount": 10.0,
        "items": [{"product_id": a, "quantity": 1, "price": 10.0}],
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/orders", payload, None))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/orders"))
        .await
        .expect("Request failed");
    let body = body_json(response).await;
    let order_id = body["data"][0]["id"].as_i64().expect("order id");

    // First process transitions pending -> completed
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/orders/{order_id}/process"),
            json!({}),
            Some(&token),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "completed");

    // Second process hits the pending-only guard
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/orders/{order_id}/process"),
            json!({}),
            Some(&token),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Only pending orders can be processed");

    // The generic status endpoint cannot cancel a completed order either
    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            json!({"status": "cancelled"}),
            Some(&token),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_status_rejects_unknown_target() {
    let (app, state, _dir) = setup().await;
    let user_id = seed_user(&state, "alice").await;
    let token = user_token(&state, user_id, "alice");

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/api/orders/1/status",
            json!({"status": "shipped"}),
            Some(&token),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transition_on_missing_order_is_404() {
    let (app, state, _dir) = setup().await;
    let user_id = seed_user(&state, "alice").await;
    let token = user_token(&state, user_id, "alice");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/orders/42/cancel",
            json!({}),
            Some(&token),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (app, state, _dir) = setup().await;

    let response = app
        .clone()
        .oneshot(get("/api/users"))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/orders/stats"))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let user_id = seed_user(&state, "alice").await;
    let token = user_token(&state, user_id, "alice");
    let response = app
        .oneshot(get_with_token("/api/users", &token))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_reject_user_role() {
    let (app, state, _dir) = setup().await;
    let user_id = seed_user(&state, "alice").await;
    let token = user_token(&state, user_id, "alice");

    let response = app
        .clone()
        .oneshot(get_with_token("/api/admins", &token))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get_with_token("/api/admins", &admin_token(&state)))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_login_and_profile_flow() {
    let (app, _state, _dir) = setup().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/register",
            json!({"username": "bob", "password": "hunter2-hunter2"}),
            None,
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({"username": "bob", "password": "hunter2-hunter2"}),
            None,
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["data"]["token"]
        .as_str()
        .expect("token should be set")
        .strip_prefix("Bearer ")
        .expect("token carries the Bearer prefix")
        .to_string();

    let response = app
        .clone()
        .oneshot(get_with_token("/api/user/profile", &token))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], "bob");
    assert!(body["data"]["password"].is_null());

    // Wrong password gets the unified credentials error
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({"username": "bob", "password": "wrong"}),
            None,
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_401() {
    let (app, _state, _dir) = setup().await;

    let response = app
        .oneshot(get_with_token("/api/users", "not-a-jwt"))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["code"].is_number());
}

#[tokio::test]
async fn test_order_stats_shape() {
    let (app, state, _dir) = setup().await;
    let user_id = seed_user(&state, "alice").await;
    let token = user_token(&state, user_id, "alice");

    let response = app
        .oneshot(get_with_token("/api/orders/stats", &token))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let stats = &body["data"];
    assert_eq!(stats["totalOrders"], 0);
    assert_eq!(stats["pendingOrders"], 0);
    assert_eq!(stats["completedOrders"], 0);
    assert_eq!(stats["todayIncome"], 0.0);
}
