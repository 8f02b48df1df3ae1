//! Router-level API tests.
//!
//! Drives the full router with `tower::ServiceExt::oneshot` against a fresh
//! in-memory store per test, asserting status codes, the response envelope,
//! and the stable error kinds.

#![allow(clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use copperleaf_storefront::config::StorefrontConfig;
use copperleaf_storefront::routes;
use copperleaf_storefront::state::AppState;

fn app() -> Router {
    let config = StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        token_secret: SecretString::from("an-integration-test-secret-of-sufficient-length"),
        store_op_timeout: Duration::from_millis(2000),
        email: None,
    };
    let state = AppState::new(config).unwrap();
    Router::new().merge(routes::routes()).with_state(state)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a product through the API and return its id.
async fn create_product(app: &Router, name: &str, price: &str) -> String {
    let response = app
        .clone()
        .oneshot(post(
            "/api/products",
            json!({
                "name": name,
                "quantity": 100,
                "price": price,
                "description": "test product",
                "image": "product.png"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["data"]["id"].as_str().unwrap().to_owned()
}

const USER_ID: &str = "64a7c3f9e1d3c9b8f0e7d9a1";

#[tokio::test]
async fn malformed_ids_are_rejected_before_the_store() {
    let app = app();

    // Query-side.
    let response = app
        .clone()
        .oneshot(get("/api/cart?userId=not-hex"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["kind"], "invalid_argument");

    // Body-side, both operations.
    for uri in ["/api/cart/add", "/api/cart/remove"] {
        let response = app
            .clone()
            .oneshot(post(
                uri,
                json!({ "userId": USER_ID, "productId": "short", "quantity": 1 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["kind"], "invalid_argument");
    }
}

#[tokio::test]
async fn add_rejects_zero_quantity() {
    let app = app();
    let product_id = create_product(&app, "Widget", "10.00").await;

    let response = app
        .clone()
        .oneshot(post(
            "/api/cart/add",
            json!({ "userId": USER_ID, "productId": product_id, "quantity": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // No cart was created along the way.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/cart?userId={USER_ID}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_unknown_product_is_not_found() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post(
            "/api/cart/add",
            json!({
                "userId": USER_ID,
                "productId": "ffffffffffffffffffffffff",
                "quantity": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["kind"], "not_found");
}

#[tokio::test]
async fn cart_add_merge_and_remove_flow() {
    let app = app();
    let product_id = create_product(&app, "Widget", "10.00").await;

    // First add creates the cart.
    let response = app
        .clone()
        .oneshot(post(
            "/api/cart/add",
            json!({ "userId": USER_ID, "productId": product_id, "quantity": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Product added to cart successfully");
    assert_eq!(body["data"]["items"][0]["quantity"], 2);
    assert_eq!(body["data"]["totalPrice"], "20.00");

    // Second add merges into the same line.
    let response = app
        .clone()
        .oneshot(post(
            "/api/cart/add",
            json!({ "userId": USER_ID, "productId": product_id, "quantity": 3 }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["items"][0]["quantity"], 5);
    assert_eq!(body["data"]["totalPrice"], "50.00");

    // Read expands the product record.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/cart?userId={USER_ID}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["items"][0]["product"]["name"], "Widget");
    assert_eq!(body["data"]["totalPrice"], "50.00");

    // Removal empties the cart and zeroes the total.
    let response = app
        .clone()
        .oneshot(post(
            "/api/cart/remove",
            json!({ "userId": USER_ID, "productId": product_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["totalPrice"], "0");
}

#[tokio::test]
async fn multi_line_total_uses_per_line_prices() {
    let app = app();
    let first = create_product(&app, "Widget", "10.00").await;
    let second = create_product(&app, "Gadget", "3.00").await;

    app.clone()
        .oneshot(post(
            "/api/cart/add",
            json!({ "userId": USER_ID, "productId": first, "quantity": 2 }),
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(post(
            "/api/cart/add",
            json!({ "userId": USER_ID, "productId": second, "quantity": 3 }),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["data"]["totalPrice"], "29.00");
}

#[tokio::test]
async fn remove_without_cart_is_not_found() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post(
            "/api/cart/remove",
            json!({ "userId": USER_ID, "productId": "ffffffffffffffffffffffff" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["kind"], "not_found");
}

#[tokio::test]
async fn register_login_and_me_flow() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post(
            "/api/users/register",
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "correct horse"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Duplicate registration conflicts.
    let response = app
        .clone()
        .oneshot(post(
            "/api/users/register",
            json!({
                "name": "Eve",
                "email": "ada@example.com",
                "password": "other password"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(post(
            "/api/users/login",
            json!({ "email": "ada@example.com", "password": "correct horse" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["data"]["token"].as_str().unwrap().to_owned();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "ada@example.com");
    // The password hash never appears in a response.
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn me_without_valid_token_is_unauthenticated() {
    let app = app();

    let response = app.clone().oneshot(get("/api/users/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["kind"], "unauthenticated");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users/me")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthenticated() {
    let app = app();

    app.clone()
        .oneshot(post(
            "/api/users/register",
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "correct horse"
            }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post(
            "/api/users/login",
            json!({ "email": "ada@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn category_create_expand_and_conflict() {
    let app = app();
    let product_id = create_product(&app, "Mug", "5.00").await;

    let response = app
        .clone()
        .oneshot(post(
            "/api/categories",
            json!({ "name": "mugs", "products": [product_id] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let category_id = body["data"]["id"].as_str().unwrap().to_owned();

    // Expanded read resolves the product reference.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/categories/{category_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["products"][0]["name"], "Mug");

    // Duplicate name conflicts.
    let response = app
        .clone()
        .oneshot(post("/api/categories", json!({ "name": "mugs" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["kind"], "conflict");
}

#[tokio::test]
async fn category_lookup_by_name() {
    let app = app();
    let product_id = create_product(&app, "Mug", "5.00").await;

    app.clone()
        .oneshot(post(
            "/api/categories",
            json!({ "name": "mugs", "products": [product_id] }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/categories/name/mugs"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "mugs");
    assert_eq!(body["data"]["products"][0]["name"], "Mug");

    let response = app
        .clone()
        .oneshot(get("/api/categories/name/unknown"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn attach_product_to_category() {
    let app = app();
    let product_id = create_product(&app, "Mug", "5.00").await;

    let response = app
        .clone()
        .oneshot(post("/api/categories", json!({ "name": "mugs" })))
        .await
        .unwrap();
    let body = body_json(response).await;
    let category_id = body["data"]["id"].as_str().unwrap().to_owned();

    let response = app
        .clone()
        .oneshot(post(
            &format!("/api/categories/{category_id}/products"),
            json!({ "productId": product_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["products"][0], product_id);
}

#[tokio::test]
async fn order_notification_is_accepted_without_smtp() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post(
            "/api/notifications/order",
            json!({
                "customerEmail": "ada@example.com",
                "order": { "id": "order-1", "items": ["2 x Widget"], "total": "20.00" }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .clone()
        .oneshot(post(
            "/api/notifications/order",
            json!({
                "customerEmail": "not-an-email",
                "order": { "id": "order-1", "items": [], "total": "0" }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A negative total never makes it past deserialization.
    let response = app
        .clone()
        .oneshot(post(
            "/api/notifications/order",
            json!({
                "customerEmail": "ada@example.com",
                "order": { "id": "order-1", "items": [], "total": "-5.00" }
            }),
        ))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
