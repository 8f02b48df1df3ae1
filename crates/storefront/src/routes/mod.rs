//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Health check
//!
//! # Cart
//! POST /api/cart/add                  - Add a product to the user's cart
//! POST /api/cart/remove               - Remove a product from the user's cart
//! GET  /api/cart?userId=              - Retrieve the cart, products expanded
//!
//! # Catalog
//! POST /api/products                  - Create a product
//! GET  /api/products                  - List products
//! GET  /api/products/{id}             - Product detail
//! POST /api/categories                - Create a category
//! GET  /api/categories                - List categories (expanded)
//! GET  /api/categories/{id}           - Category detail (expanded)
//! GET  /api/categories/name/{name}    - Category detail by unique name
//! POST /api/categories/{id}/products  - Attach a product to a category
//!
//! # Users
//! POST /api/users/register            - Register, returns a session token
//! POST /api/users/login               - Login, returns a session token
//! GET  /api/users/me                  - Current user (requires auth)
//!
//! # Notifications
//! POST /api/notifications/order       - Fire-and-forget order emails
//! ```
//!
//! Success bodies use the `{ "message": ..., "data": ... }` envelope; errors
//! use `{ "error": { "kind": ..., "message": ... } }` (see `crate::error`).

pub mod cart;
pub mod categories;
pub mod notifications;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload with a human-readable message.
    pub fn new(message: &str, data: T) -> Self {
        Self {
            message: message.to_owned(),
            data,
        }
    }
}

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(cart::get_cart))
        .route("/api/cart/add", post(cart::add))
        .route("/api/cart/remove", post(cart::remove))
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/{id}", get(products::get))
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route("/api/categories/{id}", get(categories::get))
        .route("/api/categories/name/{name}", get(categories::get_by_name))
        .route(
            "/api/categories/{id}/products",
            post(categories::attach_product),
        )
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .route("/api/users/me", get(users::me))
        .route("/api/notifications/order", post(notifications::order))
}
