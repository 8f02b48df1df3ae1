//! Cart route handlers.
//!
//! Identifiers arrive as opaque strings and are validated against the
//! store's 24-hex-character reference format here, before any store access.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use copperleaf_core::{ProductId, UserId};

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::models::{Cart, ExpandedCart};
use crate::services::CartService;
use crate::state::AppState;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub user_id: String,
    pub product_id: String,
    /// Deserialized wide so that zero and negative values produce a clean
    /// validation error instead of a serde rejection.
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub user_id: String,
    pub product_id: String,
}

/// Get cart query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCartQuery {
    pub user_id: String,
}

fn parse_user_id(raw: &str) -> Result<UserId> {
    UserId::parse(raw).map_err(|e| AppError::BadRequest(format!("invalid userId: {e}")))
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(format!("invalid productId: {e}")))
}

/// Add a product to the user's cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<ApiResponse<Cart>>> {
    let user_id = parse_user_id(&body.user_id)?;
    let product_id = parse_product_id(&body.product_id)?;
    let quantity = u32::try_from(body.quantity)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .ok_or_else(|| AppError::BadRequest("quantity must be a positive integer".to_owned()))?;

    let cart = CartService::new(state.store())
        .add_item(user_id, product_id, quantity)
        .await?;

    Ok(Json(ApiResponse::new(
        "Product added to cart successfully",
        cart,
    )))
}

/// Remove a product from the user's cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<RemoveFromCartRequest>,
) -> Result<Json<ApiResponse<Cart>>> {
    let user_id = parse_user_id(&body.user_id)?;
    let product_id = parse_product_id(&body.product_id)?;

    let cart = CartService::new(state.store())
        .remove_item(user_id, product_id)
        .await?;

    Ok(Json(ApiResponse::new(
        "Product removed from cart successfully",
        cart,
    )))
}

/// Retrieve the user's cart with products expanded.
#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    Query(query): Query<GetCartQuery>,
) -> Result<Json<ApiResponse<ExpandedCart>>> {
    let user_id = parse_user_id(&query.user_id)?;

    let cart = CartService::new(state.store()).get_cart(user_id).await?;

    Ok(Json(ApiResponse::new("Cart retrieved successfully", cart)))
}
