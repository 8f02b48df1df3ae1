//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use copperleaf_core::{Price, ProductId};

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::services::{CatalogService, NewProduct};
use crate::state::AppState;

/// Create product request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
    pub description: String,
    pub image: String,
}

/// Create a product.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }

    let quantity = u32::try_from(body.quantity)
        .map_err(|_| AppError::BadRequest("quantity must be a non-negative integer".to_owned()))?;
    let price = Price::new(body.price)
        .map_err(|e| AppError::BadRequest(format!("invalid price: {e}")))?;

    let product = CatalogService::new(state.store())
        .create_product(NewProduct {
            name: body.name,
            quantity,
            price,
            description: body.description,
            image: body.image,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Product created successfully", product)),
    ))
}

/// List all products.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let products = CatalogService::new(state.store()).list_products().await?;

    Ok(Json(ApiResponse::new(
        "Products retrieved successfully",
        products,
    )))
}

/// Get a product by id.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>> {
    let id = ProductId::parse(&id)
        .map_err(|e| AppError::BadRequest(format!("invalid product id: {e}")))?;

    let product = CatalogService::new(state.store()).get_product(&id).await?;

    Ok(Json(ApiResponse::new(
        "Product retrieved successfully",
        product,
    )))
}
