//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use copperleaf_core::{CategoryId, ProductId};

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::models::{Category, ExpandedCategory};
use crate::services::CatalogService;
use crate::state::AppState;

/// Create category request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    /// Product ids to reference at creation; may be empty.
    #[serde(default)]
    pub products: Vec<String>,
}

/// Attach product request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachProductRequest {
    pub product_id: String,
}

fn parse_category_id(raw: &str) -> Result<CategoryId> {
    CategoryId::parse(raw).map_err(|e| AppError::BadRequest(format!("invalid category id: {e}")))
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(format!("invalid productId: {e}")))
}

/// Create a category.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>)> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }

    let mut product_ids = Vec::with_capacity(body.products.len());
    for raw in &body.products {
        product_ids.push(parse_product_id(raw)?);
    }

    let category = CatalogService::new(state.store())
        .create_category(body.name, product_ids)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Category created successfully", category)),
    ))
}

/// List all categories with products expanded.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ExpandedCategory>>>> {
    let categories = CatalogService::new(state.store()).list_categories().await?;

    Ok(Json(ApiResponse::new(
        "Categories retrieved successfully",
        categories,
    )))
}

/// Get a category by id with products expanded.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ExpandedCategory>>> {
    let id = parse_category_id(&id)?;

    let category = CatalogService::new(state.store()).get_category(&id).await?;

    Ok(Json(ApiResponse::new(
        "Category retrieved successfully",
        category,
    )))
}

/// Get a category by its unique name with products expanded.
#[instrument(skip(state))]
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<ExpandedCategory>>> {
    let category = CatalogService::new(state.store())
        .get_category_by_name(&name)
        .await?;

    Ok(Json(ApiResponse::new(
        "Category retrieved successfully",
        category,
    )))
}

/// Attach an existing product to a category.
#[instrument(skip(state))]
pub async fn attach_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AttachProductRequest>,
) -> Result<Json<ApiResponse<Category>>> {
    let category_id = parse_category_id(&id)?;
    let product_id = parse_product_id(&body.product_id)?;

    let category = CatalogService::new(state.store())
        .attach_product_to_category(&category_id, product_id)
        .await?;

    Ok(Json(ApiResponse::new(
        "Product attached to category successfully",
        category,
    )))
}
