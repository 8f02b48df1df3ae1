//! User account route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use copperleaf_core::UserRole;

use super::ApiResponse;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `customer`.
    #[serde(default)]
    pub role: UserRole,
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session token payload.
#[derive(Debug, Serialize)]
pub struct SessionData {
    pub token: String,
}

/// Register a new user.
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionData>>)> {
    let (_user, token) = AuthService::new(state.store(), state.token_keys())
        .register(&body.name, &body.email, &body.password, body.role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "User registered successfully",
            SessionData { token },
        )),
    ))
}

/// Login with email and password.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionData>>> {
    let token = AuthService::new(state.store(), state.token_keys())
        .login(&body.email, &body.password)
        .await?;

    Ok(Json(ApiResponse::new(
        "Login successful",
        SessionData { token },
    )))
}

/// Current authenticated user.
#[instrument(skip(state, claims))]
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<ApiResponse<User>>> {
    let user = AuthService::new(state.store(), state.token_keys())
        .current_user(&claims)
        .await?;

    Ok(Json(ApiResponse::new("User retrieved successfully", user)))
}
