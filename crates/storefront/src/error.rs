//! Unified request error handling.
//!
//! Provides a unified `AppError` type that maps every service failure to an
//! HTTP status plus a JSON body carrying a stable machine-readable `kind`
//! alongside the human-readable message. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use copperleaf_core::IdError;

use crate::db::RepositoryError;
use crate::services::{AuthError, CartError, CatalogError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input, including malformed identifiers.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate unique key.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing or invalid session token.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Store timed out or is otherwise unavailable.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable error kind exposed to clients.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Unavailable(_) => "unavailable",
            Self::Internal(_) => "internal",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Unavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Unavailable(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "request error");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Unavailable(_) => "service temporarily unavailable".to_owned(),
            Self::Internal(_) => "internal server error".to_owned(),
            Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::Unauthenticated(msg) => msg.clone(),
        };

        let body = json!({
            "error": {
                "kind": self.kind(),
                "message": message,
            }
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<IdError> for AppError {
    fn from(e: IdError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::NotFound => Self::NotFound("record not found".to_owned()),
            RepositoryError::Unavailable(msg) => Self::Unavailable(msg),
            RepositoryError::VersionMismatch | RepositoryError::DataCorruption(_) => {
                Self::Internal(e.to_string())
            }
        }
    }
}

impl From<CartError> for AppError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::InvalidQuantity | CartError::QuantityOverflow => {
                Self::BadRequest(e.to_string())
            }
            CartError::ProductNotFound => Self::NotFound("product not found".to_owned()),
            CartError::CartNotFound => Self::NotFound("cart not found".to_owned()),
            CartError::Repository(inner) => inner.into(),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::ProductNotFound => Self::NotFound("product not found".to_owned()),
            CatalogError::CategoryNotFound => Self::NotFound("category not found".to_owned()),
            CatalogError::DuplicateCategoryName => Self::Conflict(e.to_string()),
            CatalogError::Repository(inner) => inner.into(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => {
                Self::BadRequest(e.to_string())
            }
            AuthError::InvalidCredentials => Self::Unauthenticated("invalid credentials".to_owned()),
            AuthError::UserAlreadyExists => {
                Self::Conflict("an account with this email already exists".to_owned())
            }
            // A valid token for a vanished account is still "not logged in",
            // never a 404.
            AuthError::UserNotFound | AuthError::InvalidToken => {
                Self::Unauthenticated("invalid or expired session".to_owned())
            }
            AuthError::TokenIssue | AuthError::PasswordHash => Self::Internal(e.to_string()),
            AuthError::Repository(inner) => inner.into(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
