//! Notification route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use copperleaf_core::Email;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::{OrderSummary, email::notify_order};
use crate::state::AppState;

/// Order notification request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotificationRequest {
    pub customer_email: String,
    pub order: OrderSummary,
}

/// Dispatch order confirmation and owner notification emails.
///
/// Returns 202 immediately; delivery runs detached and delivery failures
/// are logged, never reported to the caller.
#[instrument(skip(state, body))]
pub async fn order(
    State(state): State<AppState>,
    Json(body): Json<OrderNotificationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    let customer_email = Email::parse(&body.customer_email)
        .map_err(|e| AppError::BadRequest(format!("invalid customerEmail: {e}")))?;

    notify_order(state.mailer().cloned(), customer_email, body.order);

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::new("Order notification dispatched", ())),
    ))
}
