//! Email notification dispatcher.
//!
//! Sends transactional order emails over SMTP via lettre. Dispatch is
//! fire-and-forget: [`notify_order`] spawns the sends on a detached task,
//! logs failures, and never surfaces them to the triggering request.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use copperleaf_core::{Email, Price};

use crate::config::EmailConfig;

/// Summary of an order, as carried in notification bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    /// Display lines, e.g. "2 x Widget".
    pub items: Vec<String>,
    pub total: Price,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    owner_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_user.clone(),
            config.smtp_password.expose_secret().to_owned(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            owner_address: config.owner_address.clone(),
        })
    }

    /// Send an order confirmation to the customer.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the message cannot be built or delivered.
    pub async fn send_order_confirmation(
        &self,
        customer_email: &Email,
        order: &OrderSummary,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Thank you for your order! Here are your order details:\n\n\
             Order ID: {}\nItems: {}\nTotal: {}\n\n\
             Your order will be processed shortly.",
            order.id,
            order.items.join(", "),
            order.total,
        );

        self.send(customer_email.as_str(), "Order Confirmation", body)
            .await
    }

    /// Send a new-order notification to the store owner.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the message cannot be built or delivered.
    pub async fn send_owner_notification(&self, order: &OrderSummary) -> Result<(), EmailError> {
        let body = format!(
            "A new order has been placed. Here are the details:\n\n\
             Order ID: {}\nItems: {}\nTotal: {}\n\
             Please process this order as soon as possible.",
            order.id,
            order.items.join(", "),
            order.total,
        );

        let owner = self.owner_address.clone();
        self.send(&owner, "New Order Placed", body).await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_owned()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(message).await?;
        Ok(())
    }
}

/// Fire-and-forget dispatch of both order notifications.
///
/// Runs detached from the triggering request; failures are logged, never
/// returned. A `None` mailer (SMTP unconfigured) drops the notification
/// with a debug log.
pub fn notify_order(mailer: Option<EmailService>, customer_email: Email, order: OrderSummary) {
    let Some(mailer) = mailer else {
        tracing::debug!(order_id = %order.id, "email disabled, dropping order notification");
        return;
    };

    tokio::spawn(async move {
        if let Err(e) = mailer.send_order_confirmation(&customer_email, &order).await {
            tracing::warn!(order_id = %order.id, "failed to send order confirmation: {e}");
        }

        if let Err(e) = mailer.send_owner_notification(&order).await {
            tracing::warn!(order_id = %order.id, "failed to send owner notification: {e}");
        }
    });
}
