//! Receipt delivery via the Resend HTTP API.
//!
//! Receipts are best-effort: callers log failures and move on, so this
//! adapter never needs retries or queuing.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::order::Order;
use crate::ports::ReceiptSender;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    /// Resend API key (re_...).
    api_key: SecretString,

    /// Formatted From header, e.g. "Curio Market <noreply@curiomarket.com>".
    from: String,

    /// Base URL for the Resend API (overridable for testing).
    api_url: String,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from: from.into(),
            api_url: RESEND_API_URL.to_string(),
        }
    }

    /// Set a custom API URL (for testing).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    html: String,
}

/// Sends payment receipts through Resend.
pub struct ResendReceiptSender {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendReceiptSender {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn build_receipt(order: &Order) -> (String, String) {
        let subject = "Your order receipt".to_string();
        let html = format!(
            "<h1>Thanks for your purchase!</h1>\
             <p>Order <strong>{}</strong> is confirmed and paid.</p>\
             <p>Items: {}</p>",
            order.id,
            order.products.len()
        );
        (subject, html)
    }
}

#[async_trait]
impl ReceiptSender for ResendReceiptSender {
    async fn send_payment_receipt(&self, order: &Order) -> Result<(), DomainError> {
        let (subject, html) = Self::build_receipt(order);

        let request = SendEmailRequest {
            from: &self.config.from,
            to: [order.user_email.as_str()],
            subject,
            html,
        };

        let response = self
            .http_client
            .post(&self.config.api_url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::ExternalServiceError,
                    format!("Failed to reach email provider: {}", e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, error = %error_text, "Receipt email rejected");
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Email provider error: {}", error_text),
            ));
        }

        tracing::info!(order_id = %order.id, "Receipt email sent");
        Ok(())
    }
}

/// Receipt sender that only logs, for environments without email credentials.
pub struct LogOnlyReceiptSender;

#[async_trait]
impl ReceiptSender for LogOnlyReceiptSender {
    async fn send_payment_receipt(&self, order: &Order) -> Result<(), DomainError> {
        tracing::info!(
            order_id = %order.id,
            to = %order.user_email,
            "Receipt email suppressed (email disabled)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OrderId, ProductId, UserId};

    fn test_order() -> Order {
        Order::create_pending(
            OrderId::new(),
            UserId::new("user-1").unwrap(),
            "buyer@example.com".to_string(),
            vec![ProductId::new("prod-1").unwrap()],
        )
    }

    #[test]
    fn receipt_body_includes_order_id_and_item_count() {
        let order = test_order();
        let (subject, html) = ResendReceiptSender::build_receipt(&order);

        assert_eq!(subject, "Your order receipt");
        assert!(html.contains(&order.id.to_string()));
        assert!(html.contains("Items: 1"));
    }

    #[tokio::test]
    async fn log_only_sender_always_succeeds() {
        let sender = LogOnlyReceiptSender;
        let order = test_order();

        assert!(sender.send_payment_receipt(&order).await.is_ok());
    }
}
