//! Stripe payment gateway adapter.
//!
//! Implements the `PaymentGateway` trait against the Stripe REST API.
//! Handles hosted checkout sessions, catalog mirroring, and webhook
//! verification.
//!
//! # Security
//!
//! - Webhook verification delegates to the domain
//!   [`StripeWebhookVerifier`], which performs HMAC-SHA256 with a
//!   constant-time comparison and a replay window
//! - Secrets handled via `secrecy::SecretString`

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::order::{StripeEvent, StripeEventType, StripeWebhookVerifier};
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, GatewayError, GatewayErrorCode, GatewayProduct,
    PaymentGateway, ProductDefinition, WebhookEvent, WebhookEventData, WebhookEventType,
};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Whether to reject test-mode events.
    require_livemode: bool,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            require_livemode: false,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Require livemode events in production.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }
}

/// Stripe gateway adapter.
pub struct StripeGateway {
    config: StripeConfig,
    http_client: reqwest::Client,
    verifier: StripeWebhookVerifier,
}

impl StripeGateway {
    /// Create a new Stripe gateway with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        let verifier = StripeWebhookVerifier::new(config.webhook_secret.expose_secret());
        Self {
            config,
            http_client: reqwest::Client::new(),
            verifier,
        }
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(path, status = %status, error = %error_text, "Stripe API call failed");
            let code = match status.as_u16() {
                401 | 403 => GatewayErrorCode::AuthenticationError,
                404 => GatewayErrorCode::NotFound,
                429 => GatewayErrorCode::RateLimitExceeded,
                _ => GatewayErrorCode::ProviderError,
            };
            return Err(GatewayError::new(
                code,
                format!("Stripe API error: {}", error_text),
            ));
        }

        response.json().await.map_err(|e| {
            GatewayError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

/// Checkout session as returned by the Stripe API.
#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
    id: String,
    url: Option<String>,
    expires_at: Option<i64>,
}

/// Product as returned by the Stripe API.
#[derive(Debug, Deserialize)]
struct StripeProductResponse {
    id: String,
    default_price: Option<String>,
}

/// Checkout session object inside a webhook event.
#[derive(Debug, Deserialize)]
struct StripeSessionObject {
    id: String,
    #[serde(default)]
    metadata: std::collections::HashMap<String, String>,
}

/// Convert a verified Stripe event into the gateway-neutral webhook event.
pub fn convert_event(event: StripeEvent) -> Result<WebhookEvent, GatewayError> {
    let (event_type, data) = match event.parsed_type() {
        StripeEventType::CheckoutSessionCompleted => {
            let session: StripeSessionObject = event.deserialize_object().map_err(|e| {
                GatewayError::invalid_webhook(format!("Invalid checkout session: {}", e))
            })?;
            (
                WebhookEventType::CheckoutSessionCompleted,
                WebhookEventData::Checkout {
                    session_id: session.id,
                    user_id: session.metadata.get("userId").cloned(),
                    order_id: session.metadata.get("orderId").cloned(),
                },
            )
        }
        StripeEventType::Unknown => (
            WebhookEventType::Unknown(event.event_type.clone()),
            WebhookEventData::Raw {
                json: serde_json::to_string(&event.data.object).unwrap_or_default(),
            },
        ),
    };

    Ok(WebhookEvent {
        id: event.id,
        event_type,
        data,
        created_at: event.created,
    })
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), request.success_url),
            ("cancel_url".to_string(), request.cancel_url),
            (
                "metadata[userId]".to_string(),
                request.user_id.to_string(),
            ),
            (
                "metadata[orderId]".to_string(),
                request.order_id.to_string(),
            ),
        ];

        for (i, method) in request.payment_method_types.iter().enumerate() {
            params.push((format!("payment_method_types[{}]", i), method.clone()));
        }

        for (i, item) in request.line_items.iter().enumerate() {
            params.push((format!("line_items[{}][price]", i), item.price.clone()));
            params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        let session: StripeSessionResponse =
            self.post_form("/v1/checkout/sessions", &params).await?;

        // Stripe checkout sessions expire after 24 hours by default
        let expires_at = session
            .expires_at
            .unwrap_or_else(|| chrono::Utc::now().timestamp() + 24 * 60 * 60);

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
            expires_at,
        })
    }

    async fn create_product(
        &self,
        definition: ProductDefinition,
    ) -> Result<GatewayProduct, GatewayError> {
        let params = vec![
            ("name".to_string(), definition.name),
            (
                "default_price_data[currency]".to_string(),
                definition.currency,
            ),
            (
                "default_price_data[unit_amount]".to_string(),
                definition.price_cents.to_string(),
            ),
        ];

        let product: StripeProductResponse = self.post_form("/v1/products", &params).await?;

        let price_id = product.default_price.ok_or_else(|| {
            GatewayError::provider("Stripe product created without a default price")
        })?;

        Ok(GatewayProduct {
            product_id: product.id,
            price_id,
        })
    }

    async fn update_product(
        &self,
        gateway_product_id: &str,
        definition: ProductDefinition,
    ) -> Result<GatewayProduct, GatewayError> {
        let params = vec![("name".to_string(), definition.name)];

        let product: StripeProductResponse = self
            .post_form(&format!("/v1/products/{}", gateway_product_id), &params)
            .await?;

        let price_id = product
            .default_price
            .ok_or_else(|| GatewayError::provider("Stripe product has no default price"))?;

        Ok(GatewayProduct {
            product_id: product.id,
            price_id,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, GatewayError> {
        let event = self
            .verifier
            .verify_and_parse(payload, signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook verification failed");
                GatewayError::invalid_webhook(e.to_string())
            })?;

        if self.config.require_livemode && !event.is_live() {
            tracing::warn!(event_id = %event.id, "Rejected test mode event in production");
            return Err(GatewayError::invalid_webhook(
                "Test mode events not allowed in production",
            ));
        }

        let webhook_event = convert_event(event)?;

        tracing::info!(
            event_id = %webhook_event.id,
            event_type = ?webhook_event.event_type,
            "Webhook signature verified"
        );

        Ok(webhook_event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::compute_test_signature;
    use serde_json::json;

    fn test_config() -> StripeConfig {
        StripeConfig::new("sk_test_key", "whsec_test_secret")
    }

    fn signed_header(secret: &str, payload: &str) -> String {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature(secret, timestamp, payload);
        format!("t={},v1={}", timestamp, signature)
    }

    fn completed_payload(livemode: bool) -> String {
        serde_json::to_string(&json!({
            "id": "evt_test_1",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": {
                "object": {
                    "id": "cs_test_1",
                    "metadata": {
                        "userId": "user-1",
                        "orderId": "0b51e1a8-3c62-4b7d-9c5e-7f1a2b3c4d5e"
                    }
                }
            },
            "livemode": livemode,
            "api_version": "2023-10-16"
        }))
        .unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_new_sets_defaults() {
        let config = test_config();
        assert_eq!(config.api_base_url, "https://api.stripe.com");
        assert!(!config.require_livemode);
    }

    #[test]
    fn config_with_base_url() {
        let config = test_config().with_base_url("http://localhost:8080");
        assert_eq!(config.api_base_url, "http://localhost:8080");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Webhook Verification Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn verify_webhook_accepts_valid_signature() {
        let gateway = StripeGateway::new(test_config());
        let payload = completed_payload(false);
        let header = signed_header("whsec_test_secret", &payload);

        let event = gateway
            .verify_webhook(payload.as_bytes(), &header)
            .await
            .unwrap();

        assert_eq!(event.id, "evt_test_1");
        assert_eq!(event.event_type, WebhookEventType::CheckoutSessionCompleted);
    }

    #[tokio::test]
    async fn verify_webhook_extracts_session_metadata() {
        let gateway = StripeGateway::new(test_config());
        let payload = completed_payload(false);
        let header = signed_header("whsec_test_secret", &payload);

        let event = gateway
            .verify_webhook(payload.as_bytes(), &header)
            .await
            .unwrap();

        match event.data {
            WebhookEventData::Checkout {
                session_id,
                user_id,
                order_id,
            } => {
                assert_eq!(session_id, "cs_test_1");
                assert_eq!(user_id.as_deref(), Some("user-1"));
                assert_eq!(
                    order_id.as_deref(),
                    Some("0b51e1a8-3c62-4b7d-9c5e-7f1a2b3c4d5e")
                );
            }
            _ => panic!("Expected checkout data"),
        }
    }

    #[tokio::test]
    async fn verify_webhook_rejects_bad_signature() {
        let gateway = StripeGateway::new(test_config());
        let payload = completed_payload(false);
        let header = format!("t={},v1={}", chrono::Utc::now().timestamp(), "a".repeat(64));

        let result = gateway.verify_webhook(payload.as_bytes(), &header).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code, GatewayErrorCode::InvalidWebhook);
    }

    #[tokio::test]
    async fn verify_webhook_rejects_test_events_when_livemode_required() {
        let gateway = StripeGateway::new(test_config().with_require_livemode(true));
        let payload = completed_payload(false);
        let header = signed_header("whsec_test_secret", &payload);

        let result = gateway.verify_webhook(payload.as_bytes(), &header).await;

        assert!(result.is_err());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Event Conversion Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn convert_event_maps_unknown_types_to_raw() {
        let event: StripeEvent = serde_json::from_value(json!({
            "id": "evt_other",
            "type": "charge.refunded",
            "created": 1704067200,
            "data": { "object": { "id": "ch_1" } },
            "livemode": false,
            "api_version": "2023-10-16"
        }))
        .unwrap();

        let converted = convert_event(event).unwrap();

        assert_eq!(
            converted.event_type,
            WebhookEventType::Unknown("charge.refunded".to_string())
        );
        assert!(matches!(converted.data, WebhookEventData::Raw { .. }));
    }

    #[test]
    fn convert_event_tolerates_missing_metadata() {
        let event: StripeEvent = serde_json::from_value(json!({
            "id": "evt_no_meta",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": { "object": { "id": "cs_no_meta" } },
            "livemode": false,
            "api_version": "2023-10-16"
        }))
        .unwrap();

        let converted = convert_event(event).unwrap();

        match converted.data {
            WebhookEventData::Checkout {
                user_id, order_id, ..
            } => {
                assert!(user_id.is_none());
                assert!(order_id.is_none());
            }
            _ => panic!("Expected checkout data"),
        }
    }
}
