//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    pub stripe_api_key: String,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,

    /// Stripe price ID for the flat transaction fee appended to every
    /// checkout
    pub transaction_fee_price_id: String,

    /// Public site URL used to build checkout redirect URLs
    pub public_url: String,

    /// ISO currency code used when mirroring products (lowercase)
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        if self.transaction_fee_price_id.is_empty() {
            return Err(ValidationError::MissingRequired("TRANSACTION_FEE_PRICE_ID"));
        }
        if self.public_url.is_empty() {
            return Err(ValidationError::MissingRequired("PUBLIC_URL"));
        }

        // Verify key prefixes for safety
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !self.transaction_fee_price_id.starts_with("price_") {
            return Err(ValidationError::InvalidStripePriceId);
        }

        // Redirect URLs are built by appending paths
        if self.public_url.ends_with('/') {
            return Err(ValidationError::InvalidPublicUrl);
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidCurrency);
        }

        Ok(())
    }
}

fn default_currency() -> String {
    "gbp".to_string()
}
