//! SyncProductHandler - Command handler for mirroring catalog products into the gateway.

use std::sync::Arc;

use crate::domain::order::OrderError;
use crate::ports::{GatewayProduct, PaymentGateway, ProductDefinition};

/// Command to mirror one catalog product into the payment gateway.
///
/// Issued by the catalog whenever a product is created or its name or
/// price changes. `existing_gateway_id` distinguishes the two cases.
#[derive(Debug, Clone)]
pub struct SyncProductCommand {
    pub name: String,
    pub price_cents: i64,
    /// Gateway product id from a previous sync, if any.
    pub existing_gateway_id: Option<String>,
}

/// Result of a product sync.
///
/// The caller is responsible for writing these ids back to the catalog;
/// until that happens the product has no price id and stays unpurchasable.
#[derive(Debug, Clone)]
pub struct SyncProductResult {
    pub gateway: GatewayProduct,
}

/// Handler for pushing catalog products to the payment gateway.
pub struct SyncProductHandler {
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl SyncProductHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, currency: impl Into<String>) -> Self {
        Self {
            gateway,
            currency: currency.into(),
        }
    }

    pub async fn handle(&self, cmd: SyncProductCommand) -> Result<SyncProductResult, OrderError> {
        if cmd.name.is_empty() {
            return Err(OrderError::validation("name", "must not be empty"));
        }
        if cmd.price_cents <= 0 {
            return Err(OrderError::validation("price_cents", "must be positive"));
        }

        let definition = ProductDefinition {
            name: cmd.name,
            price_cents: cmd.price_cents,
            currency: self.currency.clone(),
        };

        let gateway = match cmd.existing_gateway_id {
            Some(id) => self
                .gateway
                .update_product(&id, definition)
                .await
                .map_err(|e| OrderError::payment_failed(e.message))?,
            None => self
                .gateway
                .create_product(definition)
                .await
                .map_err(|e| OrderError::payment_failed(e.message))?,
        };

        Ok(SyncProductResult { gateway })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{
        CheckoutSession, CreateCheckoutRequest, GatewayError, WebhookEvent,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementation
    // ════════════════════════════════════════════════════════════════════════════

    enum RecordedCall {
        Create(ProductDefinition),
        Update(String, ProductDefinition),
    }

    struct MockPaymentGateway {
        calls: Mutex<Vec<RecordedCall>>,
        fail: bool,
    }

    impl MockPaymentGateway {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for MockPaymentGateway {
        async fn create_checkout_session(
            &self,
            _request: CreateCheckoutRequest,
        ) -> Result<CheckoutSession, GatewayError> {
            Err(GatewayError::provider("Not implemented in mock"))
        }

        async fn create_product(
            &self,
            definition: ProductDefinition,
        ) -> Result<GatewayProduct, GatewayError> {
            if self.fail {
                return Err(GatewayError::provider("Product creation failed"));
            }
            self.calls
                .lock()
                .unwrap()
                .push(RecordedCall::Create(definition));
            Ok(GatewayProduct {
                product_id: "prod_new".to_string(),
                price_id: "price_new".to_string(),
            })
        }

        async fn update_product(
            &self,
            gateway_product_id: &str,
            definition: ProductDefinition,
        ) -> Result<GatewayProduct, GatewayError> {
            if self.fail {
                return Err(GatewayError::provider("Product update failed"));
            }
            self.calls.lock().unwrap().push(RecordedCall::Update(
                gateway_product_id.to_string(),
                definition,
            ));
            Ok(GatewayProduct {
                product_id: gateway_product_id.to_string(),
                price_id: "price_updated".to_string(),
            })
        }

        async fn verify_webhook(
            &self,
            _payload: &[u8],
            _signature: &str,
        ) -> Result<WebhookEvent, GatewayError> {
            Err(GatewayError::invalid_webhook("Not implemented in mock"))
        }
    }

    fn command(existing: Option<&str>) -> SyncProductCommand {
        SyncProductCommand {
            name: "Icon Pack".to_string(),
            price_cents: 1500,
            existing_gateway_id: existing.map(|s| s.to_string()),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn new_product_is_created_in_gateway() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = SyncProductHandler::new(gateway.clone(), "gbp");

        let result = handler.handle(command(None)).await.unwrap();

        assert_eq!(result.gateway.product_id, "prod_new");
        assert_eq!(result.gateway.price_id, "price_new");

        let calls = gateway.calls.lock().unwrap();
        assert!(matches!(
            &calls[0],
            RecordedCall::Create(d) if d.currency == "gbp" && d.price_cents == 1500
        ));
    }

    #[tokio::test]
    async fn existing_product_is_updated_in_gateway() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = SyncProductHandler::new(gateway.clone(), "gbp");

        let result = handler.handle(command(Some("prod_old"))).await.unwrap();

        assert_eq!(result.gateway.product_id, "prod_old");

        let calls = gateway.calls.lock().unwrap();
        assert!(matches!(
            &calls[0],
            RecordedCall::Update(id, _) if id == "prod_old"
        ));
    }

    #[tokio::test]
    async fn rejects_empty_name() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = SyncProductHandler::new(gateway, "gbp");

        let mut cmd = command(None);
        cmd.name = String::new();

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(OrderError::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn rejects_non_positive_price() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = SyncProductHandler::new(gateway, "gbp");

        let mut cmd = command(None);
        cmd.price_cents = 0;

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(OrderError::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn gateway_failure_surfaces_as_payment_error() {
        let gateway = Arc::new(MockPaymentGateway::failing());
        let handler = SyncProductHandler::new(gateway, "gbp");

        let result = handler.handle(command(None)).await;

        assert!(matches!(result, Err(OrderError::PaymentFailed { .. })));
    }
}
