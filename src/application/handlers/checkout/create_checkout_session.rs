//! CreateCheckoutSessionHandler - Command handler for initiating checkout.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{OrderId, ProductId, UserId};
use crate::domain::order::{build_line_items, Order, OrderError};
use crate::ports::{CreateCheckoutRequest, OrderRepository, PaymentGateway, Product, ProductReader};

/// Payment methods offered on the hosted checkout page.
const PAYMENT_METHOD_TYPES: &[&str] = &["card", "paypal"];

/// Command to initiate checkout for a cart of products.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub user_id: UserId,
    pub user_email: String,
    pub product_ids: Vec<ProductId>,
}

/// Result of checkout initiation.
///
/// `url` is `None` when the gateway could not produce a session; the order
/// still exists and the client is expected to surface a soft failure.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionResult {
    pub order: Order,
    pub url: Option<String>,
}

/// Handler for initiating checkout.
///
/// Creates a pending order, then asks the payment gateway for a hosted
/// checkout session covering the order's products plus the flat
/// transaction fee. The order is persisted before the gateway call so a
/// completed payment can always be reconciled, even if the response to
/// the client is lost.
pub struct CreateCheckoutSessionHandler {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductReader>,
    gateway: Arc<dyn PaymentGateway>,
    fee_price_id: String,
    public_url: String,
}

impl CreateCheckoutSessionHandler {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductReader>,
        gateway: Arc<dyn PaymentGateway>,
        fee_price_id: impl Into<String>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            orders,
            products,
            gateway,
            fee_price_id: fee_price_id.into(),
            public_url: public_url.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CreateCheckoutSessionResult, OrderError> {
        // 1. Reject empty carts before any state is created
        if cmd.product_ids.is_empty() {
            return Err(OrderError::empty_product_list());
        }

        // 2. Resolve products; unknown ids simply don't come back
        let products = self.products.find_by_ids(&cmd.product_ids).await?;

        // 3. Keep only products that can actually be charged
        let purchasable: Vec<_> = products.into_iter().filter(|p| p.is_purchasable()).collect();

        let product_ids: Vec<ProductId> = purchasable.iter().map(|p| p.id.clone()).collect();
        let price_ids = collect_price_ids(&purchasable)?;

        // 4. Persist the pending order before talking to the gateway
        let order = Order::create_pending(
            OrderId::new(),
            cmd.user_id.clone(),
            cmd.user_email,
            product_ids,
        );
        self.orders.create(&order).await?;

        // 5. Request the hosted session
        let line_items = build_line_items(&price_ids, &self.fee_price_id);
        let request = CreateCheckoutRequest {
            user_id: cmd.user_id,
            order_id: order.id,
            line_items,
            success_url: format!("{}/thank-you?orderId={}", self.public_url, order.id),
            cancel_url: format!("{}/cart", self.public_url),
            payment_method_types: PAYMENT_METHOD_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        // Gateway failure is a soft failure: the order stays pending and
        // the client receives a null url
        let url = match self.gateway.create_checkout_session(request).await {
            Ok(session) => session.url,
            Err(e) => {
                warn!(
                    order_id = %order.id,
                    error = %e,
                    "checkout session creation failed"
                );
                None
            }
        };

        Ok(CreateCheckoutSessionResult { order, url })
    }
}

/// Extracts the provider price id from each already-filtered product.
///
/// Filtering guarantees every product here carries a price id; a `None`
/// at this point means the catalog changed underneath us and the cart
/// cannot be priced.
fn collect_price_ids(products: &[Product]) -> Result<Vec<String>, OrderError> {
    products
        .iter()
        .map(|p| {
            p.price_id
                .clone()
                .ok_or_else(|| OrderError::missing_price_id(p.id.clone()))
        })
        .collect()
}
