//! HandlePaymentWebhookHandler - Command handler for payment confirmation webhooks.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::OrderId;
use crate::domain::order::OrderError;
use crate::ports::{
    MarkPaidOutcome, OrderRepository, PaymentGateway, ReceiptSender, WebhookEvent,
    WebhookEventData, WebhookEventType,
};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload, exactly as received.
    pub payload: Vec<u8>,
    /// Webhook signature header.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    /// Checkout completed, order confirmed paid in this delivery.
    OrderMarkedPaid { order_id: String, user_id: String },
    /// Duplicate delivery: the order was already paid. No side effects.
    AlreadyPaid { order_id: String },
    /// Event acknowledged but no action taken (unhandled type).
    Acknowledged,
}

/// Handler for processing payment provider webhooks.
///
/// Only `checkout.session.completed` mutates state. The paid-flag write is
/// conditional, so duplicate deliveries are acknowledged without repeating
/// side effects. Receipt delivery is best-effort: a send failure is logged
/// and the event is still acknowledged, since the provider would otherwise
/// redeliver an event whose work is already done.
pub struct HandlePaymentWebhookHandler {
    orders: Arc<dyn OrderRepository>,
    gateway: Arc<dyn PaymentGateway>,
    receipts: Arc<dyn ReceiptSender>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        gateway: Arc<dyn PaymentGateway>,
        receipts: Arc<dyn ReceiptSender>,
    ) -> Self {
        Self {
            orders,
            gateway,
            receipts,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<WebhookOutcome, OrderError> {
        // 1. Verify webhook signature and parse event
        let webhook_event = self
            .gateway
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await
            .map_err(|_| OrderError::invalid_webhook_signature())?;

        // 2. Process based on event type
        match webhook_event.event_type {
            WebhookEventType::CheckoutSessionCompleted => {
                self.handle_checkout_completed(&webhook_event).await
            }
            WebhookEventType::Unknown(_) => Ok(WebhookOutcome::Acknowledged),
        }
    }

    async fn handle_checkout_completed(
        &self,
        webhook_event: &WebhookEvent,
    ) -> Result<WebhookOutcome, OrderError> {
        let (user_id, order_id) = match &webhook_event.data {
            WebhookEventData::Checkout {
                user_id, order_id, ..
            } => (user_id.clone(), order_id.clone()),
            _ => {
                return Err(OrderError::infrastructure(
                    "Unexpected webhook data type for checkout.session.completed",
                ))
            }
        };

        let user_id = user_id.ok_or_else(|| OrderError::missing_metadata("userId"))?;
        let order_id = order_id.ok_or_else(|| OrderError::missing_metadata("orderId"))?;

        let order_id: OrderId = order_id
            .parse()
            .map_err(|_| OrderError::validation("orderId", "not a valid order id"))?;

        match self.orders.mark_paid_if_unpaid(&order_id).await? {
            MarkPaidOutcome::Marked => {
                self.send_receipt(&order_id).await;
                Ok(WebhookOutcome::OrderMarkedPaid {
                    order_id: order_id.to_string(),
                    user_id,
                })
            }
            MarkPaidOutcome::AlreadyPaid => Ok(WebhookOutcome::AlreadyPaid {
                order_id: order_id.to_string(),
            }),
            MarkPaidOutcome::NotFound => Err(OrderError::not_found(order_id)),
        }
    }

    /// Best-effort receipt delivery. Failures never fail the webhook.
    async fn send_receipt(&self, order_id: &OrderId) {
        let order = match self.orders.find_by_id(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                warn!(order_id = %order_id, "order vanished before receipt could be sent");
                return;
            }
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "failed to load order for receipt");
                return;
            }
        };

        if let Err(e) = self.receipts.send_payment_receipt(&order).await {
            warn!(order_id = %order_id, error = %e, "receipt delivery failed");
        }
    }
}
