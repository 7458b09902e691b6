//! Checkout and order reconciliation handlers.

mod create_checkout_session;
mod get_order_status;
mod handle_payment_webhook;
mod sync_product;

pub use create_checkout_session::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, CreateCheckoutSessionResult,
};
pub use get_order_status::{GetOrderStatusHandler, GetOrderStatusResult};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, WebhookOutcome,
};
pub use sync_product::{SyncProductCommand, SyncProductHandler, SyncProductResult};
