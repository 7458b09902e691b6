//! Command and query handlers.

pub mod checkout;

pub use checkout::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, CreateCheckoutSessionResult,
    GetOrderStatusHandler, GetOrderStatusResult,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, WebhookOutcome,
    SyncProductCommand, SyncProductHandler, SyncProductResult,
};
