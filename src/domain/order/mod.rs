//! Order domain - purchase attempts and payment reconciliation.
//!
//! An Order is the durable record of a purchase attempt. It is created
//! pending (unpaid) by the checkout flow and marked paid exactly once by
//! the payment webhook. The paid flag never reverts.

mod aggregate;
mod errors;
mod line_items;
mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use aggregate::Order;
pub use errors::OrderError;
pub use line_items::{build_line_items, LineItem};
pub use stripe_event::{StripeEvent, StripeEventData, StripeEventType};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
#[cfg(test)]
pub use webhook_verifier::compute_test_signature;
