//! Stripe adapter implementing the PaymentGateway port.

mod stripe_gateway;

pub use stripe_gateway::{convert_event, StripeConfig, StripeGateway};
