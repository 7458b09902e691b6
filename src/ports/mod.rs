//! Ports (interfaces) for external dependencies.
//!
//! Following hexagonal architecture, these traits define contracts that
//! adapters must implement. The application layer depends only on these
//! abstractions, never on concrete adapters.

pub mod order_repository;
pub mod order_status_source;
pub mod payment_gateway;
pub mod product_reader;
pub mod receipt_sender;

pub use order_repository::{MarkPaidOutcome, OrderRepository};
pub use order_status_source::OrderStatusSource;
pub use payment_gateway::{
    CheckoutSession, CreateCheckoutRequest, GatewayError, GatewayErrorCode, GatewayProduct,
    PaymentGateway, ProductDefinition, WebhookEvent, WebhookEventData, WebhookEventType,
};
pub use product_reader::{Product, ProductReader};
pub use receipt_sender::ReceiptSender;
