//! HTTP adapter for checkout and order endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{CheckoutApiError, CheckoutAppState};
pub use routes::checkout_router;
