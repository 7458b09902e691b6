//! Axum router configuration for checkout endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_checkout_session, get_order_status, handle_stripe_webhook, CheckoutAppState,
};

/// Create the checkout API router.
///
/// # Routes
///
/// ## User Endpoints (require authentication)
/// - `POST /checkout/session` - Start checkout for a cart of products
///
/// ## Public Endpoints
/// - `GET /orders/:order_id/status` - Query an order's paid status
pub fn checkout_routes() -> Router<CheckoutAppState> {
    Router::new()
        .route("/checkout/session", post(create_checkout_session))
        .route("/orders/:order_id/status", get(get_order_status))
}

/// Create the Stripe webhook router.
///
/// Separate from the main checkout routes because webhooks don't require
/// user authentication (they're verified via signature).
///
/// # Routes
/// - `POST /stripe` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<CheckoutAppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}

/// Create the complete checkout module router.
///
/// Combines checkout routes and webhook routes into a single router
/// suitable for mounting at `/api`.
pub fn checkout_router() -> Router<CheckoutAppState> {
    Router::new()
        .merge(checkout_routes())
        .nest("/webhooks", webhook_routes())
}
