//! HTTP handlers for checkout endpoints.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::checkout::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, GetOrderStatusHandler,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
};
use crate::domain::foundation::{OrderId, ProductId, UserId};
use crate::domain::order::OrderError;
use crate::ports::{OrderRepository, PaymentGateway, ProductReader, ReceiptSender};

use super::dto::{
    CheckoutSessionResponse, CreateCheckoutRequest, ErrorResponse, OrderStatusResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; dependencies are Arc-wrapped for cheap sharing.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub order_repository: Arc<dyn OrderRepository>,
    pub product_reader: Arc<dyn ProductReader>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub receipt_sender: Arc<dyn ReceiptSender>,
    pub fee_price_id: String,
    pub public_url: String,
}

impl CheckoutAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.order_repository.clone(),
            self.product_reader.clone(),
            self.payment_gateway.clone(),
            self.fee_price_id.clone(),
            self.public_url.clone(),
        )
    }

    pub fn order_status_handler(&self) -> GetOrderStatusHandler {
        GetOrderStatusHandler::new(self.order_repository.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.order_repository.clone(),
            self.payment_gateway.clone(),
            self.receipt_sender.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from request.
///
/// In production, this would be extracted from JWT/session by auth
/// middleware. For now, uses header-based extraction for development and
/// testing.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| UserId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            let email = parts
                .headers
                .get("X-User-Email")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedUser { user_id, email })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/checkout/session - Start checkout for a cart of products
pub async fn create_checkout_session(
    State(state): State<CheckoutAppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let product_ids = request
        .product_ids
        .into_iter()
        .map(|id| {
            ProductId::new(id).map_err(|e| OrderError::validation("productIds", e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let handler = state.create_checkout_handler();
    let cmd = CreateCheckoutSessionCommand {
        user_id: user.user_id,
        user_email: user.email,
        product_ids,
    };

    let result = handler.handle(cmd).await?;

    let response = CheckoutSessionResponse {
        order_id: result.order.id.to_string(),
        url: result.url,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/webhooks/stripe - Handle Stripe webhook events
pub async fn handle_stripe_webhook(
    State(state): State<CheckoutAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            OrderError::validation("Stripe-Signature", "Missing Stripe-Signature header")
        })?;

    let handler = state.webhook_handler();
    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    handler.handle(cmd).await?;

    Ok(StatusCode::OK)
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/orders/:order_id/status - Query an order's paid status
pub async fn get_order_status(
    State(state): State<CheckoutAppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let order_id = OrderId::from_str(&order_id)
        .map_err(|_| OrderError::validation("orderId", "Invalid order id"))?;

    let handler = state.order_status_handler();
    let result = handler.handle(order_id).await?;

    let response = OrderStatusResponse {
        order_id: result.order_id.to_string(),
        is_paid: result.is_paid,
    };

    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct CheckoutApiError(OrderError);

impl From<OrderError> for CheckoutApiError {
    fn from(err: OrderError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for CheckoutApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(OrderError::infrastructure(err.to_string()))
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            OrderError::EmptyProductList
            | OrderError::MissingPriceId(_)
            | OrderError::MissingMetadata(_)
            | OrderError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            OrderError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderError::InvalidWebhookSignature => StatusCode::UNAUTHORIZED,
            OrderError::PaymentFailed { .. } => StatusCode::PAYMENT_REQUIRED,
            OrderError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse::new(self.0.code().to_string(), self.0.message());
        (status, Json(body)).into_response()
    }
}
