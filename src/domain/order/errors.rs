//! Order-specific error types.
//!
//! Errors related to checkout, payment confirmation, and order queries.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | EmptyProductList | 400 |
//! | MissingPriceId | 400 |
//! | NotFound | 404 |
//! | MissingMetadata | 400 |
//! | InvalidWebhookSignature | 401 |
//! | PaymentFailed | 402 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, ProductId};

/// Order-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Checkout requested with no product ids.
    EmptyProductList,

    /// A product cannot be sold because it has no provider price id.
    MissingPriceId(ProductId),

    /// Order was not found.
    NotFound(OrderId),

    /// A required metadata field was absent from a webhook event.
    MissingMetadata(&'static str),

    /// Webhook signature verification failed.
    InvalidWebhookSignature,

    /// Payment processing failed.
    PaymentFailed { reason: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl OrderError {
    pub fn empty_product_list() -> Self {
        OrderError::EmptyProductList
    }

    pub fn missing_price_id(product_id: ProductId) -> Self {
        OrderError::MissingPriceId(product_id)
    }

    pub fn not_found(id: OrderId) -> Self {
        OrderError::NotFound(id)
    }

    pub fn missing_metadata(field: &'static str) -> Self {
        OrderError::MissingMetadata(field)
    }

    pub fn invalid_webhook_signature() -> Self {
        OrderError::InvalidWebhookSignature
    }

    pub fn payment_failed(reason: impl Into<String>) -> Self {
        OrderError::PaymentFailed {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        OrderError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        OrderError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::EmptyProductList => ErrorCode::InvalidRequest,
            OrderError::MissingPriceId(_) => ErrorCode::InvalidRequest,
            OrderError::NotFound(_) => ErrorCode::OrderNotFound,
            OrderError::MissingMetadata(_) => ErrorCode::InvalidRequest,
            OrderError::InvalidWebhookSignature => ErrorCode::InvalidWebhookSignature,
            OrderError::PaymentFailed { .. } => ErrorCode::PaymentRequired,
            OrderError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            OrderError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            OrderError::EmptyProductList => "No products specified".to_string(),
            OrderError::MissingPriceId(product_id) => {
                format!("Product {} is not available for purchase", product_id)
            }
            OrderError::NotFound(id) => format!("Order not found: {}", id),
            OrderError::MissingMetadata(field) => {
                format!("Webhook event is missing required metadata: {}", field)
            }
            OrderError::InvalidWebhookSignature => "Invalid webhook signature".to_string(),
            OrderError::PaymentFailed { reason } => format!("Payment failed: {}", reason),
            OrderError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            OrderError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrderError::Infrastructure(_) | OrderError::PaymentFailed { .. }
        )
    }
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for OrderError {}

impl From<DomainError> for OrderError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::PaymentRequired => OrderError::PaymentFailed {
                reason: err.to_string(),
            },
            ErrorCode::InvalidWebhookSignature => OrderError::InvalidWebhookSignature,
            ErrorCode::ValidationFailed => OrderError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => OrderError::Infrastructure(err.to_string()),
        }
    }
}

impl From<OrderError> for DomainError {
    fn from(err: OrderError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
