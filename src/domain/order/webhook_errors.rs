//! Webhook verification error types.
//!
//! Covers the failure modes of signature-header parsing and HMAC
//! verification. Downstream handling (metadata lookup, persistence)
//! reports through `OrderError` instead.

use thiserror::Error;

/// Errors raised while verifying a Stripe webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_signature_displays_correctly() {
        let err = WebhookError::InvalidSignature;
        assert_eq!(format!("{}", err), "Invalid signature");
    }

    #[test]
    fn timestamp_out_of_range_displays_correctly() {
        let err = WebhookError::TimestampOutOfRange;
        assert_eq!(format!("{}", err), "Timestamp out of range");
    }

    #[test]
    fn parse_error_displays_message() {
        let err = WebhookError::ParseError("invalid JSON".to_string());
        assert_eq!(format!("{}", err), "Parse error: invalid JSON");
    }
}
