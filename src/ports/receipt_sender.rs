//! Receipt notification port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::order::Order;

/// Port for sending payment receipts.
///
/// Delivery is best-effort: the webhook handler logs failures and still
/// acknowledges the event, so implementations must not assume a retry.
#[async_trait]
pub trait ReceiptSender: Send + Sync {
    /// Send a payment receipt for a freshly confirmed order.
    async fn send_payment_receipt(&self, order: &Order) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_sender_is_object_safe() {
        fn _accepts_dyn(_sender: &dyn ReceiptSender) {}
    }
}
