//! Order status query port for the reconciliation poller.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};

/// Port the client-side poller queries for payment status.
///
/// Kept separate from [`crate::ports::OrderRepository`] because the poller
/// runs on the client side of the API boundary and typically queries over
/// HTTP rather than against the database.
#[async_trait]
pub trait OrderStatusSource: Send + Sync {
    /// Returns whether the order has been confirmed paid.
    async fn is_paid(&self, order_id: &OrderId) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_source_is_object_safe() {
        fn _accepts_dyn(_source: &dyn OrderStatusSource) {}
    }
}
