//! Order aggregate entity.
//!
//! # Design Decisions
//!
//! - **Create-before-pay**: the checkout flow persists the pending Order
//!   before the payment session is requested, so the webhook can correlate
//!   by Order id.
//! - **One-way paid flag**: `is_paid` transitions only false -> true.
//! - **Immutable product set**: the filtered product list is fixed at
//!   creation and never edited afterwards.
//! - **Derived total**: monetary totals come from product prices at display
//!   time and are never stored on the Order.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrderId, ProductId, Timestamp, UserId};

/// Order aggregate - durable record of a purchase attempt.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `products` is immutable after creation
/// - `is_paid` never reverts to false once set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier for this order.
    pub id: OrderId,

    /// User who placed the order.
    pub user_id: UserId,

    /// Email of the purchaser, captured for the payment receipt.
    pub user_email: String,

    /// Products included in the order, in the order they were requested.
    ///
    /// Already filtered to purchasable products (those with a provider
    /// price identifier) by the checkout flow.
    pub products: Vec<ProductId>,

    /// Whether payment has been confirmed by the provider.
    pub is_paid: bool,

    /// When the order was created.
    pub created_at: Timestamp,

    /// When the order was last updated.
    pub updated_at: Timestamp,
}

impl Order {
    /// Create a new pending (unpaid) order.
    pub fn create_pending(
        id: OrderId,
        user_id: UserId,
        user_email: String,
        products: Vec<ProductId>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            user_email,
            products,
            is_paid: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark this order as paid.
    ///
    /// Idempotent: returns `true` if the flag flipped, `false` if the order
    /// was already paid. Never fails - duplicate webhook delivery is a no-op.
    pub fn mark_paid(&mut self) -> bool {
        if self.is_paid {
            return false;
        }
        self.is_paid = true;
        self.updated_at = Timestamp::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_order() -> Order {
        Order::create_pending(
            OrderId::new(),
            UserId::new("user-1").unwrap(),
            "buyer@example.com".to_string(),
            vec![ProductId::new("p1").unwrap(), ProductId::new("p2").unwrap()],
        )
    }

    #[test]
    fn create_pending_starts_unpaid() {
        let order = test_order();
        assert!(!order.is_paid);
        assert_eq!(order.products.len(), 2);
    }

    #[test]
    fn mark_paid_flips_flag_once() {
        let mut order = test_order();

        assert!(order.mark_paid());
        assert!(order.is_paid);
    }

    #[test]
    fn mark_paid_is_idempotent() {
        let mut order = test_order();

        assert!(order.mark_paid());
        assert!(!order.mark_paid());
        assert!(order.is_paid);
    }

    #[test]
    fn mark_paid_preserves_product_set() {
        let mut order = test_order();
        let products = order.products.clone();

        order.mark_paid();

        assert_eq!(order.products, products);
    }

    #[test]
    fn order_serializes_round_trip() {
        let order = test_order();
        let json = serde_json::to_string(&order).unwrap();
        let parsed: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, parsed);
    }
}
