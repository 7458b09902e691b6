//! Order repository port for persistence.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::order::Order;

/// Outcome of a conditional mark-paid write.
///
/// Distinguishes the first confirmation from duplicate deliveries so the
/// webhook handler can skip side effects it has already performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkPaidOutcome {
    /// The paid flag flipped false -> true in this call.
    Marked,
    /// The order was already paid; nothing changed.
    AlreadyPaid,
    /// No order exists with this id.
    NotFound,
}

/// Port for order persistence.
///
/// Implementations must guarantee that `mark_paid_if_unpaid` is atomic:
/// concurrent calls for the same order must yield exactly one `Marked`.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order.
    async fn create(&self, order: &Order) -> Result<(), DomainError>;

    /// Find an order by id.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// Conditionally flip the paid flag.
    ///
    /// Sets `is_paid = true` only if it is currently false, in a single
    /// atomic statement.
    async fn mark_paid_if_unpaid(&self, id: &OrderId) -> Result<MarkPaidOutcome, DomainError>;
}
