//! GetOrderStatusHandler - Query handler for payment status polling.

use std::sync::Arc;

use crate::domain::foundation::OrderId;
use crate::domain::order::OrderError;
use crate::ports::OrderRepository;

/// Payment status of a single order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOrderStatusResult {
    pub order_id: OrderId,
    pub is_paid: bool,
}

/// Query handler behind the reconciliation poller.
///
/// Deliberately thin: a read of the paid flag, nothing else, because the
/// client polls it once a second until payment confirms.
pub struct GetOrderStatusHandler {
    orders: Arc<dyn OrderRepository>,
}

impl GetOrderStatusHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn handle(&self, order_id: OrderId) -> Result<GetOrderStatusResult, OrderError> {
        let order = self
            .orders
            .find_by_id(&order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        Ok(GetOrderStatusResult {
            order_id: order.id,
            is_paid: order.is_paid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, ProductId, UserId};
    use crate::domain::order::Order;
    use crate::ports::MarkPaidOutcome;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockOrderRepository {
        orders: Mutex<Vec<Order>>,
    }

    impl MockOrderRepository {
        fn with_order(order: Order) -> Self {
            Self {
                orders: Mutex::new(vec![order]),
            }
        }

        fn empty() -> Self {
            Self {
                orders: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl OrderRepository for MockOrderRepository {
        async fn create(&self, order: &Order) -> Result<(), DomainError> {
            self.orders.lock().unwrap().push(order.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
            let orders = self.orders.lock().unwrap();
            Ok(orders.iter().find(|o| &o.id == id).cloned())
        }

        async fn mark_paid_if_unpaid(
            &self,
            _id: &OrderId,
        ) -> Result<MarkPaidOutcome, DomainError> {
            Ok(MarkPaidOutcome::NotFound)
        }
    }

    fn order(paid: bool) -> Order {
        let mut order = Order::create_pending(
            OrderId::new(),
            UserId::new("user-1").unwrap(),
            "buyer@example.com".to_string(),
            vec![ProductId::new("p1").unwrap()],
        );
        if paid {
            order.mark_paid();
        }
        order
    }

    #[tokio::test]
    async fn reports_pending_order_as_unpaid() {
        let order = order(false);
        let order_id = order.id;
        let handler = GetOrderStatusHandler::new(Arc::new(MockOrderRepository::with_order(order)));

        let result = handler.handle(order_id).await.unwrap();

        assert_eq!(result.order_id, order_id);
        assert!(!result.is_paid);
    }

    #[tokio::test]
    async fn reports_confirmed_order_as_paid() {
        let order = order(true);
        let order_id = order.id;
        let handler = GetOrderStatusHandler::new(Arc::new(MockOrderRepository::with_order(order)));

        let result = handler.handle(order_id).await.unwrap();

        assert!(result.is_paid);
    }

    #[tokio::test]
    async fn fails_for_unknown_order() {
        let handler = GetOrderStatusHandler::new(Arc::new(MockOrderRepository::empty()));

        let result = handler.handle(OrderId::new()).await;

        assert!(matches!(result, Err(OrderError::NotFound(_))));
    }
}
