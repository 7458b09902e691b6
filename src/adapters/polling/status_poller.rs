//! OrderStatusPoller - background task that watches an order until it is paid.
//!
//! Drives the post-checkout reconciliation loop:
//! 1. Buyer lands on the thank-you page with an order id
//! 2. **Poller re-queries order status every second** ← This module
//! 3. Page flips from "processing" to "confirmed" when payment lands
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 1000ms | How often to re-query order status |
//!
//! ## Cancellation
//!
//! The loop listens on a watch channel and stops as soon as cancellation
//! is signalled, e.g. when the buyer navigates away. Transient query
//! errors are logged and the loop keeps going; the next tick retries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::OrderId;
use crate::ports::OrderStatusSource;

/// Configuration for the status poller.
#[derive(Debug, Clone)]
pub struct StatusPollerConfig {
    /// How often to re-query order status.
    pub poll_interval: Duration,
}

impl Default for StatusPollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
        }
    }
}

impl StatusPollerConfig {
    /// Create config with custom poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// How a polling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The order was observed as paid.
    Paid,

    /// Cancellation was signalled before payment was observed.
    Cancelled,
}

/// Polls an order's paid status until it flips or the caller cancels.
pub struct OrderStatusPoller {
    source: Arc<dyn OrderStatusSource>,
    config: StatusPollerConfig,
}

impl OrderStatusPoller {
    /// Create a poller with the default one-second interval.
    pub fn new(source: Arc<dyn OrderStatusSource>) -> Self {
        Self {
            source,
            config: StatusPollerConfig::default(),
        }
    }

    /// Create a poller with custom configuration.
    pub fn with_config(source: Arc<dyn OrderStatusSource>, config: StatusPollerConfig) -> Self {
        Self { source, config }
    }

    /// Run the polling loop until the order is paid or cancellation is
    /// signalled.
    ///
    /// The first query happens immediately; subsequent queries follow the
    /// configured interval. Query errors are logged and retried on the next
    /// tick rather than ending the loop, since webhook delivery and the
    /// status endpoint can lag independently.
    pub async fn run(
        &self,
        order_id: OrderId,
        mut cancel: watch::Receiver<bool>,
    ) -> PollOutcome {
        let mut interval = time::interval(self.config.poll_interval);

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::debug!(order_id = %order_id, "Status polling cancelled");
                        return PollOutcome::Cancelled;
                    }
                }

                _ = interval.tick() => {
                    match self.source.is_paid(&order_id).await {
                        Ok(true) => {
                            tracing::info!(order_id = %order_id, "Order confirmed paid");
                            return PollOutcome::Paid;
                        }
                        Ok(false) => {}
                        Err(e) => {
                            tracing::warn!(order_id = %order_id, error = %e, "Status query failed, will retry");
                        }
                    }
                }
            }
        }
    }

    /// Spawn the polling loop as a background task.
    ///
    /// Returns the join handle; drop the sender side of `cancel` or send
    /// `true` to stop the task.
    pub fn spawn(
        self: Arc<Self>,
        order_id: OrderId,
        cancel: watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<PollOutcome> {
        tokio::spawn(async move { self.run(order_id, cancel).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Status source that reports unpaid for a fixed number of queries,
    /// then paid.
    struct ScriptedStatusSource {
        unpaid_responses: usize,
        queries: AtomicUsize,
    }

    impl ScriptedStatusSource {
        fn paid_after(unpaid_responses: usize) -> Self {
            Self {
                unpaid_responses,
                queries: AtomicUsize::new(0),
            }
        }

        fn query_count(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl OrderStatusSource for ScriptedStatusSource {
        async fn is_paid(&self, _id: &OrderId) -> Result<bool, DomainError> {
            let n = self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(n >= self.unpaid_responses)
        }
    }

    /// Status source that always fails.
    struct FailingStatusSource {
        queries: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl OrderStatusSource for FailingStatusSource {
        async fn is_paid(&self, _id: &OrderId) -> Result<bool, DomainError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::new(ErrorCode::DatabaseError, "unavailable"))
        }
    }

    fn fast_config() -> StatusPollerConfig {
        StatusPollerConfig::default().with_poll_interval(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn returns_paid_once_status_flips() {
        let source = Arc::new(ScriptedStatusSource::paid_after(3));
        let poller = OrderStatusPoller::with_config(source.clone(), fast_config());
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let outcome = poller.run(OrderId::new(), cancel_rx).await;

        assert_eq!(outcome, PollOutcome::Paid);
        // Three unpaid responses plus the paid one.
        assert_eq!(source.query_count(), 4);
    }

    #[tokio::test]
    async fn first_query_is_immediate() {
        let source = Arc::new(ScriptedStatusSource::paid_after(0));
        let config =
            StatusPollerConfig::default().with_poll_interval(Duration::from_secs(3600));
        let poller = OrderStatusPoller::with_config(source, config);
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let outcome = tokio::time::timeout(
            Duration::from_millis(100),
            poller.run(OrderId::new(), cancel_rx),
        )
        .await
        .expect("first tick should fire immediately");

        assert_eq!(outcome, PollOutcome::Paid);
    }

    #[tokio::test]
    async fn cancellation_stops_the_loop() {
        let source = Arc::new(ScriptedStatusSource::paid_after(usize::MAX));
        let poller = Arc::new(OrderStatusPoller::with_config(source, fast_config()));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let handle = poller.spawn(OrderId::new(), cancel_rx);

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel_tx.send(true).unwrap();

        let outcome = handle.await.unwrap();
        assert_eq!(outcome, PollOutcome::Cancelled);
    }

    #[tokio::test]
    async fn query_errors_are_retried_not_fatal() {
        let source = Arc::new(FailingStatusSource {
            queries: AtomicUsize::new(0),
        });
        let poller = OrderStatusPoller::with_config(source.clone(), fast_config());
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let handle = tokio::spawn({
            let order_id = OrderId::new();
            async move { poller.run(order_id, cancel_rx).await }
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        cancel_tx.send(true).unwrap();

        let outcome = handle.await.unwrap();
        assert_eq!(outcome, PollOutcome::Cancelled);
        assert!(source.queries.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn default_interval_is_one_second() {
        let config = StatusPollerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(1000));
    }
}
