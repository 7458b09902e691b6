//! Client-side payment reconciliation.
//!
//! After a buyer returns from hosted checkout, the order may not be paid
//! yet: the webhook that flips the flag races the redirect. The poller
//! re-queries order status on a fixed cadence until payment lands or the
//! caller cancels.

mod http_status_source;
mod status_poller;

pub use http_status_source::HttpOrderStatusSource;
pub use status_poller::{OrderStatusPoller, PollOutcome, StatusPollerConfig};
