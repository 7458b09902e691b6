//! Foundation types shared across the domain layer.
//!
//! Strongly-typed identifiers, timestamps, and the base error types used
//! by every aggregate and port.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{OrderId, ProductId, UserId};
pub use timestamp::Timestamp;
