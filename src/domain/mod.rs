//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `order` - Order aggregate, checkout line items, webhook verification

pub mod foundation;
pub mod order;
