//! Adapters implementing the ports for concrete infrastructure.

pub mod email;
pub mod http;
pub mod polling;
pub mod postgres;
pub mod stripe;
