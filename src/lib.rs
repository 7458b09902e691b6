//! Curio Market - Digital-Asset Marketplace Backend
//!
//! This crate implements the checkout and order reconciliation flow for a
//! digital-asset storefront: pending-order creation, hosted payment session
//! initiation, webhook-driven payment confirmation, and client-side status
//! polling.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
