//! Product catalog read port.
//!
//! The checkout flow only needs to look products up, never write them, so
//! this port exposes a read-only view of the catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ProductId};

/// Catalog product as seen by the checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Price in minor currency units (pence).
    pub price_cents: i64,

    /// Provider price id. Absent until the catalog sync has run; a
    /// product without one cannot be charged and is filtered out.
    pub price_id: Option<String>,

    /// Provider product id, set by the catalog sync.
    pub stripe_id: Option<String>,

    /// Whether the product has passed review and may be sold.
    pub approved_for_sale: bool,
}

impl Product {
    /// Returns true if this product can appear on a checkout session.
    pub fn is_purchasable(&self) -> bool {
        self.approved_for_sale && self.price_id.is_some()
    }
}

/// Port for reading the product catalog.
#[async_trait]
pub trait ProductReader: Send + Sync {
    /// Fetch the products matching the given ids.
    ///
    /// Unknown ids are simply absent from the result; the caller decides
    /// whether that is an error.
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced_product() -> Product {
        Product {
            id: ProductId::new("prod-1").unwrap(),
            name: "Icon Pack".to_string(),
            price_cents: 1500,
            price_id: Some("price_abc".to_string()),
            stripe_id: Some("prod_stripe_abc".to_string()),
            approved_for_sale: true,
        }
    }

    #[test]
    fn product_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn ProductReader) {}
    }

    #[test]
    fn priced_approved_product_is_purchasable() {
        assert!(priced_product().is_purchasable());
    }

    #[test]
    fn unpriced_product_is_not_purchasable() {
        let mut product = priced_product();
        product.price_id = None;
        assert!(!product.is_purchasable());
    }

    #[test]
    fn unapproved_product_is_not_purchasable() {
        let mut product = priced_product();
        product.approved_for_sale = false;
        assert!(!product.is_purchasable());
    }
}
