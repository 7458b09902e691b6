//! Checkout line item construction.
//!
//! A checkout session charges one line item per purchasable product plus a
//! single flat transaction fee. Quantities are always 1: digital assets are
//! sold per-copy and the fee applies once per order.

use serde::{Deserialize, Serialize};

/// One line of a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Provider price identifier to charge.
    pub price: String,
    /// Units to charge. Always 1 for digital assets and the fee.
    pub quantity: u32,
    /// Whether the buyer may adjust the quantity on the hosted page.
    pub adjustable: bool,
}

impl LineItem {
    /// Line item for a single product.
    pub fn product(price_id: impl Into<String>) -> Self {
        Self {
            price: price_id.into(),
            quantity: 1,
            adjustable: false,
        }
    }

    /// Line item for the flat per-order transaction fee.
    pub fn fee(price_id: impl Into<String>) -> Self {
        Self {
            price: price_id.into(),
            quantity: 1,
            adjustable: false,
        }
    }
}

/// Builds the line items for a checkout session.
///
/// Produces one item per product price id, in input order, followed by the
/// flat transaction fee as the final item. N products yield N+1 items.
pub fn build_line_items(price_ids: &[String], fee_price_id: &str) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = price_ids
        .iter()
        .map(|price_id| LineItem::product(price_id.clone()))
        .collect();
    items.push(LineItem::fee(fee_price_id));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FEE_PRICE: &str = "price_fee_test";

    #[test]
    fn builds_one_item_per_product_plus_fee() {
        let price_ids = vec!["price_a".to_string(), "price_b".to_string()];

        let items = build_line_items(&price_ids, FEE_PRICE);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].price, "price_a");
        assert_eq!(items[1].price, "price_b");
        assert_eq!(items[2].price, FEE_PRICE);
    }

    #[test]
    fn fee_only_session_when_no_products() {
        let items = build_line_items(&[], FEE_PRICE);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price, FEE_PRICE);
    }

    #[test]
    fn all_quantities_are_one() {
        let price_ids = vec!["price_a".to_string(), "price_b".to_string()];

        let items = build_line_items(&price_ids, FEE_PRICE);

        assert!(items.iter().all(|item| item.quantity == 1));
        assert!(items.iter().all(|item| !item.adjustable));
    }

    #[test]
    fn preserves_input_order() {
        let price_ids: Vec<String> = (0..5).map(|i| format!("price_{}", i)).collect();

        let items = build_line_items(&price_ids, FEE_PRICE);

        for (i, price_id) in price_ids.iter().enumerate() {
            assert_eq!(&items[i].price, price_id);
        }
    }

    proptest! {
        #[test]
        fn item_count_is_products_plus_one(count in 0usize..50) {
            let price_ids: Vec<String> =
                (0..count).map(|i| format!("price_{}", i)).collect();

            let items = build_line_items(&price_ids, FEE_PRICE);

            prop_assert_eq!(items.len(), count + 1);
            prop_assert_eq!(&items.last().unwrap().price, FEE_PRICE);
        }
    }
}
