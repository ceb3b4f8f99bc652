//! # Domain Types
//!
//! Line item and product input types.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐                     ┌─────────────────┐           │
//! │  │  ProductInput   │  add_to_cart(...)   │    LineItem     │           │
//! │  │  ─────────────  │ ──────────────────► │  ─────────────  │           │
//! │  │  id             │   quantity = 1 on   │  id             │           │
//! │  │  title          │   first add, +1 on  │  title          │           │
//! │  │  image_url      │   every later add   │  image_url      │           │
//! │  │  price          │                     │  price          │           │
//! │  └─────────────────┘                     │  quantity ≥ 1   │           │
//! │                                          └─────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` freezes `title`, `image_url` and `price` the first time its
//! product is added. Later adds of the same id only move `quantity`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Input
// =============================================================================

/// A product descriptor handed to `add_to_cart`.
///
/// There is no quantity field: quantity is always derived by the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    /// Catalog identifier. The cart's sole identity key.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Product image shown in the cart row.
    pub image_url: String,

    /// Unit price.
    pub price: Money,
}

impl ProductInput {
    /// Creates a product descriptor.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Money,
    ) -> Self {
        ProductInput {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of the cart.
///
/// ## Invariants
/// - `quantity >= 1` while the line exists
/// - `title`, `image_url`, `price` never change after the line is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Product id (unique within a cart).
    pub id: String,

    /// Title at time of first add (frozen).
    pub title: String,

    /// Image URL at time of first add (frozen).
    pub image_url: String,

    /// Unit price at time of first add (frozen).
    pub price: Money,

    /// Units of this product in the cart.
    pub quantity: u32,
}

impl LineItem {
    /// Creates a fresh line for a product that was not in the cart.
    pub fn from_product(product: &ProductInput) -> Self {
        LineItem {
            id: product.id.clone(),
            title: product.title.clone(),
            image_url: product.image_url.clone(),
            price: product.price,
            quantity: 1,
        }
    }

    /// Returns a copy of this line with a different quantity.
    ///
    /// Every other field is carried over untouched.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        LineItem {
            quantity,
            ..self.clone()
        }
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> ProductInput {
        ProductInput::new(
            "1",
            "Camiseta Ai Sim",
            "https://cdn.example.com/camiseta.png",
            Money::from_cents(5990),
        )
    }

    #[test]
    fn test_from_product_starts_at_one() {
        let line = LineItem::from_product(&sample_product());
        assert_eq!(line.id, "1");
        assert_eq!(line.title, "Camiseta Ai Sim");
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_with_quantity_keeps_descriptive_fields() {
        let line = LineItem::from_product(&sample_product());
        let bumped = line.with_quantity(4);

        assert_eq!(bumped.quantity, 4);
        assert_eq!(bumped.price, line.price);
        assert_eq!(bumped.image_url, line.image_url);
        assert_eq!(line.quantity, 1); // original untouched
    }

    #[test]
    fn test_line_total() {
        let line = LineItem::from_product(&sample_product()).with_quantity(3);
        assert_eq!(line.line_total().cents(), 17970);
    }

    #[test]
    fn test_line_item_json_shape() {
        let line = LineItem::from_product(&sample_product());
        let value = serde_json::to_value(&line).unwrap();

        assert_eq!(value["id"], "1");
        assert_eq!(value["image_url"], "https://cdn.example.com/camiseta.png");
        assert_eq!(value["price"], 59.9);
        assert_eq!(value["quantity"], 1);
    }
}
