//! # Cart
//!
//! The immutable cart value and its three transitions.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions (per line)                          │
//! │                                                                         │
//! │   Operation        Line absent             Line present (qty = n)       │
//! │   ─────────        ───────────             ──────────────────────       │
//! │                                                                         │
//! │   add(product)     append, qty = 1         qty = n + 1                  │
//! │                                                                         │
//! │   increment(id)    None (no-op)            qty = n + 1                  │
//! │                                                                         │
//! │   decrement(id)    None (no-op)            n > 1: qty = n - 1           │
//! │                                            n = 1: line removed          │
//! │                                                                         │
//! │   Every transition returns a NEW Cart. The receiver is never touched,   │
//! │   so a snapshot already handed to a subscriber stays valid.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{LineItem, ProductInput};
use crate::validation::{validate_line_items, ValidationResult};

// =============================================================================
// Cart
// =============================================================================

/// An ordered, id-unique sequence of line items.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same product increases quantity)
/// - Every quantity is ≥ 1 (reaching zero removes the line)
/// - Insertion order is preserved by every non-removing transition
///
/// Serializes as a bare JSON array of line items. There is deliberately no
/// `Deserialize` impl: decoding goes through [`Cart::from_items`] so the
/// invariants are checked.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from already-existing lines, checking the invariants.
    pub fn from_items(items: Vec<LineItem>) -> ValidationResult<Self> {
        validate_line_items(&items)?;
        Ok(Cart { items })
    }

    /// Returns the lines in cart order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up a line by product id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Checks whether a product is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Calculates the subtotal (sum of line totals).
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Summarises the cart for display.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product already in cart: its quantity goes up by one. The incoming
    ///   title, image and price are ignored; the line keeps the values it was
    ///   created with.
    /// - Product not in cart: appended at the end with quantity 1.
    pub fn add(&self, product: &ProductInput) -> Cart {
        if self.contains(&product.id) {
            return self.map_line(&product.id, |line| {
                line.with_quantity(line.quantity.saturating_add(1))
            });
        }

        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(LineItem::from_product(product));
        Cart { items }
    }

    /// Adds one unit to an existing line.
    ///
    /// Returns `None` when `id` is not in the cart; unlike [`Cart::add`],
    /// a miss never creates a line.
    pub fn increment(&self, id: &str) -> Option<Cart> {
        if !self.contains(id) {
            return None;
        }

        Some(self.map_line(id, |line| {
            line.with_quantity(line.quantity.saturating_add(1))
        }))
    }

    /// Removes one unit from an existing line.
    ///
    /// Returns `None` when `id` is not in the cart. A line at quantity 1 is
    /// dropped instead of being kept at zero.
    pub fn decrement(&self, id: &str) -> Option<Cart> {
        let line = self.get(id)?;

        if line.quantity <= 1 {
            let items = self
                .items
                .iter()
                .filter(|i| i.id != id)
                .cloned()
                .collect();
            return Some(Cart { items });
        }

        Some(self.map_line(id, |line| line.with_quantity(line.quantity - 1)))
    }

    /// Rebuilds the cart with `f` applied to the line matching `id`.
    fn map_line<F>(&self, id: &str, f: F) -> Cart
    where
        F: Fn(&LineItem) -> LineItem,
    {
        let items = self
            .items
            .iter()
            .map(|i| if i.id == id { f(i) } else { i.clone() })
            .collect();
        Cart { items }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart summary for the UI footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    /// Distinct products in the cart.
    pub line_count: u32,

    /// Sum of all quantities.
    #[ts(type = "number")]
    pub total_quantity: u64,

    /// Sum of unit price × quantity over every line.
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: u32::try_from(cart.len()).unwrap_or(u32::MAX),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
