//! # Snapshot Codec
//!
//! Text encoding of a [`Cart`] for the key-value store.
//!
//! ## Wire Format
//! ```text
//! [
//!   { "id": "1", "title": "Camiseta", "image_url": "https://...", "price": 59.9,  "quantity": 2 },
//!   { "id": "4", "title": "Caneca",   "image_url": "https://...", "price": 19.9,  "quantity": 1 }
//! ]
//! ```
//!
//! A plain JSON array, in cart order. Prices are JSON numbers in major units,
//! integer or fractional, exactly as the storefront writes them. Every price
//! `Money` can hold maps to one number and back, so decode(encode(cart)) ==
//! cart holds exactly.

use crate::cart::Cart;
use crate::error::CoreResult;
use crate::types::LineItem;

/// Encodes a cart as a JSON array.
pub fn encode(cart: &Cart) -> CoreResult<String> {
    Ok(serde_json::to_string(cart)?)
}

/// Decodes a JSON array into a cart.
///
/// ## Errors
/// - `CoreError::Codec` if the text is not an array of line items
/// - `CoreError::Validation` if the lines break a cart invariant
///   (zero quantity, repeated id)
pub fn decode(text: &str) -> CoreResult<Cart> {
    let items: Vec<LineItem> = serde_json::from_str(text)?;
    Ok(Cart::from_items(items)?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;
    use crate::types::ProductInput;
    use proptest::prelude::*;

    fn product(id: &str, cents: i64) -> ProductInput {
        ProductInput::new(id, format!("T{}", id), format!("U{}", id), Money::from_cents(cents))
    }

    #[test]
    fn test_empty_cart_is_empty_array() {
        assert_eq!(encode(&Cart::new()).unwrap(), "[]");
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_encode_field_names() {
        let cart = Cart::new().add(&ProductInput::new("A", "T", "U", Money::from_cents(1000)));
        assert_eq!(
            encode(&cart).unwrap(),
            r#"[{"id":"A","title":"T","image_url":"U","price":10,"quantity":1}]"#
        );
    }

    #[test]
    fn test_decode_storefront_snapshot() {
        let text = r#"[
            {"id":"1","title":"Camiseta","image_url":"https://img/1.png","price":59.9,"quantity":2},
            {"id":"2","title":"Caneca","image_url":"https://img/2.png","price":10,"quantity":1}
        ]"#;

        let cart = decode(text).unwrap();
        assert_eq!(cart.get("1").unwrap().price, Money::from_cents(5990));
        assert_eq!(cart.get("2").unwrap().price, Money::from_cents(1000));
        assert_eq!(cart.subtotal(), Money::from_cents(12980));

        assert_eq!(
            encode(&cart).unwrap(),
            r#"[{"id":"1","title":"Camiseta","image_url":"https://img/1.png","price":59.9,"quantity":2},{"id":"2","title":"Caneca","image_url":"https://img/2.png","price":10,"quantity":1}]"#
        );
    }

    #[test]
    fn test_decode_preserves_order() {
        let text = r#"[
            {"id":"b","title":"B","image_url":"","price":200,"quantity":3},
            {"id":"a","title":"A","image_url":"","price":100,"quantity":1}
        ]"#;

        let cart = decode(text).unwrap();
        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(cart.get("b").unwrap().quantity, 3);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("not json"), Err(CoreError::Codec(_))));
        assert!(matches!(decode(r#"{"id":"a"}"#), Err(CoreError::Codec(_))));
        assert!(matches!(
            decode(r#"[{"id":"a","title":"","image_url":"","price":1}]"#),
            Err(CoreError::Codec(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invariant_violations() {
        let zero = r#"[{"id":"a","title":"","image_url":"","price":1,"quantity":0}]"#;
        assert!(matches!(decode(zero), Err(CoreError::Validation(_))));

        let dup = r#"[
            {"id":"a","title":"","image_url":"","price":1,"quantity":1},
            {"id":"a","title":"","image_url":"","price":1,"quantity":2}
        ]"#;
        assert!(matches!(decode(dup), Err(CoreError::Validation(_))));
    }

    proptest! {
        #[test]
        fn prop_round_trip(ops in prop::collection::vec((0u8..3, 0u8..6, -5000i64..5000), 0..48)) {
            let mut cart = Cart::new();
            for (kind, n, cents) in ops {
                let id = n.to_string();
                cart = match kind {
                    0 => cart.add(&product(&id, cents)),
                    1 => cart.increment(&id).unwrap_or_else(|| cart.clone()),
                    _ => cart.decrement(&id).unwrap_or_else(|| cart.clone()),
                };
            }

            let text = encode(&cart).unwrap();
            prop_assert_eq!(decode(&text).unwrap(), cart);
        }
    }
}
