//! # Validation Module
//!
//! Rule checks for product input and decoded snapshots.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller input (cartctl, UI bindings)                          │
//! │  └── validate_product: id, title, price sanity                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart transitions                                             │
//! │  └── quantity ≥ 1 and unique ids hold by construction                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Hydration                                                    │
//! │  └── validate_line_items: text read back from the store is untrusted   │
//! │      (hand-edited, older app version, torn write)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cart_core::money::Money;
//! use cart_core::types::ProductInput;
//! use cart_core::validation::validate_product;
//!
//! let product = ProductInput::new("1", "Caneca", "https://img/caneca.png", Money::from_cents(1990));
//! assert!(validate_product(&product).is_ok());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, ProductInput};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a product id.
const MAX_ID_LEN: usize = 128;

/// Maximum length of a product title.
const MAX_TITLE_LEN: usize = 200;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product id.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 128 characters
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a product title.
///
/// ## Example
/// ```rust
/// use cart_core::validation::validate_title;
///
/// assert!(validate_title("Camiseta Ai Sim").is_ok());
/// assert!(validate_title("").is_err());
/// ```
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.len() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a line quantity.
pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates a product descriptor before it is added to a cart.
pub fn validate_product(product: &ProductInput) -> ValidationResult<()> {
    validate_product_id(&product.id)?;
    validate_title(&product.title)?;
    validate_price(product.price)?;
    Ok(())
}

/// Validates a sequence of line items as a cart.
///
/// ## Rules
/// - Every quantity is at least 1
/// - No id appears twice
///
/// Descriptive fields are not checked here: a snapshot written by an older
/// build with an empty title is still a usable cart.
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        validate_quantity(item.quantity)?;

        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
