//! # cart-core: Pure Cart Logic for Marketcart
//!
//! This crate is the **heart** of the cart. It holds every state transition
//! as a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Marketcart Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI (external collaborator)                   │   │
//! │  │    Catalog ──► "Add" button ──► Cart screen (+ / − buttons)     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ subscribe / add / increment / ...      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               cart-state (CartManager)                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cart-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   codec   │  │   │
//! │  │   │ LineItem  │  │   Money   │  │   Cart    │  │  encode   │  │   │
//! │  │   │ Product-  │  │           │  │  Totals   │  │  decode   │  │   │
//! │  │   │ Input     │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TASKS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `ProductInput`, `LineItem`
//! - [`money`] - Integer money type
//! - [`cart`] - Immutable `Cart` and its transitions
//! - [`codec`] - Snapshot text encoding
//! - [`validation`] - Rule checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cart_core::{Cart, Money, ProductInput};
//!
//! let shirt = ProductInput::new("1", "Camiseta", "https://img/1.png", Money::from_cents(5990));
//!
//! let cart = Cart::new().add(&shirt).add(&shirt);
//! assert_eq!(cart.get("1").unwrap().quantity, 2);
//!
//! let cart = cart.decrement("1").unwrap().decrement("1").unwrap();
//! assert!(cart.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod codec;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::{LineItem, ProductInput};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default key under which the cart snapshot is stored.
///
/// Namespaced so the cart can share a key-value store with other app data.
/// Callers may pick a different key through configuration (one key per
/// independent cart).
pub const DEFAULT_STORE_KEY: &str = "@GoMarketplace:product";
