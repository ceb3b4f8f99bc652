//! # cart-store: Storage Layer for Marketcart
//!
//! This crate provides the durable key-value storage the cart is persisted
//! into. It knows nothing about carts; values are opaque strings.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Marketcart Data Flow                              │
//! │                                                                         │
//! │  CartManager (cart-state)                                              │
//! │       │  persist worker: set(store_key, encode(cart))                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cart-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────────┐   ┌──────────────┐  ┌──────────────┐  │   │
//! │  │   │  KeyValueStore     │   │ SqliteStore  │  │ MemoryStore  │  │   │
//! │  │   │  (store.rs)        │◄──│ (sqlite.rs)  │  │ (memory.rs)  │  │   │
//! │  │   │  get / set / remove│◄──┼──────────────┼──│              │  │   │
//! │  │   └────────────────────┘   └──────────────┘  └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/marketcart/cart.db   (kv_store table)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `KeyValueStore` trait
//! - [`sqlite`] - SQLite-backed store and its pool configuration
//! - [`memory`] - In-memory store for tests
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cart_store::{KeyValueStore, SqliteConfig, SqliteStore};
//!
//! let store = SqliteStore::open(SqliteConfig::new("path/to/cart.db")).await?;
//! store.set("@GoMarketplace:product", "[]").await?;
//! let raw = store.get("@GoMarketplace:product").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::{SqliteConfig, SqliteStore};
pub use store::KeyValueStore;
