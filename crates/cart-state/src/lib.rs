//! # cart-state: Cart State Manager for Marketcart
//!
//! The live shopping cart: hydrated once from durable storage, mutated
//! through three operations, observed by any number of subscribers, and
//! mirrored back to storage in the background.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Marketcart Cart State                             │
//! │                                                                         │
//! │  UI / CLI                                                              │
//! │    │ add_to_cart(product) / increment(id) / decrement(id)              │
//! │    ▼                                                                    │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  CartManager                                                     │  │
//! │  │    watch::Sender<Arc<Cart>>  ── subscribe() ──► watch::Receiver  │  │
//! │  │          │                                                       │  │
//! │  │          │ Arc<Cart> per mutation (ordered)                      │  │
//! │  │          ▼                                                       │  │
//! │  │    PersistWorker ── encode ──► KeyValueStore::set(store_key, ..) │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Startup:  hydrate() ◄── KeyValueStore::get(store_key) ◄── decode      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`manager`] - `CartManager`, the single owner of cart state
//! - [`persist`] - Background worker that writes snapshots in order
//! - [`config`] - TOML + environment configuration, store construction
//! - [`error`] - Cart state error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cart_state::{CartConfig, CartManager};
//!
//! let config = CartConfig::load_or_default(None);
//! let manager = CartManager::from_config(&config).await?;
//! manager.hydrate().await;
//!
//! manager.add_to_cart(&product)?;
//! let totals = manager.totals()?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod manager;
pub mod persist;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{CartConfig, StoreBackend};
pub use error::{CartError, CartResult};
pub use manager::CartManager;
pub use persist::PersistStatus;
