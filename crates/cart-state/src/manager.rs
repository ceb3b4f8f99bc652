//! # Cart Manager
//!
//! Single owner of the live cart. Every mutation goes through here.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CartManager Lifecycle                             │
//! │                                                                         │
//! │   new()          hydrate()              shutdown()                     │
//! │     │               │                       │                           │
//! │     ▼               ▼                       ▼                           │
//! │  ┌──────┐     ┌───────────┐     ┌───────┐     ┌────────┐               │
//! │  │ NEW  │────►│ HYDRATING │────►│ READY │────►│ CLOSED │               │
//! │  └──────┘     └───────────┘     └───────┘     └────────┘               │
//! │                                                                         │
//! │  NEW / HYDRATING : reads and mutations → CartError::NotHydrated        │
//! │  READY           : reads, mutations, subscribe                         │
//! │  CLOSED          : everything → CartError::Closed                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mutation Path
//! ```text
//! add_to_cart / increment / decrement
//!       │
//!       ▼
//! watch::Sender::send_if_modified   ← holds the state lock
//!       │   next = transition(current)
//!       │   None → no-op: no publish, no persist
//!       │   Some → enqueue Arc<next> on PersistWorker, publish
//!       ▼
//! subscribers wake; PersistWorker writes in the background
//! ```
//!
//! Because the persist command is queued while the state lock is held, the
//! worker sees snapshots in exactly the order they were published.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use cart_core::{codec, Cart, CartTotals, ProductInput};
use cart_store::KeyValueStore;

use crate::config::CartConfig;
use crate::error::{CartError, CartResult};
use crate::persist::{PersistHandle, PersistStatus, PersistWorker};

// =============================================================================
// Lifecycle States
// =============================================================================

const NEW: u8 = 0;
const HYDRATING: u8 = 1;
const READY: u8 = 2;
const CLOSED: u8 = 3;

// =============================================================================
// Cart Manager
// =============================================================================

/// Owns the cart, publishes snapshots, and mirrors them to the store.
///
/// ## Example
/// ```rust,ignore
/// let manager = CartManager::new("@GoMarketplace:product", store);
/// manager.hydrate().await;
///
/// manager.add_to_cart(&product)?;
/// manager.increment(&product.id)?;
///
/// let cart = manager.cart()?;
/// ```
pub struct CartManager {
    store_key: String,
    store: Arc<dyn KeyValueStore>,
    state: watch::Sender<Arc<Cart>>,
    lifecycle: AtomicU8,
    persist: PersistHandle,
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("store_key", &self.store_key)
            .field("store", &self.store)
            .field("lifecycle", &self.lifecycle.load(Ordering::SeqCst))
            .finish()
    }
}

impl CartManager {
    /// Creates a manager for `store_key` and spawns its persist worker.
    ///
    /// Must be called inside a Tokio runtime. The cart is unusable until
    /// [`hydrate`](Self::hydrate) completes.
    pub fn new(store_key: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        let store_key = store_key.into();
        let (worker, persist) = PersistWorker::new(store.clone(), store_key.clone());
        tokio::spawn(worker.run());

        let (state, _) = watch::channel(Arc::new(Cart::new()));

        CartManager {
            store_key,
            store,
            state,
            lifecycle: AtomicU8::new(NEW),
            persist,
        }
    }

    /// Opens the store described by `config` and creates a manager on it.
    pub async fn from_config(config: &CartConfig) -> CartResult<Self> {
        config.validate()?;
        let store = config.open_store().await?;
        Ok(Self::new(config.store_key(), store))
    }

    /// Returns the key the cart is persisted under.
    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    /// Loads the persisted cart and makes the manager usable.
    ///
    /// Never fails: an absent key, an unreadable store, or a snapshot that
    /// does not decode into a valid cart all leave the cart empty. The
    /// result is published to subscribers. Calls after the first are
    /// ignored.
    pub async fn hydrate(&self) {
        if self
            .lifecycle
            .compare_exchange(NEW, HYDRATING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(key = %self.store_key, "hydrate() called more than once; ignoring");
            return;
        }

        let cart = self.load().await;
        info!(
            key = %self.store_key,
            items = cart.len(),
            quantity = cart.total_quantity(),
            "Cart hydrated"
        );

        self.state.send_replace(Arc::new(cart));

        // Loses only to a concurrent shutdown(), which must win
        let _ = self.lifecycle.compare_exchange(
            HYDRATING,
            READY,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    async fn load(&self) -> Cart {
        let raw = match self.store.get(&self.store_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.store_key, "No stored cart, starting empty");
                return Cart::new();
            }
            Err(e) => {
                warn!(key = %self.store_key, error = %e, "Store unreadable, starting with empty cart");
                return Cart::new();
            }
        };

        match codec::decode(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(key = %self.store_key, error = %e, "Stored cart undecodable, starting with empty cart");
                Cart::new()
            }
        }
    }

    // =========================================================================
    // Read Side
    // =========================================================================

    /// Returns the current cart snapshot.
    pub fn cart(&self) -> CartResult<Arc<Cart>> {
        self.ensure_ready()?;
        Ok(self.state.borrow().clone())
    }

    /// Returns line count, total quantity and subtotal of the current cart.
    pub fn totals(&self) -> CartResult<CartTotals> {
        Ok(self.cart()?.totals())
    }

    /// Subscribes to cart changes. The receiver starts at the current cart.
    pub fn subscribe(&self) -> CartResult<watch::Receiver<Arc<Cart>>> {
        self.ensure_ready()?;
        Ok(self.state.subscribe())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product`.
    ///
    /// An existing line with the same id gains one unit and keeps its
    /// original title, image and price. Otherwise a new line with quantity 1
    /// is appended.
    pub fn add_to_cart(&self, product: &ProductInput) -> CartResult<()> {
        debug!(id = %product.id, "add_to_cart");
        self.mutate(|cart| Some(cart.add(product)))
    }

    /// Adds one unit to the line with `id`. Unknown ids are a no-op.
    pub fn increment(&self, id: &str) -> CartResult<()> {
        debug!(id = %id, "increment");
        self.mutate(|cart| cart.increment(id))
    }

    /// Removes one unit from the line with `id`, dropping the line at zero.
    /// Unknown ids are a no-op.
    pub fn decrement(&self, id: &str) -> CartResult<()> {
        debug!(id = %id, "decrement");
        self.mutate(|cart| cart.decrement(id))
    }

    fn mutate(&self, transition: impl FnOnce(&Cart) -> Option<Cart>) -> CartResult<()> {
        self.ensure_ready()?;

        self.state.send_if_modified(|current| match transition(current) {
            Some(next) => {
                let next = Arc::new(next);
                if let Err(e) = self.persist.enqueue(next.clone()) {
                    warn!(key = %self.store_key, error = %e, "Could not queue cart for persistence");
                }
                *current = next;
                true
            }
            None => false,
        });

        Ok(())
    }

    // =========================================================================
    // Persistence Control
    // =========================================================================

    /// Waits until every persist queued before this call has been attempted.
    pub async fn flush(&self) -> CartResult<()> {
        if self.lifecycle.load(Ordering::SeqCst) == CLOSED {
            return Err(CartError::Closed);
        }
        self.persist.flush().await
    }

    /// Returns the background persistence counters.
    pub fn persist_status(&self) -> PersistStatus {
        self.persist.status()
    }

    /// Drains pending writes and stops the persist worker.
    ///
    /// Every later call on this manager fails with `CartError::Closed`.
    pub async fn shutdown(&self) -> CartResult<()> {
        if self.lifecycle.swap(CLOSED, Ordering::SeqCst) == CLOSED {
            return Ok(());
        }

        info!(key = %self.store_key, "Cart manager shutting down");
        self.persist.shutdown().await
    }

    fn ensure_ready(&self) -> CartResult<()> {
        match self.lifecycle.load(Ordering::SeqCst) {
            READY => Ok(()),
            CLOSED => Err(CartError::Closed),
            _ => Err(CartError::NotHydrated),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
