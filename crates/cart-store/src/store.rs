//! # Key-Value Store Trait
//!
//! The storage boundary the cart depends on.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    KeyValueStore Contract                               │
//! │                                                                         │
//! │  get(key)         → Ok(Some(value))  value from the latest set          │
//! │                   → Ok(None)         key never set (or removed)         │
//! │                   → Err(..)          store unreadable                   │
//! │                                                                         │
//! │  set(key, value)  → overwrite; calling it again is always safe          │
//! │                     last write wins                                     │
//! │                                                                         │
//! │  remove(key)      → Ok(()) even if the key was never set                │
//! │                                                                         │
//! │  Values are opaque text. The store never parses them.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::StoreResult;

/// An asynchronous string key-value store.
///
/// Methods take `&self`; implementations use interior mutability so one
/// instance can be shared as `Arc<dyn KeyValueStore>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}
