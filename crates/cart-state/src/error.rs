//! # Cart State Error Types
//!
//! Error types for the cart manager and its configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Misuse      │  │  Configuration  │  │     Wrapped             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotHydrated    │  │  InvalidConfig  │  │  Store (cart-store)     │ │
//! │  │  Closed         │  │  ConfigLoad     │  │  Core  (cart-core)      │ │
//! │  │                 │  │  ConfigSave     │  │  ChannelError           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Hydrate and persist failures are NOT here: they are logged and the    │
//! │  cart carries on with its in-memory state.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use cart_core::CoreError;
use cart_store::StoreError;

/// Result type alias for cart manager operations.
pub type CartResult<T> = Result<T, CartError>;

/// Cart manager error type.
#[derive(Debug, Error)]
pub enum CartError {
    // =========================================================================
    // Misuse Errors
    // =========================================================================
    /// The cart was read or mutated before `hydrate()` completed.
    #[error("Cart used before hydrate(); call CartManager::hydrate first")]
    NotHydrated,

    /// The cart was used after `shutdown()`.
    #[error("Cart manager has been shut down")]
    Closed,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid cart configuration.
    #[error("Invalid cart configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Cart encoding or validation failed.
    #[error("Cart error: {0}")]
    Core(#[from] CoreError),

    /// Channel send/receive failed.
    #[error("Channel error: {0}")]
    ChannelError(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for CartError {
    fn from(err: std::io::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(err: toml::de::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CartError {
    fn from(err: toml::ser::Error) -> Self {
        CartError::ConfigSaveFailed(err.to_string())
    }
}

impl CartError {
    /// Returns true if this error indicates the caller used the manager
    /// outside its hydrated lifetime.
    pub fn is_misuse(&self) -> bool {
        matches!(self, CartError::NotHydrated | CartError::Closed)
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CartError::InvalidConfig(_)
                | CartError::ConfigLoadFailed(_)
                | CartError::ConfigSaveFailed(_)
        )
    }
}
