//! # Cart Configuration
//!
//! Configuration management for the cart manager and its store.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CART_STORE_KEY=@GoMarketplace:product                              │
//! │     CART_STORE_BACKEND=sqlite                                          │
//! │     CART_DB_PATH=/var/lib/marketcart/cart.db                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/marketcart/cart.toml (Linux)                             │
//! │     ~/Library/Application Support/com.marketcart.marketcart/cart.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     store_key = "@GoMarketplace:product", backend = sqlite             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! [cart]
//! store_key = "@GoMarketplace:product"
//!
//! [store]
//! backend = "sqlite"   # sqlite | memory
//! path = "/home/me/.local/share/marketcart/cart.db"
//! max_connections = 2
//! connect_timeout_secs = 10
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cart_core::DEFAULT_STORE_KEY;
use cart_store::{KeyValueStore, MemoryStore, SqliteConfig, SqliteStore, StoreError};

use crate::error::{CartError, CartResult};

// =============================================================================
// Store Backend
// =============================================================================

/// Which [`KeyValueStore`] implementation backs the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// SQLite file on disk. Survives restarts.
    #[default]
    Sqlite,

    /// Process-local map. Lost on exit.
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" | "file" => Ok(StoreBackend::Sqlite),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(CartError::InvalidConfig(format!(
                "Unknown store backend: '{}'. Valid options: sqlite, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Cart Settings
// =============================================================================

/// Settings for the cart itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSettings {
    /// Key the serialized cart is stored under.
    #[serde(default = "default_store_key")]
    pub store_key: String,
}

fn default_store_key() -> String {
    DEFAULT_STORE_KEY.to_string()
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            store_key: default_store_key(),
        }
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// Settings for the durable store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Store backend.
    #[serde(default)]
    pub backend: StoreBackend,

    /// SQLite file path. Defaults to `cart.db` in the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Maximum SQLite pool connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            backend: StoreBackend::default(),
            path: None,
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

// =============================================================================
// Cart Config
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartConfig {
    /// Cart settings.
    #[serde(default)]
    pub cart: CartSettings,

    /// Store settings.
    #[serde(default)]
    pub store: StoreSettings,
}

impl CartConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config using an in-memory store under `store_key`.
    pub fn in_memory(store_key: impl Into<String>) -> Self {
        CartConfig {
            cart: CartSettings {
                store_key: store_key.into(),
            },
            store: StoreSettings {
                backend: StoreBackend::Memory,
                ..StoreSettings::default()
            },
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CartResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CartResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CartError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CartError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| CartError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CartResult<()> {
        if self.cart.store_key.trim().is_empty() {
            return Err(CartError::InvalidConfig("store_key must not be empty".into()));
        }

        if self.store.max_connections == 0 {
            return Err(CartError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.store.connect_timeout_secs == 0 {
            return Err(CartError::InvalidConfig(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("CART_STORE_KEY") {
            debug!(store_key = %key, "Overriding store key from environment");
            self.cart.store_key = key;
        }

        if let Some(backend) = lookup("CART_STORE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding store backend from environment");
                    self.store.backend = parsed;
                }
                Err(_) => warn!(backend = %backend, "Unknown store backend in environment"),
            }
        }

        if let Some(path) = lookup("CART_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.store.path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "marketcart", "marketcart")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }

    /// Returns the default database file path.
    pub fn default_db_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "marketcart", "marketcart")
            .map(|dirs| dirs.data_dir().join("cart.db"))
    }

    // =========================================================================
    // Store Construction
    // =========================================================================

    /// Opens the configured store.
    ///
    /// For SQLite the parent directory of the database file is created if
    /// needed.
    pub async fn open_store(&self) -> CartResult<Arc<dyn KeyValueStore>> {
        match self.store.backend {
            StoreBackend::Memory => {
                info!("Using in-memory cart store");
                Ok(Arc::new(MemoryStore::new()))
            }
            StoreBackend::Sqlite => {
                let path = self
                    .store
                    .path
                    .clone()
                    .or_else(Self::default_db_path)
                    .ok_or_else(|| {
                        CartError::InvalidConfig("No database path available".into())
                    })?;

                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StoreError::ConnectionFailed(format!(
                            "cannot create data directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }

                let sqlite = SqliteConfig::new(path)
                    .max_connections(self.store.max_connections)
                    .connect_timeout(Duration::from_secs(self.store.connect_timeout_secs));

                Ok(Arc::new(SqliteStore::open(sqlite).await?))
            }
        }
    }

    /// Returns the store key.
    pub fn store_key(&self) -> &str {
        &self.cart.store_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("sqlite".parse::<StoreBackend>().unwrap(), StoreBackend::Sqlite);
        assert_eq!("MEMORY".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.store_key(), "@GoMarketplace:product");
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CartConfig::default();
        config.cart.store_key = "  ".into();
        assert!(config.validate().is_err());

        let mut config = CartConfig::default();
        config.store.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CartConfig = toml::from_str(
            r#"
            [store]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store_key(), DEFAULT_STORE_KEY);
        assert_eq!(config.store.max_connections, 2);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CART_STORE_KEY", "cart:test"),
            ("CART_STORE_BACKEND", "memory"),
            ("CART_DB_PATH", "/tmp/other.db"),
        ]
        .into_iter()
        .collect();

        let mut config = CartConfig::default();
        config.apply_overrides_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.store_key(), "cart:test");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/other.db")));
    }

    #[test]
    fn test_unknown_backend_override_is_ignored() {
        let mut config = CartConfig::default();
        config.apply_overrides_from(|name| {
            (name == "CART_STORE_BACKEND").then(|| "redis".to_string())
        });
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cart.toml");

        let mut config = CartConfig::in_memory("cart:saved");
        config.store.connect_timeout_secs = 3;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: CartConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.store_key(), "cart:saved");
        assert_eq!(loaded.store.backend, StoreBackend::Memory);
        assert_eq!(loaded.store.connect_timeout_secs, 3);
    }

    #[test]
    fn test_load_or_default_falls_back_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "[store]\nbackend = 42\n").unwrap();

        assert!(CartConfig::load(Some(path.clone())).is_err());

        let config = CartConfig::load_or_default(Some(path));
        assert_eq!(config.store_key(), DEFAULT_STORE_KEY);
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
    }

    #[tokio::test]
    async fn test_unwritable_data_dir_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let mut config = CartConfig::default();
        config.store.path = Some(blocker.join("data").join("cart.db"));

        let err = config.open_store().await.unwrap_err();
        assert!(matches!(
            err,
            CartError::Store(StoreError::ConnectionFailed(_))
        ));
        assert!(!err.is_config_error());
    }

    #[tokio::test]
    async fn test_open_sqlite_store_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CartConfig::default();
        config.store.path = Some(dir.path().join("data").join("cart.db"));

        let store = config.open_store().await.unwrap();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
