//! # cartctl
//!
//! Inspect and edit the persisted cart from a terminal.
//!
//! ## Usage
//! ```bash
//! # Print the cart
//! cargo run -p cart-state --bin cartctl -- show
//!
//! # Add one unit of a product (price in major units)
//! cargo run -p cart-state --bin cartctl -- add 42 "Camiseta" https://img/42.png 59.90
//!
//! # Change quantities
//! cargo run -p cart-state --bin cartctl -- inc 42
//! cargo run -p cart-state --bin cartctl -- dec 42
//!
//! # Delete the stored cart
//! cargo run -p cart-state --bin cartctl -- reset
//!
//! # Use a specific database or config file
//! cargo run -p cart-state --bin cartctl -- --db ./cart_dev.db show
//! ```
//!
//! Every run hydrates from the store, applies at most one command, waits
//! for the write to land, and prints the resulting cart.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cart_core::validation::validate_product;
use cart_core::{Cart, CoreError, Money, ProductInput};
use cart_state::{CartConfig, CartManager, CartResult, PersistStatus, StoreBackend};

/// Inspect and edit the persisted Marketcart cart.
#[derive(Parser, Debug)]
#[command(name = "cartctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: platform config dir/cart.toml)
    #[arg(global = true, short, long)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config)
    #[arg(global = true, short, long)]
    db: Option<PathBuf>,

    /// Defaults to `show`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Commands {
    /// Print the cart
    Show,

    /// Add one unit of a product
    Add {
        id: String,
        title: String,
        image_url: String,
        /// Unit price in major units, e.g. 59.90
        price: Money,
    },

    /// Add one unit to an existing line
    Inc { id: String },

    /// Remove one unit; drops the line at zero
    Dec { id: String },

    /// Delete the stored cart
    Reset,
}

/// What a command left behind.
#[derive(Debug)]
enum Outcome {
    Cleared,
    Cart {
        cart: Arc<Cart>,
        status: PersistStatus,
        untouched: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let config = resolve_config(cli.config, cli.db)?;
    let command = cli.command.unwrap_or(Commands::Show);

    match execute(&config, command).await? {
        Outcome::Cleared => println!("Cart cleared ({})", config.store_key()),
        Outcome::Cart {
            cart,
            status,
            untouched,
        } => {
            if let Some(id) = untouched {
                eprintln!("note: '{}' is not in the cart; nothing changed", id);
            }
            print_cart(&cart);
            if status.failed > 0 {
                eprintln!(
                    "warning: {} write(s) failed: {}",
                    status.failed,
                    status.last_error.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

/// Initializes tracing on stderr so it never mixes with the printed cart.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,cart=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// An explicit `--config` must load; the default location falls back to
/// defaults when missing or broken.
fn resolve_config(config: Option<PathBuf>, db: Option<PathBuf>) -> CartResult<CartConfig> {
    let mut config = match config {
        Some(path) => CartConfig::load(Some(path))?,
        None => CartConfig::load_or_default(None),
    };

    if let Some(path) = db {
        config.store.backend = StoreBackend::Sqlite;
        config.store.path = Some(path);
    }

    Ok(config)
}

async fn execute(config: &CartConfig, command: Commands) -> CartResult<Outcome> {
    let store = config.open_store().await?;

    if command == Commands::Reset {
        store.remove(config.store_key()).await?;
        return Ok(Outcome::Cleared);
    }

    let manager = CartManager::new(config.store_key(), store);
    manager.hydrate().await;

    let mut untouched = None;
    match command {
        Commands::Show | Commands::Reset => {}
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => {
            let product = ProductInput::new(id, title, image_url, price);
            validate_product(&product).map_err(CoreError::from)?;
            manager.add_to_cart(&product)?;
        }
        Commands::Inc { id } => {
            let cart = manager.cart()?;
            if !cart.contains(&id) {
                untouched = Some(id.clone());
            }
            manager.increment(&id)?;
        }
        Commands::Dec { id } => {
            let cart = manager.cart()?;
            if !cart.contains(&id) {
                untouched = Some(id.clone());
            }
            manager.decrement(&id)?;
        }
    }

    manager.flush().await?;
    let cart = manager.cart()?;
    let status = manager.persist_status();
    manager.shutdown().await?;

    Ok(Outcome::Cart {
        cart,
        status,
        untouched,
    })
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    println!("{:<12} {:<28} {:>5} {:>10} {:>12}", "ID", "TITLE", "QTY", "PRICE", "TOTAL");
    for item in cart.items() {
        println!(
            "{:<12} {:<28} {:>5} {:>10} {:>12}",
            item.id,
            item.title,
            item.quantity,
            item.price.to_string(),
            item.line_total().to_string()
        );
    }

    let totals = cart.totals();
    println!();
    println!(
        "{} line(s), {} unit(s), subtotal {}",
        totals.line_count, totals.total_quantity, totals.subtotal
    );
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cart_state::CartError;
    use clap::CommandFactory;

    fn sqlite_config(dir: &tempfile::TempDir) -> CartConfig {
        resolve_config(None, Some(dir.path().join("cart.db"))).unwrap()
    }

    fn add(id: &str, price: &str) -> Commands {
        Commands::Add {
            id: id.into(),
            title: format!("Product {}", id),
            image_url: format!("https://img/{}.png", id),
            price: price.parse().unwrap(),
        }
    }

    fn cart_of(outcome: Outcome) -> Arc<Cart> {
        match outcome {
            Outcome::Cart { cart, .. } => cart,
            Outcome::Cleared => panic!("expected a cart"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_global_db() {
        let cli = Cli::try_parse_from([
            "cartctl", "add", "42", "Camiseta", "https://img/42.png", "59.90", "--db", "x.db",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        assert_eq!(
            cli.command,
            Some(Commands::Add {
                id: "42".into(),
                title: "Camiseta".into(),
                image_url: "https://img/42.png".into(),
                price: Money::from_cents(5990),
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Cli::try_parse_from(["cartctl", "add", "1", "T", "U", "ten"]).is_err());
        assert!(Cli::try_parse_from(["cartctl", "inc"]).is_err());
        assert!(Cli::try_parse_from(["cartctl", "frobnicate"]).is_err());
        assert_eq!(Cli::try_parse_from(["cartctl"]).unwrap().command, None);
    }

    #[tokio::test]
    async fn test_commands_persist_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = sqlite_config(&dir);

        execute(&config, add("A", "10")).await.unwrap();
        execute(&config, add("B", "59.9")).await.unwrap();
        execute(&config, Commands::Inc { id: "A".into() }).await.unwrap();
        execute(&config, Commands::Dec { id: "B".into() }).await.unwrap();

        let cart = cart_of(execute(&config, Commands::Show).await.unwrap());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("A").unwrap().quantity, 2);
        assert_eq!(cart.subtotal(), Money::from_cents(2000));
    }

    #[tokio::test]
    async fn test_unknown_id_is_reported_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = sqlite_config(&dir);

        match execute(&config, Commands::Dec { id: "ghost".into() }).await.unwrap() {
            Outcome::Cart { cart, untouched, .. } => {
                assert!(cart.is_empty());
                assert_eq!(untouched.as_deref(), Some("ghost"));
            }
            Outcome::Cleared => panic!("expected a cart"),
        }
    }

    #[tokio::test]
    async fn test_reset_clears_stored_cart() {
        let dir = tempfile::tempdir().unwrap();
        let config = sqlite_config(&dir);

        execute(&config, add("A", "1.50")).await.unwrap();
        assert!(matches!(
            execute(&config, Commands::Reset).await.unwrap(),
            Outcome::Cleared
        ));

        let cart = cart_of(execute(&config, Commands::Show).await.unwrap());
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_product() {
        let dir = tempfile::tempdir().unwrap();
        let config = sqlite_config(&dir);

        let err = execute(&config, add("", "1")).await.unwrap_err();
        assert!(matches!(err, CartError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn test_explicit_bad_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "[cart]\nstore_key = \"\"\n").unwrap();

        assert!(resolve_config(Some(path), None).is_err());
    }
}
