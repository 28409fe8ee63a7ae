//! # Commands
//!
//! Argument parsing and the mapping from subcommands to store operations.
//!
//! ```text
//! cart show               ──► (read only)
//! cart add <ID>           ──► store.add_product(ID)
//! cart remove <ID>        ──► store.remove_product(ID)
//! cart set <ID> <AMOUNT>  ──► store.update_product_amount(ID, AMOUNT)
//! cart check              ──► database health + migration status
//! ```

use std::path::{Path, PathBuf};

use cart_core::{Cart, ProductId};
use cart_store::{CartResult, CartStore, Mutation, Notice, NoticeLevel, Notifier, UpdateProductAmount};
use clap::{Parser, Subcommand};

// =============================================================================
// Arguments
// =============================================================================

/// Shopping cart backed by a REST inventory and a local SQLite file.
#[derive(Parser, Debug)]
#[command(name = "cart")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CART_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the current cart
    Show,

    /// Add one unit of a product
    Add {
        /// Inventory product id
        product_id: u64,
    },

    /// Remove a product from the cart
    Remove {
        /// Inventory product id
        product_id: u64,
    },

    /// Set the quantity of a product already in the cart
    Set {
        /// Inventory product id
        product_id: u64,

        /// New quantity (at least 1)
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },

    /// Check the local database and exit
    Check,
}

// =============================================================================
// Execution
// =============================================================================

/// Runs a command against the store. `Ok(None)` for read-only commands.
pub async fn execute(store: &CartStore, command: Command) -> CartResult<Option<Mutation>> {
    let mutation = match command {
        Command::Show | Command::Check => return Ok(None),
        Command::Add { product_id } => store.add_product(ProductId::new(product_id)).await?,
        Command::Remove { product_id } => store.remove_product(ProductId::new(product_id)).await?,
        Command::Set { product_id, amount } => {
            store
                .update_product_amount(UpdateProductAmount {
                    product_id: ProductId::new(product_id),
                    amount,
                })
                .await?
        }
    };
    Ok(Some(mutation))
}

// =============================================================================
// Output
// =============================================================================

/// Prints notices to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", format_notice(&notice));
    }
}

pub fn format_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => format!("✔ {}", notice.message),
        NoticeLevel::Error => format!("✖ {}", notice.message),
    }
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

/// Human-readable cart listing.
pub fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = format!(
        "Cart: {} product(s), {} unit(s)\n",
        cart.item_count(),
        cart.total_quantity()
    );
    for item in cart.items() {
        out.push_str(&format!(
            "  #{:<6} {:<40} x{:<4} {:>10}\n",
            item.product_id,
            item.title,
            item.quantity,
            format_cents(item.unit_price_cents)
        ));
    }
    out
}

/// Result of `cart check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseStatus {
    pub healthy: bool,
    pub applied_migrations: usize,
    pub total_migrations: usize,
}

impl DatabaseStatus {
    /// Healthy and fully migrated.
    pub fn is_ok(&self) -> bool {
        self.healthy && self.applied_migrations == self.total_migrations
    }

    pub fn render(&self, path: &Path) -> String {
        format!(
            "Database: {} ({})\nMigrations: {}/{} applied\n",
            path.display(),
            if self.healthy { "ok" } else { "unreachable" },
            self.applied_migrations,
            self.total_migrations
        )
    }
}
