//! # cart-cli
//!
//! Command-line front end for the cart store.
//!
//! ## Module Organization
//! ```text
//! cart_cli/
//! ├── lib.rs       ◄─── Session wiring & logging
//! ├── config.rs    ◄─── CliConfig (defaults → TOML → environment)
//! ├── commands.rs  ◄─── clap arguments, command dispatch, output
//! └── error.rs     ◄─── CliError
//! ```
//!
//! ## Session
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Load CliConfig                                                     │
//! │  2. Open SQLite (WAL, migrations); `check` reports and stops here      │
//! │  3. Build HttpInventory (optional timeout)                             │
//! │  4. CartStore::builder(..).restore()                                   │
//! │  5. Run the command, notices → stderr                                  │
//! │  6. Print the cart → stdout                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;

use std::sync::Arc;

use cart_db::{migrations, Database, DbConfig};
use cart_store::{CartStore, HttpInventory, SqliteStorage, StoreConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::commands::{Cli, Command, ConsoleNotifier, DatabaseStatus};
use crate::config::CliConfig;
use crate::error::CliResult;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cart_store=trace` - Trace the store only
/// - Default: `info,cart=debug,sqlx=warn`
///
/// Logs go to stderr so stdout stays clean for the cart listing.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cart=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parses configuration and runs one session.
///
/// Returns whether the command was accepted.
pub async fn run(cli: Cli) -> CliResult<bool> {
    let config = CliConfig::load(cli.config)?;
    run_with_config(&config, cli.command).await
}

/// Runs one session with an already-loaded configuration.
pub async fn run_with_config(config: &CliConfig, command: Command) -> CliResult<bool> {
    let database_path = config.database_path()?;
    info!(
        inventory = %config.inventory.base_url,
        database = %database_path.display(),
        "Starting cart session"
    );

    let db = Database::new(DbConfig::new(&database_path)).await?;

    if command == Command::Check {
        let status = database_status(&db).await?;
        print!("{}", status.render(&database_path));
        db.close().await;
        return Ok(status.is_ok());
    }

    let inventory = HttpInventory::with_timeout(
        config.inventory.base_url.clone(),
        config.inventory.timeout(),
    )?;

    let store = CartStore::builder(Arc::new(inventory), Arc::new(SqliteStorage::new(db.clone())))
        .notifier(Arc::new(ConsoleNotifier))
        .config(StoreConfig {
            storage_key: config.storage.key.clone(),
        })
        .restore()
        .await;

    let outcome = commands::execute(&store, command).await;
    debug!(?command, ?outcome, "Command finished");

    print!("{}", store.with_cart(commands::render_cart));
    db.close().await;

    Ok(outcome.is_ok())
}

async fn database_status(db: &Database) -> CliResult<DatabaseStatus> {
    let healthy = db.health_check().await;
    let (total_migrations, applied_migrations) = migrations::migration_status(db.pool()).await?;
    debug!(healthy, applied_migrations, total_migrations, "Database checked");

    Ok(DatabaseStatus {
        healthy,
        applied_migrations,
        total_migrations,
    })
}
