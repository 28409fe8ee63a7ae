//! # CLI Error Type
//!
//! Startup and wiring failures. Cart rejections are not errors at this
//! level: they are reported as notices and turn into a failing exit code.

use cart_db::DbError;
use cart_store::InventoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Could not determine a data directory; set CART_DB_PATH")]
    NoDataDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Inventory client error: {0}")]
    Inventory(#[from] InventoryError),
}

pub type CliResult<T> = Result<T, CliError>;
