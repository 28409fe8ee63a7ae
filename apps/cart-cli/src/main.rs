//! # cart
//!
//! ```text
//! cart [--config PATH] show
//! cart [--config PATH] add <ID>
//! cart [--config PATH] remove <ID>
//! cart [--config PATH] set <ID> <AMOUNT>
//! cart [--config PATH] check
//! ```
//!
//! Exit status is non-zero when the operation was rejected or the session
//! could not start.

use std::process::ExitCode;

use cart_cli::commands::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cart_cli::init_tracing();

    match cart_cli::run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Cart session failed");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
