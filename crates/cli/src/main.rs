//! RocketShoes CLI - Inspect and change the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rocketshoes show
//!
//! # Add one unit of product 3
//! rocketshoes add 3
//!
//! # Set product 3 to five units
//! rocketshoes set 3 5
//!
//! # Remove product 3
//! rocketshoes remove 3
//! ```
//!
//! Configuration comes from the environment (see `rocketshoes_cart::config`).
//! A rejected or failed change exits with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rocketshoes")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart and its totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Set {
        /// Product ID
        product_id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cli=info,rocketshoes_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let session = commands::Session::open().await?;

    match cli.command {
        Commands::Show => {}
        Commands::Add { product_id } => session.store.add_product(product_id).await,
        Commands::Remove { product_id } => session.store.remove_product(product_id).await,
        Commands::Set { product_id, amount } => {
            session.store.update_product_amount(product_id, amount).await;
        }
    }

    session.finish()
}
