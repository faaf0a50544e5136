//! Copperline CRM CLI - Scheduler and store management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run the job scheduler in the foreground
//! copperline-cli run
//!
//! # Seed the store with sample data
//! copperline-cli seed
//!
//! # Trigger individual jobs once
//! copperline-cli report
//! copperline-cli cleanup
//! copperline-cli restock
//! copperline-cli remind
//! ```
//!
//! # Commands
//!
//! - `run` - Run every scheduled job until interrupted
//! - `seed` - Seed the store with sample customers, products and orders
//! - `report` - Write one customer/order/revenue report line
//! - `cleanup` - Delete customers with no orders in the past year
//! - `restock` - Top up low-stock products
//! - `remind` - Log reminders for orders placed in the past week

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "copperline-cli")]
#[command(author, version, about = "Copperline CRM CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the job scheduler in the foreground
    Run,
    /// Seed the store with sample data
    Seed,
    /// Generate the customer/order/revenue report now
    Report,
    /// Delete customers with no recent orders
    Cleanup,
    /// Restock low-stock products
    Restock,
    /// Log reminders for recent orders
    Remind,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run => commands::run::scheduler().await?,
        Commands::Seed => commands::seed::sample_data().await?,
        Commands::Report => commands::jobs::report().await?,
        Commands::Cleanup => commands::jobs::cleanup().await?,
        Commands::Restock => commands::jobs::restock().await?,
        Commands::Remind => commands::jobs::remind().await?,
    }
    Ok(())
}
