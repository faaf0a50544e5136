//! Seed the store with sample data.

use tracing::info;

use copperline_crm::seed::seed_all;

use super::open_store;

/// Populate the store with the built-in sample data set.
///
/// Safe to run repeatedly; customers, products and orders that already
/// exist are skipped.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or a write fails.
pub async fn sample_data() -> Result<(), Box<dyn std::error::Error>> {
    let (_config, pool) = open_store().await?;

    let summary = seed_all(&pool).await?;

    info!("Seeding complete!");
    info!("  Customers created: {}", summary.customers_created);
    info!("  Products created: {}", summary.products_created);
    info!("  Orders created: {}", summary.orders_created);

    Ok(())
}
