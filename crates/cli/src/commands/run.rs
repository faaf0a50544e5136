//! Run the job scheduler in the foreground.

use tracing::info;

use copperline_crm::scheduler::{Scheduler, default_registry};

use super::open_store;

/// Run every scheduled job until the process is stopped.
///
/// # Errors
///
/// Returns an error if configuration loading or the database
/// connection fails.
pub async fn scheduler() -> Result<(), Box<dyn std::error::Error>> {
    let (config, pool) = open_store().await?;

    let registry = default_registry(&pool, &config);
    info!(jobs = registry.len(), "Scheduler starting");

    Scheduler::new(registry).run().await;
    Ok(())
}
