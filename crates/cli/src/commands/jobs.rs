//! Manual triggers for the scheduled jobs.
//!
//! Each trigger runs the same job the scheduler would, once, writing to
//! the configured log sink, then exits.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use copperline_crm::api::CrmApi;
use copperline_crm::jobs::{CleanupJob, Job, LowStockJob, RemindersJob, ReportJob};
use copperline_crm::sink::FileSink;

use super::open_store;

/// Write one customer/order/revenue report line.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the job fails.
pub async fn report() -> Result<(), Box<dyn std::error::Error>> {
    let (config, pool) = open_store().await?;

    let sink = Arc::new(FileSink::new(config.report_log.clone()));
    ReportJob::new(pool, sink).run(Utc::now()).await?;

    info!(log = %config.report_log.display(), "Report written");
    Ok(())
}

/// Delete customers with no orders in the past year.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the job fails.
pub async fn cleanup() -> Result<(), Box<dyn std::error::Error>> {
    let (config, pool) = open_store().await?;

    let sink = Arc::new(FileSink::new(config.cleanup_log.clone()));
    CleanupJob::new(pool, sink).run(Utc::now()).await?;

    info!(log = %config.cleanup_log.display(), "Cleanup complete");
    Ok(())
}

/// Top up every low-stock product.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the job fails.
pub async fn restock() -> Result<(), Box<dyn std::error::Error>> {
    let (config, pool) = open_store().await?;

    let sink = Arc::new(FileSink::new(config.low_stock_log.clone()));
    LowStockJob::new(CrmApi::new(pool), sink).run(Utc::now()).await?;

    info!(log = %config.low_stock_log.display(), "Restock complete");
    Ok(())
}

/// Log reminders for orders placed in the past week.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the job fails.
pub async fn remind() -> Result<(), Box<dyn std::error::Error>> {
    let (config, pool) = open_store().await?;

    let sink = Arc::new(FileSink::new(config.reminders_log.clone()));
    RemindersJob::new(pool, sink).run(Utc::now()).await?;

    info!(log = %config.reminders_log.display(), "Reminders processed");
    Ok(())
}
