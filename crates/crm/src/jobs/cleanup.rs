//! Inactive customer cleanup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::CustomerRepository;
use crate::error::JobError;
use crate::jobs::{Job, LOG_TIMESTAMP_FORMAT};
use crate::sink::LogSink;

/// A customer with no order in this many days counts as inactive.
const INACTIVE_AFTER_DAYS: i64 = 365;

/// Deletes customers without a recent order, cascading to their orders.
pub struct CleanupJob {
    pool: SqlitePool,
    sink: Arc<dyn LogSink>,
}

impl CleanupJob {
    /// Cleanup job writing to the given sink.
    #[must_use]
    pub fn new(pool: SqlitePool, sink: Arc<dyn LogSink>) -> Self {
        Self { pool, sink }
    }
}

#[async_trait]
impl Job for CleanupJob {
    fn name(&self) -> &'static str {
        "customer_cleanup"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<(), JobError> {
        let cutoff = now - chrono::Duration::days(INACTIVE_AFTER_DAYS);
        let deleted = CustomerRepository::new(&self.pool)
            .delete_without_orders_since(cutoff)
            .await?;

        let timestamp = now.format(LOG_TIMESTAMP_FORMAT);
        let line = if deleted == 0 {
            format!("[{timestamp}] No inactive customers found")
        } else {
            format!("[{timestamp}] Deleted {deleted} inactive customers")
        };
        self.sink.append(&line)?;

        tracing::info!(deleted, "Inactive customer cleanup finished");
        Ok(())
    }
}
