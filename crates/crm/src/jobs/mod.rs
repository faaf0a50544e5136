//! Scheduled background jobs.
//!
//! # Jobs
//!
//! - `report` - weekly business report aggregation
//! - `cleanup` - inactive customer removal
//! - `heartbeat` - liveness logging with a store round-trip
//! - `low_stock` - automatic restock of low-stock products
//! - `reminders` - recent order reminder dump
//!
//! Each job takes its reference time from the caller, works through the
//! store, and appends its durable output to a [`crate::sink::LogSink`].
//! One execution is one attempt; there are no retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::JobError;

pub mod cleanup;
pub mod heartbeat;
pub mod low_stock;
pub mod reminders;
pub mod report;

pub use cleanup::CleanupJob;
pub use heartbeat::HeartbeatJob;
pub use low_stock::LowStockJob;
pub use reminders::RemindersJob;
pub use report::ReportJob;

/// A unit of scheduled work.
#[async_trait]
pub trait Job: Send + Sync {
    /// Stable name used in scheduler logs.
    fn name(&self) -> &'static str;

    /// Run one attempt with `now` as the reference time.
    ///
    /// # Errors
    ///
    /// Returns `JobError` when the store or the output sink fails.
    async fn run(&self, now: DateTime<Utc>) -> Result<(), JobError>;
}

/// Timestamp layout shared by the dated job log lines.
pub(crate) const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
