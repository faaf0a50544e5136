//! Weekly business report.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::db::ReportRepository;
use crate::error::JobError;
use crate::jobs::{Job, LOG_TIMESTAMP_FORMAT};
use crate::sink::LogSink;

/// Aggregates customer, order and revenue totals into one report line.
pub struct ReportJob {
    pool: SqlitePool,
    sink: Arc<dyn LogSink>,
}

impl ReportJob {
    /// Report job writing to the given sink.
    #[must_use]
    pub fn new(pool: SqlitePool, sink: Arc<dyn LogSink>) -> Self {
        Self { pool, sink }
    }
}

#[async_trait]
impl Job for ReportJob {
    fn name(&self) -> &'static str {
        "report"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<(), JobError> {
        let totals = ReportRepository::new(&self.pool).totals().await?;
        let revenue = Decimal::new(totals.revenue_cents, 2);

        let line = format!(
            "{} - Report: {} customers, {} orders, ${revenue} revenue",
            now.format(LOG_TIMESTAMP_FORMAT),
            totals.customers,
            totals.orders,
        );
        self.sink.append(&line)?;

        tracing::info!(
            customers = totals.customers,
            orders = totals.orders,
            revenue = %revenue,
            "Report generated"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use crate::db::{CustomerRepository, OrderRepository, ProductRepository};
    use crate::sink::MemorySink;
    use chrono::TimeZone;
    use copperline_core::Price;

    #[tokio::test]
    async fn test_empty_store_reports_zeroes() {
        let pool = memory_pool().await;
        let sink = Arc::new(MemorySink::new());
        let job = ReportJob::new(pool, Arc::clone(&sink) as Arc<dyn LogSink>);

        let now = Utc.with_ymd_and_hms(2026, 8, 24, 6, 0, 0).unwrap();
        job.run(now).await.unwrap();

        assert_eq!(
            sink.lines(),
            ["2026-08-24 06:00:00 - Report: 0 customers, 0 orders, $0.00 revenue"]
        );
    }

    #[tokio::test]
    async fn test_report_line_totals_revenue_to_two_decimals() {
        let pool = memory_pool().await;
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 6, 0, 0).unwrap();

        let alice = CustomerRepository::new(&pool)
            .create("Alice", &"alice@example.com".parse().unwrap(), None, now)
            .await
            .unwrap();
        let product = ProductRepository::new(&pool)
            .create(
                "Widget",
                Price::parse("19.99".parse().unwrap()).unwrap(),
                5,
                now,
            )
            .await
            .unwrap();
        let orders = OrderRepository::new(&pool);
        orders.create(alice.id, &[product.id], 1999, now).await.unwrap();
        orders.create(alice.id, &[product.id], 2500, now).await.unwrap();

        let sink = Arc::new(MemorySink::new());
        let job = ReportJob::new(pool, Arc::clone(&sink) as Arc<dyn LogSink>);
        job.run(now).await.unwrap();

        assert_eq!(
            sink.lines(),
            ["2026-08-24 06:00:00 - Report: 1 customers, 2 orders, $44.99 revenue"]
        );
    }
}
