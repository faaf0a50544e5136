//! Recent order reminders.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::OrderRepository;
use crate::error::JobError;
use crate::jobs::{Job, LOG_TIMESTAMP_FORMAT};
use crate::sink::LogSink;

/// Orders this recent get a reminder line.
const REMINDER_WINDOW_DAYS: i64 = 7;

/// Logs a reminder for every order placed in the last week.
pub struct RemindersJob {
    pool: SqlitePool,
    sink: Arc<dyn LogSink>,
}

impl RemindersJob {
    /// Reminders job writing to the given sink.
    #[must_use]
    pub fn new(pool: SqlitePool, sink: Arc<dyn LogSink>) -> Self {
        Self { pool, sink }
    }
}

#[async_trait]
impl Job for RemindersJob {
    fn name(&self) -> &'static str {
        "order_reminders"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<(), JobError> {
        let since = now - chrono::Duration::days(REMINDER_WINDOW_DAYS);
        let reminders = OrderRepository::new(&self.pool)
            .recent_with_customer_email(since)
            .await?;

        let timestamp = now.format(LOG_TIMESTAMP_FORMAT);
        self.sink
            .append(&format!("[{timestamp}] Processing {} order(s)", reminders.len()))?;
        for reminder in &reminders {
            self.sink.append(&format!(
                "[{timestamp}] Order ID: {}, Customer Email: {}, Order Date: {}",
                reminder.order_id,
                reminder.customer_email,
                reminder.order_date.to_rfc3339(),
            ))?;
        }

        tracing::info!(orders = reminders.len(), "Order reminders processed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use crate::db::{CustomerRepository, ProductRepository};
    use crate::sink::MemorySink;
    use chrono::TimeZone;
    use copperline_core::Price;

    #[tokio::test]
    async fn test_logs_header_and_one_line_per_recent_order() {
        let pool = memory_pool().await;
        let now = Utc.with_ymd_and_hms(2026, 8, 22, 8, 0, 0).unwrap();
        let recent = now - chrono::Duration::days(2);
        let old = now - chrono::Duration::days(30);

        let customer = CustomerRepository::new(&pool)
            .create("Alice", &"alice@example.com".parse().unwrap(), None, old)
            .await
            .unwrap();
        let product = ProductRepository::new(&pool)
            .create(
                "Widget",
                Price::parse("19.99".parse().unwrap()).unwrap(),
                5,
                old,
            )
            .await
            .unwrap();
        let orders = OrderRepository::new(&pool);
        orders
            .create(customer.id, &[product.id], 1999, old)
            .await
            .unwrap();
        let fresh = orders
            .create(customer.id, &[product.id], 1999, recent)
            .await
            .unwrap();

        let sink = Arc::new(MemorySink::new());
        let job = RemindersJob::new(pool, Arc::clone(&sink) as Arc<dyn LogSink>);
        job.run(now).await.unwrap();

        assert_eq!(
            sink.lines(),
            [
                "[2026-08-22 08:00:00] Processing 1 order(s)".to_string(),
                format!(
                    "[2026-08-22 08:00:00] Order ID: {}, Customer Email: alice@example.com, Order Date: 2026-08-20T08:00:00+00:00",
                    fresh.id
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_recent_orders_logs_zero_header() {
        let pool = memory_pool().await;
        let sink = Arc::new(MemorySink::new());
        let job = RemindersJob::new(pool, Arc::clone(&sink) as Arc<dyn LogSink>);

        let now = Utc.with_ymd_and_hms(2026, 8, 22, 8, 0, 0).unwrap();
        job.run(now).await.unwrap();

        assert_eq!(sink.lines(), ["[2026-08-22 08:00:00] Processing 0 order(s)"]);
    }
}
