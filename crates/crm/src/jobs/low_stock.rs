//! Automatic restock of low-stock products.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::CrmApi;
use crate::error::JobError;
use crate::jobs::{Job, LOG_TIMESTAMP_FORMAT};
use crate::sink::LogSink;

/// Runs the restock mutation and logs the outcome per product.
pub struct LowStockJob {
    api: CrmApi,
    sink: Arc<dyn LogSink>,
}

impl LowStockJob {
    /// Restock job writing to the given sink.
    #[must_use]
    pub fn new(api: CrmApi, sink: Arc<dyn LogSink>) -> Self {
        Self { api, sink }
    }
}

#[async_trait]
impl Job for LowStockJob {
    fn name(&self) -> &'static str {
        "low_stock_restock"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<(), JobError> {
        let result = self.api.restock_low_stock().await?;

        let timestamp = now.format(LOG_TIMESTAMP_FORMAT);
        self.sink
            .append(&format!("[{timestamp}] {}", result.message))?;
        for product in &result.products {
            self.sink.append(&format!(
                "[{timestamp}] Product: {}, New Stock: {}",
                product.name, product.stock
            ))?;
        }

        tracing::info!(restocked = result.products.len(), "Low-stock update finished");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use crate::models::CreateProductInput;
    use crate::sink::MemorySink;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_logs_summary_and_updated_products() {
        let api = CrmApi::new(memory_pool().await);
        for (name, stock) in [("Mouse", 3), ("Keyboard", 8), ("Monitor", 25)] {
            api.create_product(CreateProductInput {
                name: name.to_string(),
                price: "10.00".parse().unwrap(),
                stock: Some(stock),
            })
            .await
            .unwrap();
        }

        let sink = Arc::new(MemorySink::new());
        let job = LowStockJob::new(api, Arc::clone(&sink) as Arc<dyn LogSink>);
        let now = Utc.with_ymd_and_hms(2026, 8, 22, 0, 0, 0).unwrap();
        job.run(now).await.unwrap();

        assert_eq!(
            sink.lines(),
            [
                "[2026-08-22 00:00:00] Restocked 2 low-stock products",
                "[2026-08-22 00:00:00] Product: Mouse, New Stock: 13",
                "[2026-08-22 00:00:00] Product: Keyboard, New Stock: 18",
            ]
        );
    }

    #[tokio::test]
    async fn test_logs_only_summary_when_nothing_is_low() {
        let api = CrmApi::new(memory_pool().await);
        let sink = Arc::new(MemorySink::new());
        let job = LowStockJob::new(api, Arc::clone(&sink) as Arc<dyn LogSink>);

        let now = Utc.with_ymd_and_hms(2026, 8, 22, 12, 0, 0).unwrap();
        job.run(now).await.unwrap();

        assert_eq!(sink.lines(), ["[2026-08-22 12:00:00] No low-stock products found"]);
    }
}
