//! Report aggregation queries.

use sea_query::{Expr, Query, SqliteQueryBuilder};
use sqlx::{Row, SqlitePool};

use crate::db::RepositoryError;
use crate::db::schema::{Customers, Orders};

/// Aggregate figures for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTotals {
    /// Number of customer records.
    pub customers: i64,
    /// Number of orders ever placed.
    pub orders: i64,
    /// Sum of all order totals, in cents.
    pub revenue_cents: i64,
}

/// Repository for report aggregation.
pub struct ReportRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new repository with the given database pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Count customers and orders and sum order revenue.
    ///
    /// The three reads run in one transaction so the figures describe a
    /// single database state even while mutations are in flight.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn totals(&self) -> Result<ReportTotals, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let customers_sql = Query::select()
            .expr(Expr::col(Customers::Id).count())
            .from(Customers::Table)
            .to_string(SqliteQueryBuilder);
        let customers: i64 = sqlx::query(&customers_sql)
            .fetch_one(&mut *tx)
            .await?
            .try_get(0)?;

        let orders_sql = Query::select()
            .expr(Expr::col(Orders::Id).count())
            .from(Orders::Table)
            .to_string(SqliteQueryBuilder);
        let orders: i64 = sqlx::query(&orders_sql)
            .fetch_one(&mut *tx)
            .await?
            .try_get(0)?;

        // SUM over zero rows is NULL, not 0.
        let revenue_sql = Query::select()
            .expr(Expr::col(Orders::TotalCents).sum())
            .from(Orders::Table)
            .to_string(SqliteQueryBuilder);
        let revenue_cents: Option<i64> = sqlx::query(&revenue_sql)
            .fetch_one(&mut *tx)
            .await?
            .try_get(0)?;

        tx.commit().await?;

        Ok(ReportTotals {
            customers,
            orders,
            revenue_cents: revenue_cents.unwrap_or(0),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use crate::db::{CustomerRepository, OrderRepository, ProductRepository};
    use chrono::{TimeZone, Utc};
    use copperline_core::Price;

    #[tokio::test]
    async fn test_totals_on_empty_database_are_zero() {
        let pool = memory_pool().await;
        let totals = ReportRepository::new(&pool).totals().await.unwrap();

        assert_eq!(
            totals,
            ReportTotals {
                customers: 0,
                orders: 0,
                revenue_cents: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_totals_count_rows_and_sum_revenue() {
        let pool = memory_pool().await;
        let now = Utc.with_ymd_and_hms(2026, 8, 22, 9, 0, 0).unwrap();

        let customers = CustomerRepository::new(&pool);
        let alice = customers
            .create("Alice", &"alice@example.com".parse().unwrap(), None, now)
            .await
            .unwrap();
        customers
            .create("Bob", &"bob@example.com".parse().unwrap(), None, now)
            .await
            .unwrap();

        let product = ProductRepository::new(&pool)
            .create("Widget", Price::parse("19.99".parse().unwrap()).unwrap(), 5, now)
            .await
            .unwrap();

        let orders = OrderRepository::new(&pool);
        orders
            .create(alice.id, &[product.id], 1999, now)
            .await
            .unwrap();
        orders
            .create(alice.id, &[product.id], 2500, now)
            .await
            .unwrap();

        let totals = ReportRepository::new(&pool).totals().await.unwrap();
        assert_eq!(
            totals,
            ReportTotals {
                customers: 2,
                orders: 2,
                revenue_cents: 4499,
            }
        );
    }
}
