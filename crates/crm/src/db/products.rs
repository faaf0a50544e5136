//! Product persistence.

use chrono::{DateTime, Utc};
use sea_query::{Expr, Order, Query, SelectStatement, SqliteQueryBuilder};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use copperline_core::{Price, ProductId};

use crate::db::schema::Products;
use crate::db::{RepositoryError, format_timestamp, parse_timestamp};
use crate::filters::ProductFilter;
use crate::models::{LOW_STOCK_THRESHOLD, Product};

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new repository with the given database pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a product and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        price: Price,
        stock: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Product, RepositoryError> {
        let sql = Query::insert()
            .into_table(Products::Table)
            .columns([
                Products::Name,
                Products::PriceCents,
                Products::Stock,
                Products::CreatedAt,
            ])
            .values_panic([
                name.into(),
                price.as_cents().into(),
                stock.into(),
                format_timestamp(created_at).into(),
            ])
            .to_string(SqliteQueryBuilder);

        let result = sqlx::query(&sql).execute(self.pool).await?;

        Ok(Product {
            id: ProductId::new(result.last_insert_rowid()),
            name: name.to_string(),
            price,
            stock,
            created_at,
        })
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value cannot be decoded.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = select_base()
            .and_where(Expr::col(Products::Id).eq(id.as_i64()))
            .to_string(SqliteQueryBuilder);

        let row = sqlx::query(&sql).fetch_optional(self.pool).await?;
        row.as_ref().map(product_from_row).transpose()
    }

    /// Fetch every product whose id is in the slice, ordered by id. Ids
    /// with no matching row are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value cannot be decoded.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = select_base()
            .and_where(Expr::col(Products::Id).is_in(ids.iter().map(|id| id.as_i64())))
            .order_by(Products::Id, Order::Asc)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        rows.iter().map(product_from_row).collect()
    }

    /// List products matching the filter, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value cannot be decoded.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let sql = select_base()
            .cond_where(filter.to_condition())
            .order_by(Products::Id, Order::Asc)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        rows.iter().map(product_from_row).collect()
    }

    /// Increment the stock of every product below the low-stock threshold
    /// by `amount`, in one transaction, and return the updated records.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement in the
    /// transaction fails.
    pub async fn restock_low_stock(&self, amount: i64) -> Result<Vec<Product>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let ids_sql = Query::select()
            .column(Products::Id)
            .from(Products::Table)
            .and_where(Expr::col(Products::Stock).lt(LOW_STOCK_THRESHOLD))
            .order_by(Products::Id, Order::Asc)
            .to_string(SqliteQueryBuilder);
        let rows = sqlx::query(&ids_sql).fetch_all(&mut *tx).await?;
        let ids: Vec<i64> = rows
            .iter()
            .map(|row| row.try_get("id"))
            .collect::<Result<_, _>>()?;

        if ids.is_empty() {
            tx.commit().await?;
            return Ok(Vec::new());
        }

        let update_sql = Query::update()
            .table(Products::Table)
            .value(Products::Stock, Expr::col(Products::Stock).add(amount))
            .and_where(Expr::col(Products::Id).is_in(ids.clone()))
            .to_string(SqliteQueryBuilder);
        sqlx::query(&update_sql).execute(&mut *tx).await?;

        let updated_sql = select_base()
            .and_where(Expr::col(Products::Id).is_in(ids))
            .order_by(Products::Id, Order::Asc)
            .to_string(SqliteQueryBuilder);
        let rows = sqlx::query(&updated_sql).fetch_all(&mut *tx).await?;
        let products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tx.commit().await?;
        Ok(products)
    }
}

fn select_base() -> SelectStatement {
    Query::select()
        .columns([
            Products::Id,
            Products::Name,
            Products::PriceCents,
            Products::Stock,
            Products::CreatedAt,
        ])
        .from(Products::Table)
        .take()
}

fn product_from_row(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let created_at: String = row.try_get("created_at")?;
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get("price_cents")?,
        stock: row.try_get("stock")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 22, 12, 0, 0).unwrap()
    }

    fn price(s: &str) -> Price {
        Price::parse(s.parse::<Decimal>().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo
            .create("Laptop", price("999.99"), 4, now())
            .await
            .unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Laptop");
        assert_eq!(fetched.price.to_string(), "999.99");
        assert_eq!(fetched.stock, 4);
        assert_eq!(fetched.created_at, now());
    }

    #[tokio::test]
    async fn test_get_many_skips_missing_ids() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        let a = repo.create("A", price("1.00"), 1, now()).await.unwrap();
        let b = repo.create("B", price("2.00"), 2, now()).await.unwrap();

        let found = repo
            .get_many(&[a.id, b.id, ProductId::new(999)])
            .await
            .unwrap();
        let ids: Vec<ProductId> = found.iter().map(|p| p.id).collect();
        assert_eq!(ids, [a.id, b.id]);
    }

    #[tokio::test]
    async fn test_restock_only_touches_low_stock_rows() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        let low = repo.create("Mouse", price("9.99"), 3, now()).await.unwrap();
        let edge = repo
            .create("Keyboard", price("19.99"), 9, now())
            .await
            .unwrap();
        let high = repo
            .create("Monitor", price("199.99"), 10, now())
            .await
            .unwrap();

        let updated = repo.restock_low_stock(10).await.unwrap();

        let ids: Vec<ProductId> = updated.iter().map(|p| p.id).collect();
        assert_eq!(ids, [low.id, edge.id]);
        let stocks: Vec<i64> = updated.iter().map(|p| p.stock).collect();
        assert_eq!(stocks, [13, 19]);

        let untouched = repo.get_by_id(high.id).await.unwrap().unwrap();
        assert_eq!(untouched.stock, 10);
    }

    #[tokio::test]
    async fn test_restock_with_no_low_stock_returns_empty() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        repo.create("Desk", price("89.00"), 50, now()).await.unwrap();

        let updated = repo.restock_low_stock(10).await.unwrap();
        assert!(updated.is_empty());
    }

    #[tokio::test]
    async fn test_list_with_low_stock_filter() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        repo.create("Cable", price("4.99"), 2, now()).await.unwrap();
        repo.create("Hub", price("24.99"), 40, now()).await.unwrap();

        let filter = ProductFilter {
            low_stock: Some(true),
            ..ProductFilter::default()
        };
        let low = repo.list(&filter).await.unwrap();

        assert_eq!(low.len(), 1);
        assert_eq!(low.first().map(|p| p.name.as_str()), Some("Cable"));
    }
}
