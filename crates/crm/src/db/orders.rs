//! Order persistence.
//!
//! An order spans two tables: the `orders` row (customer, date, cent
//! total) and its `order_products` association rows. Creation writes both
//! in one transaction; reads stitch them back together.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_query::{Expr, Query, SqliteQueryBuilder};
use sqlx::{Row, SqlitePool};

use copperline_core::{CustomerId, OrderId, ProductId};

use crate::db::schema::{Customers, OrderProducts, Orders, Products};
use crate::db::{RepositoryError, format_timestamp, parse_timestamp};
use crate::filters::OrderFilter;
use crate::models::{Order, OrderReminder};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new repository with the given database pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an order and its product associations in one transaction.
    ///
    /// The caller is responsible for referential checks and for computing
    /// the total; `product_ids` must already be deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement in the
    /// transaction fails.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        product_ids: &[ProductId],
        total_cents: i64,
        order_date: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_sql = Query::insert()
            .into_table(Orders::Table)
            .columns([Orders::CustomerId, Orders::OrderDate, Orders::TotalCents])
            .values_panic([
                customer_id.as_i64().into(),
                format_timestamp(order_date).into(),
                total_cents.into(),
            ])
            .to_string(SqliteQueryBuilder);
        let order_id = sqlx::query(&order_sql)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        if !product_ids.is_empty() {
            let mut assoc = Query::insert();
            assoc
                .into_table(OrderProducts::Table)
                .columns([OrderProducts::OrderId, OrderProducts::ProductId]);
            for pid in product_ids {
                assoc.values_panic([order_id.into(), pid.as_i64().into()]);
            }
            sqlx::query(&assoc.to_string(SqliteQueryBuilder))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Order {
            id: OrderId::new(order_id),
            customer_id,
            order_date,
            total_amount: Decimal::new(total_cents, 2),
            product_ids: product_ids.to_vec(),
        })
    }

    /// Look up an order by id, including its product ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored value cannot be decoded.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = Query::select()
            .columns([
                Orders::Id,
                Orders::CustomerId,
                Orders::OrderDate,
                Orders::TotalCents,
            ])
            .from(Orders::Table)
            .and_where(Expr::col(Orders::Id).eq(id.as_i64()))
            .to_string(SqliteQueryBuilder);

        let Some(row) = sqlx::query(&sql).fetch_optional(self.pool).await? else {
            return Ok(None);
        };

        let raw_id: i64 = row.try_get("id")?;
        let order_date: String = row.try_get("order_date")?;
        let total_cents: i64 = row.try_get("total_cents")?;
        let mut products = self.load_product_ids(&[raw_id]).await?;

        Ok(Some(Order {
            id: OrderId::new(raw_id),
            customer_id: row.try_get("customer_id")?,
            order_date: parse_timestamp(&order_date)?,
            total_amount: Decimal::new(total_cents, 2),
            product_ids: products.remove(&raw_id).unwrap_or_default(),
        }))
    }

    /// List orders matching the filter, oldest first.
    ///
    /// Relation-backed predicates pull in joins; the result is
    /// deduplicated with `DISTINCT` so an order matching through several
    /// products still appears once.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored value cannot be decoded.
    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let mut stmt = Query::select();
        stmt.columns([
            (Orders::Table, Orders::Id),
            (Orders::Table, Orders::CustomerId),
            (Orders::Table, Orders::OrderDate),
            (Orders::Table, Orders::TotalCents),
        ])
        .from(Orders::Table);

        if filter.needs_customer_join() {
            stmt.inner_join(
                Customers::Table,
                Expr::col((Orders::Table, Orders::CustomerId))
                    .equals((Customers::Table, Customers::Id)),
            );
        }
        if filter.needs_product_join() {
            stmt.inner_join(
                OrderProducts::Table,
                Expr::col((Orders::Table, Orders::Id))
                    .equals((OrderProducts::Table, OrderProducts::OrderId)),
            )
            .inner_join(
                Products::Table,
                Expr::col((OrderProducts::Table, OrderProducts::ProductId))
                    .equals((Products::Table, Products::Id)),
            )
            .distinct();
        }

        let sql = stmt
            .cond_where(filter.to_condition())
            .order_by((Orders::Table, Orders::Id), sea_query::Order::Asc)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        let mut heads = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row.try_get("id")?;
            let customer_id: CustomerId = row.try_get("customer_id")?;
            let order_date: String = row.try_get("order_date")?;
            let total_cents: i64 = row.try_get("total_cents")?;
            heads.push((id, customer_id, order_date, total_cents));
        }

        let ids: Vec<i64> = heads.iter().map(|(id, ..)| *id).collect();
        let mut products = self.load_product_ids(&ids).await?;

        let mut orders = Vec::with_capacity(heads.len());
        for (id, customer_id, order_date, total_cents) in heads {
            orders.push(Order {
                id: OrderId::new(id),
                customer_id,
                order_date: parse_timestamp(&order_date)?,
                total_amount: Decimal::new(total_cents, 2),
                product_ids: products.remove(&id).unwrap_or_default(),
            });
        }
        Ok(orders)
    }

    /// Orders placed on or after `since`, each paired with the owning
    /// customer's email. Used for order reminders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value cannot be decoded.
    pub async fn recent_with_customer_email(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<OrderReminder>, RepositoryError> {
        let sql = Query::select()
            .columns([
                (Orders::Table, Orders::Id),
                (Orders::Table, Orders::OrderDate),
            ])
            .column((Customers::Table, Customers::Email))
            .from(Orders::Table)
            .inner_join(
                Customers::Table,
                Expr::col((Orders::Table, Orders::CustomerId))
                    .equals((Customers::Table, Customers::Id)),
            )
            .and_where(Expr::col((Orders::Table, Orders::OrderDate)).gte(format_timestamp(since)))
            .order_by((Orders::Table, Orders::Id), sea_query::Order::Asc)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        let mut reminders = Vec::with_capacity(rows.len());
        for row in &rows {
            let order_date: String = row.try_get("order_date")?;
            reminders.push(OrderReminder {
                order_id: row.try_get("id")?,
                customer_email: row.try_get("email")?,
                order_date: parse_timestamp(&order_date)?,
            });
        }
        Ok(reminders)
    }

    async fn load_product_ids(
        &self,
        order_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<ProductId>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = Query::select()
            .columns([OrderProducts::OrderId, OrderProducts::ProductId])
            .from(OrderProducts::Table)
            .and_where(Expr::col(OrderProducts::OrderId).is_in(order_ids.iter().copied()))
            .order_by(OrderProducts::OrderId, sea_query::Order::Asc)
            .order_by(OrderProducts::ProductId, sea_query::Order::Asc)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        let mut map: HashMap<i64, Vec<ProductId>> = HashMap::new();
        for row in &rows {
            let order_id: i64 = row.try_get("order_id")?;
            let product_id: ProductId = row.try_get("product_id")?;
            map.entry(order_id).or_default().push(product_id);
        }
        Ok(map)
    }
}
