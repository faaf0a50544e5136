//! Customer persistence.

use chrono::{DateTime, Utc};
use sea_query::{Expr, Order, Query, SelectStatement, SqliteQueryBuilder};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use copperline_core::{CustomerId, Email, Phone};

use crate::db::schema::{Customers, Orders};
use crate::db::{RepositoryError, format_timestamp, parse_timestamp};
use crate::filters::CustomerFilter;
use crate::models::Customer;

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new repository with the given database pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a customer and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the email is already taken,
    /// or `RepositoryError::Database` for other query failures.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        phone: Option<&Phone>,
        created_at: DateTime<Utc>,
    ) -> Result<Customer, RepositoryError> {
        let sql = Query::insert()
            .into_table(Customers::Table)
            .columns([
                Customers::Name,
                Customers::Email,
                Customers::Phone,
                Customers::CreatedAt,
            ])
            .values_panic([
                name.into(),
                email.as_ref().into(),
                phone.map(|p| p.as_ref().to_string()).into(),
                format_timestamp(created_at).into(),
            ])
            .to_string(SqliteQueryBuilder);

        let result = sqlx::query(&sql)
            .execute(self.pool)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    RepositoryError::Conflict(format!("email '{email}' already exists"))
                }
                _ => RepositoryError::Database(err),
            })?;

        Ok(Customer {
            id: CustomerId::new(result.last_insert_rowid()),
            name: name.to_string(),
            email: email.clone(),
            phone: phone.cloned(),
            created_at,
        })
    }

    /// Whether a customer with this email already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let sql = Query::select()
            .expr(Expr::col(Customers::Id).count())
            .from(Customers::Table)
            .and_where(Expr::col(Customers::Email).eq(email.as_ref()))
            .to_string(SqliteQueryBuilder);

        let count: i64 = sqlx::query(&sql).fetch_one(self.pool).await?.try_get(0)?;
        Ok(count > 0)
    }

    /// Look up a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value cannot be decoded.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let sql = select_base()
            .and_where(Expr::col(Customers::Id).eq(id.as_i64()))
            .to_string(SqliteQueryBuilder);

        let row = sqlx::query(&sql).fetch_optional(self.pool).await?;
        row.as_ref().map(customer_from_row).transpose()
    }

    /// List customers matching the filter, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value cannot be decoded.
    pub async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, RepositoryError> {
        let sql = select_base()
            .cond_where(filter.to_condition())
            .order_by(Customers::Id, Order::Asc)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        rows.iter().map(customer_from_row).collect()
    }

    /// Total number of customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let sql = Query::select()
            .expr(Expr::col(Customers::Id).count())
            .from(Customers::Table)
            .to_string(SqliteQueryBuilder);

        Ok(sqlx::query(&sql).fetch_one(self.pool).await?.try_get(0)?)
    }

    /// Delete customers with no order on or after the cutoff and return the
    /// number removed. Customers who never ordered are included. Their
    /// orders and associations go with them via `ON DELETE CASCADE`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_without_orders_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let active = Query::select()
            .distinct()
            .column(Orders::CustomerId)
            .from(Orders::Table)
            .and_where(Expr::col(Orders::OrderDate).gte(format_timestamp(cutoff)))
            .take();

        let sql = Query::delete()
            .from_table(Customers::Table)
            .and_where(Expr::col(Customers::Id).not_in_subquery(active))
            .to_string(SqliteQueryBuilder);

        let result = sqlx::query(&sql).execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn select_base() -> SelectStatement {
    Query::select()
        .columns([
            Customers::Id,
            Customers::Name,
            Customers::Email,
            Customers::Phone,
            Customers::CreatedAt,
        ])
        .from(Customers::Table)
        .take()
}

fn customer_from_row(row: &SqliteRow) -> Result<Customer, RepositoryError> {
    let created_at: String = row.try_get("created_at")?;
    Ok(Customer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 22, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let pool = memory_pool().await;
        let repo = CustomerRepository::new(&pool);
        let email: Email = "alice@example.com".parse().unwrap();
        let phone: Phone = "+12345678901".parse().unwrap();

        let created = repo
            .create("Alice", &email, Some(&phone), at(10))
            .await
            .unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Alice");
        assert_eq!(fetched.email, email);
        assert_eq!(fetched.phone, Some(phone));
        assert_eq!(fetched.created_at, at(10));
    }

    #[tokio::test]
    async fn test_create_without_phone_stores_null() {
        let pool = memory_pool().await;
        let repo = CustomerRepository::new(&pool);
        let email: Email = "bob@example.com".parse().unwrap();

        let created = repo.create("Bob", &email, None, at(10)).await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.phone, None);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = memory_pool().await;
        let repo = CustomerRepository::new(&pool);
        let email: Email = "carol@example.com".parse().unwrap();

        repo.create("Carol", &email, None, at(10)).await.unwrap();
        let err = repo.create("Carol Again", &email, None, at(11)).await;

        assert!(matches!(err, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_email_exists() {
        let pool = memory_pool().await;
        let repo = CustomerRepository::new(&pool);
        let email: Email = "dave@example.com".parse().unwrap();

        assert!(!repo.email_exists(&email).await.unwrap());
        repo.create("Dave", &email, None, at(10)).await.unwrap();
        assert!(repo.email_exists(&email).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_none() {
        let pool = memory_pool().await;
        let repo = CustomerRepository::new(&pool);

        assert!(
            repo.get_by_id(CustomerId::new(999))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_name_substring() {
        let pool = memory_pool().await;
        let repo = CustomerRepository::new(&pool);

        for (name, email) in [
            ("Alice Johnson", "aj@example.com"),
            ("Bob Smith", "bs@example.com"),
            ("alison brown", "ab@example.com"),
        ] {
            repo.create(name, &email.parse().unwrap(), None, at(10))
                .await
                .unwrap();
        }

        let filter = CustomerFilter {
            name_icontains: Some("ALI".to_string()),
            ..CustomerFilter::default()
        };
        let matched = repo.list(&filter).await.unwrap();

        let names: Vec<&str> = matched.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Alice Johnson", "alison brown"]);
    }

    #[tokio::test]
    async fn test_delete_without_orders_since_removes_orderless() {
        let pool = memory_pool().await;
        let repo = CustomerRepository::new(&pool);

        repo.create("Eve", &"eve@example.com".parse().unwrap(), None, at(10))
            .await
            .unwrap();
        repo.create("Frank", &"frank@example.com".parse().unwrap(), None, at(11))
            .await
            .unwrap();

        let deleted = repo.delete_without_orders_since(at(0)).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
