//! Database operations for the CRM `SQLite` store.
//!
//! ## Tables
//!
//! - `customers` - CRM customer records (unique email)
//! - `products` - catalog entries with integer cent prices and stock counts
//! - `orders` - one row per order, cent total denormalized at creation
//! - `order_products` - order/product associations
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC text so that
//! lexicographic comparison in SQL equals chronological comparison.
//! Money is stored as integer cents; [`copperline_core::Price`] converts
//! at the boundary.

pub mod customers;
pub mod orders;
pub mod products;
pub mod reports;
pub mod schema;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use reports::{ReportRepository, ReportTotals};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign keys are enabled on every pooled connection so that deleting a
/// customer cascades to their orders and associations.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create the schema if it does not exist yet.
///
/// Safe to call on every startup.
///
/// # Errors
///
/// Returns `sqlx::Error` if a DDL statement fails.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(schema::CREATE_CUSTOMERS_TABLE)
        .execute(pool)
        .await?;
    sqlx::query(schema::CREATE_PRODUCTS_TABLE)
        .execute(pool)
        .await?;
    sqlx::query(schema::CREATE_ORDERS_TABLE)
        .execute(pool)
        .await?;
    sqlx::query(schema::CREATE_ORDER_PRODUCTS_TABLE)
        .execute(pool)
        .await?;
    Ok(())
}

/// Timestamp layout written to the database: RFC 3339 UTC with fixed
/// microsecond precision, e.g. `2026-08-22T06:00:00.000000Z`.
const DB_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Encode a timestamp for storage.
///
/// The fixed-width layout keeps lexicographic `TEXT` comparison identical
/// to chronological comparison, which the date-bound filters rely on.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(DB_TIMESTAMP_FORMAT).to_string()
}

/// Decode a timestamp read from storage.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the stored text is not a
/// valid RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid timestamp in database: {e}")))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{SqliteConnectOptions, SqlitePoolOptions, SqlitePool, init_schema};
    use std::str::FromStr;

    /// Fresh in-memory database with the schema applied.
    ///
    /// Capped at one connection: every in-memory connection is its own
    /// database, so a larger pool would hand out empty databases.
    pub async fn memory_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid in-memory dsn")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("in-memory connect");
        init_schema(&pool).await.expect("schema init");
        pool
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_fixed_width() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 22, 6, 0, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2026-08-22T06:00:00.000000Z");
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 23, 59, 59).unwrap()
            + chrono::Duration::microseconds(123_456);
        let encoded = format_timestamp(ts);
        assert_eq!(parse_timestamp(&encoded).unwrap(), ts);
    }

    #[test]
    fn test_lexicographic_order_matches_chronological() {
        let earlier = Utc.with_ymd_and_hms(2026, 8, 22, 5, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 8, 22, 6, 0, 0).unwrap();
        assert!(format_timestamp(earlier) < format_timestamp(later));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("not a timestamp"),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
