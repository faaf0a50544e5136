//! Integration tests for Copperline CRM.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p copperline-integration-tests
//! ```
//!
//! Every test runs against its own in-memory `SQLite` store, so the
//! suite needs no external services and leaves nothing behind.
//!
//! # Test Categories
//!
//! - `api_mutations` - Mutation paths through the `CrmApi` facade
//! - `api_queries` - Filtered queries through the `CrmApi` facade
//! - `jobs` - Scheduled jobs run against captured log sinks
//! - `seeding` - Sample data seeding

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use copperline_crm::api::CrmApi;
use copperline_crm::db;

/// Fresh in-memory store with the schema applied.
///
/// Capped at one connection: every in-memory connection is its own
/// database, so a larger pool would hand out empty databases.
///
/// # Panics
///
/// Panics if the store cannot be created; no test can run without it.
pub async fn memory_store() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Failed to parse in-memory connection string")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory store");

    db::init_schema(&pool)
        .await
        .expect("Failed to apply schema");
    pool
}

/// Fresh in-memory store wrapped in the API facade.
///
/// # Panics
///
/// Panics if the store cannot be created.
pub async fn memory_api() -> CrmApi {
    CrmApi::new(memory_store().await)
}
