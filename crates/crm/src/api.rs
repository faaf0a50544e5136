//! Public entry point bundling the query and mutation surface.

use sqlx::SqlitePool;

use copperline_core::{CustomerId, OrderId, ProductId};

use crate::db::RepositoryError;
use crate::error::MutationError;
use crate::filters::{CustomerFilter, OrderFilter, ProductFilter};
use crate::models::{
    BulkCreateResult, CreateCustomerInput, CreateOrderInput, CreateProductInput, Customer, Order,
    Product, RestockResult,
};
use crate::services::{MutationService, QueryService};

/// Greeting returned by [`CrmApi::hello`].
pub const HELLO_MESSAGE: &str = "Hello, CRM!";

/// The CRM's query and mutation surface over one database pool.
///
/// Cloning is cheap; clones share the underlying pool.
#[derive(Clone)]
pub struct CrmApi {
    pool: SqlitePool,
}

impl CrmApi {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Static liveness greeting.
    #[must_use]
    pub const fn hello(&self) -> &'static str {
        HELLO_MESSAGE
    }

    /// Round-trip a trivial query to verify the store responds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` when the store is unreachable.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create a customer. See [`MutationService::create_customer`].
    ///
    /// # Errors
    ///
    /// Returns `MutationError` on invalid input or store failure.
    pub async fn create_customer(
        &self,
        input: CreateCustomerInput,
    ) -> Result<Customer, MutationError> {
        MutationService::new(&self.pool).create_customer(input).await
    }

    /// Create many customers at once. See
    /// [`MutationService::bulk_create_customers`].
    ///
    /// # Errors
    ///
    /// Returns `MutationError` only on store failure; bad rows are
    /// reported inside the result.
    pub async fn bulk_create_customers(
        &self,
        inputs: Vec<CreateCustomerInput>,
    ) -> Result<BulkCreateResult, MutationError> {
        MutationService::new(&self.pool)
            .bulk_create_customers(inputs)
            .await
    }

    /// Create a product. See [`MutationService::create_product`].
    ///
    /// # Errors
    ///
    /// Returns `MutationError` on invalid input or store failure.
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<Product, MutationError> {
        MutationService::new(&self.pool).create_product(input).await
    }

    /// Create an order. See [`MutationService::create_order`].
    ///
    /// # Errors
    ///
    /// Returns `MutationError` on invalid input or store failure.
    pub async fn create_order(&self, input: CreateOrderInput) -> Result<Order, MutationError> {
        MutationService::new(&self.pool).create_order(input).await
    }

    /// Top up low-stock products. See
    /// [`MutationService::restock_low_stock`].
    ///
    /// # Errors
    ///
    /// Returns `MutationError` on store failure.
    pub async fn restock_low_stock(&self) -> Result<RestockResult, MutationError> {
        MutationService::new(&self.pool).restock_low_stock().await
    }

    /// List customers matching the filter.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn all_customers(
        &self,
        filter: &CustomerFilter,
    ) -> Result<Vec<Customer>, RepositoryError> {
        QueryService::new(&self.pool).all_customers(filter).await
    }

    /// List products matching the filter.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn all_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        QueryService::new(&self.pool).all_products(filter).await
    }

    /// List orders matching the filter.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn all_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        QueryService::new(&self.pool).all_orders(filter).await
    }

    /// Look up one customer.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        QueryService::new(&self.pool).customer(id).await
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        QueryService::new(&self.pool).product(id).await
    }

    /// Look up one order.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        QueryService::new(&self.pool).order(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;

    #[tokio::test]
    async fn test_hello_greeting() {
        let api = CrmApi::new(memory_pool().await);
        assert_eq!(api.hello(), "Hello, CRM!");
    }

    #[tokio::test]
    async fn test_ping_succeeds_on_live_store() {
        let api = CrmApi::new(memory_pool().await);
        api.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_and_fetch_through_facade() {
        let api = CrmApi::new(memory_pool().await);

        let created = api
            .create_customer(CreateCustomerInput {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                phone: None,
            })
            .await
            .unwrap();

        let fetched = api.customer(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Alice");
    }
}
