//! Filtered read flows.

use sqlx::SqlitePool;

use copperline_core::{CustomerId, OrderId, ProductId};

use crate::db::{CustomerRepository, OrderRepository, ProductRepository, RepositoryError};
use crate::filters::{CustomerFilter, OrderFilter, ProductFilter};
use crate::models::{Customer, Order, Product};

/// Read operations over the CRM store.
pub struct QueryService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> QueryService<'a> {
    /// Create a new service with the given database pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List customers matching the filter, oldest first.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn all_customers(
        &self,
        filter: &CustomerFilter,
    ) -> Result<Vec<Customer>, RepositoryError> {
        CustomerRepository::new(self.pool).list(filter).await
    }

    /// List products matching the filter, oldest first.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn all_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(self.pool).list(filter).await
    }

    /// List orders matching the filter, oldest first.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn all_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        OrderRepository::new(self.pool).list(filter).await
    }

    /// Look up one customer.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        CustomerRepository::new(self.pool).get_by_id(id).await
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(self.pool).get_by_id(id).await
    }

    /// Look up one order.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    pub async fn order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        OrderRepository::new(self.pool).get_by_id(id).await
    }
}
