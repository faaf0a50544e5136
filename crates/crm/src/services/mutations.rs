//! Validated write flows.
//!
//! Each mutation validates its input against the live store, writes
//! through the repositories, and maps storage conflicts back to the
//! user-facing error vocabulary.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use copperline_core::{Email, Phone, Price, ProductId};

use crate::db::{CustomerRepository, OrderRepository, ProductRepository, RepositoryError};
use crate::error::{BulkItemError, ErrorKind, MutationError};
use crate::models::{
    BulkCreateResult, CreateCustomerInput, CreateOrderInput, CreateProductInput, Customer, Order,
    Product, RestockResult,
};

/// Stock added to each low-stock product by a restock pass.
const RESTOCK_AMOUNT: i64 = 10;

/// Validated write operations over the CRM store.
pub struct MutationService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MutationService<'a> {
    /// Create a new service with the given database pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a customer after validating the email format, email
    /// uniqueness and phone format, in that order.
    ///
    /// A missing or empty phone string means no phone.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::InvalidEmail`, `DuplicateEmail` or
    /// `InvalidPhone` on bad input, or passes through repository errors.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_customer(
        &self,
        input: CreateCustomerInput,
    ) -> Result<Customer, MutationError> {
        let customers = CustomerRepository::new(self.pool);

        let email: Email = input.email.parse().map_err(MutationError::InvalidEmail)?;
        if customers.email_exists(&email).await? {
            return Err(MutationError::DuplicateEmail(email.to_string()));
        }
        let phone = match input.phone.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Phone>().map_err(MutationError::InvalidPhone)?),
        };

        let created = match customers
            .create(&input.name, &email, phone.as_ref(), Utc::now())
            .await
        {
            Ok(customer) => customer,
            // A concurrent insert can still hit the unique index.
            Err(RepositoryError::Conflict(_)) => {
                return Err(MutationError::DuplicateEmail(email.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(customer_id = %created.id, "Customer created");
        Ok(created)
    }

    /// Create many customers in one pass without failing the batch on
    /// individual bad rows.
    ///
    /// Each row goes through the same validation as [`Self::create_customer`].
    /// Failed rows are reported as `Row N: <reason>` with 1-based indices;
    /// the remaining rows are still inserted.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store itself fails; validation
    /// failures are collected per row instead.
    #[instrument(skip(self, inputs), fields(rows = inputs.len()))]
    pub async fn bulk_create_customers(
        &self,
        inputs: Vec<CreateCustomerInput>,
    ) -> Result<BulkCreateResult, MutationError> {
        let mut created = Vec::new();
        let mut errors = Vec::new();

        for (index, input) in inputs.into_iter().enumerate() {
            match self.create_customer(input).await {
                Ok(customer) => created.push(customer),
                Err(err) if matches!(err.kind(), ErrorKind::Validation | ErrorKind::Conflict) => {
                    errors.push(BulkItemError {
                        row: index + 1,
                        error: err,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        let message = if errors.is_empty() {
            format!("Created {} customers", created.len())
        } else {
            format!("Created {} customers, {} failed", created.len(), errors.len())
        };
        tracing::info!(
            created = created.len(),
            failed = errors.len(),
            "Bulk customer creation finished"
        );

        Ok(BulkCreateResult {
            created,
            errors,
            message,
        })
    }

    /// Create a product after validating price and stock.
    ///
    /// Stock defaults to zero when omitted.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::InvalidPrice` or `NegativeStock` on bad
    /// input, or passes through repository errors.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<Product, MutationError> {
        let price = Price::parse(input.price)?;
        let stock = input.stock.unwrap_or(0);
        if stock < 0 {
            return Err(MutationError::NegativeStock);
        }

        let created = ProductRepository::new(self.pool)
            .create(&input.name, price, stock, Utc::now())
            .await?;

        tracing::info!(product_id = %created.id, price = %created.price, "Product created");
        Ok(created)
    }

    /// Create an order for an existing customer over existing products.
    ///
    /// Duplicate product ids collapse to a single association, and the
    /// total is the sum of the distinct products' prices at creation time.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::CustomerNotFound`, `EmptyProductList` or
    /// `ProductsNotFound` on bad input, or passes through repository
    /// errors.
    #[instrument(skip(self, input), fields(customer_id = %input.customer_id))]
    pub async fn create_order(&self, input: CreateOrderInput) -> Result<Order, MutationError> {
        let customers = CustomerRepository::new(self.pool);
        let products = ProductRepository::new(self.pool);

        if customers.get_by_id(input.customer_id).await?.is_none() {
            return Err(MutationError::CustomerNotFound(input.customer_id));
        }
        if input.product_ids.is_empty() {
            return Err(MutationError::EmptyProductList);
        }

        let mut seen = HashSet::new();
        let mut unique: Vec<ProductId> = input
            .product_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let found = products.get_many(&unique).await?;
        if found.len() != unique.len() {
            let found_ids: HashSet<ProductId> = found.iter().map(|p| p.id).collect();
            let missing: Vec<ProductId> = unique
                .iter()
                .copied()
                .filter(|id| !found_ids.contains(id))
                .collect();
            return Err(MutationError::ProductsNotFound(missing));
        }

        let total_cents: i64 = found.iter().map(|p| p.price.as_cents()).sum();
        unique.sort_unstable();

        let created = OrderRepository::new(self.pool)
            .create(input.customer_id, &unique, total_cents, Utc::now())
            .await?;

        tracing::info!(order_id = %created.id, total = %created.total_amount, "Order created");
        Ok(created)
    }

    /// Top up every product below the low-stock threshold and describe
    /// the outcome.
    ///
    /// # Errors
    ///
    /// Passes through repository errors.
    #[instrument(skip(self))]
    pub async fn restock_low_stock(&self) -> Result<RestockResult, MutationError> {
        let products = ProductRepository::new(self.pool)
            .restock_low_stock(RESTOCK_AMOUNT)
            .await?;

        let message = if products.is_empty() {
            "No low-stock products found".to_string()
        } else {
            format!("Restocked {} low-stock products", products.len())
        };
        tracing::info!(restocked = products.len(), "Low-stock restock finished");

        Ok(RestockResult { products, message })
    }
}
