//! Sample data seeding.
//!
//! Populates a store with a small, fixed data set for demos and local
//! testing. Safe to run repeatedly: customers are matched by email,
//! products by name, and orders are only seeded into an empty order table.

use std::collections::HashSet;

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::instrument;

use copperline_core::ProductId;

use crate::db::{CustomerRepository, OrderRepository, ProductRepository};
use crate::error::MutationError;
use crate::filters::{CustomerFilter, OrderFilter, ProductFilter};
use crate::models::{CreateCustomerInput, CreateOrderInput, CreateProductInput};
use crate::services::MutationService;

/// Counts of records a seeding pass actually inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Customers inserted by this pass.
    pub customers_created: usize,
    /// Products inserted by this pass.
    pub products_created: usize,
    /// Orders inserted by this pass.
    pub orders_created: usize,
}

const SAMPLE_CUSTOMERS: [(&str, &str, &str); 5] = [
    ("Alice Johnson", "alice@example.com", "+1234567890"),
    ("Bob Smith", "bob@example.com", "123-456-7890"),
    ("Carol Williams", "carol@example.com", "+9876543210"),
    ("David Brown", "david@example.com", ""),
    ("Eve Davis", "eve@example.com", "555-123-4567"),
];

/// (name, price in cents, stock). Headphones start below the low-stock
/// threshold on purpose.
const SAMPLE_PRODUCTS: [(&str, i64, i64); 7] = [
    ("Laptop", 99_999, 10),
    ("Mouse", 2_999, 50),
    ("Keyboard", 7_999, 30),
    ("Monitor", 29_999, 15),
    ("Webcam", 8_999, 20),
    ("Headphones", 14_999, 5),
    ("USB Cable", 999, 100),
];

/// (customer index, product indexes) into the sample sets above.
const SAMPLE_ORDERS: [(usize, &[usize]); 4] = [
    (0, &[0, 1]),
    (1, &[2, 3]),
    (2, &[4]),
    (0, &[5, 6]),
];

/// Insert the built-in sample data set, skipping anything already present.
///
/// # Errors
///
/// Returns `MutationError` if an insert or lookup fails; already-present
/// records are not errors.
#[instrument(skip(pool))]
pub async fn seed_all(pool: &SqlitePool) -> Result<SeedSummary, MutationError> {
    let customers_created = seed_customers(pool).await?;
    let products_created = seed_products(pool).await?;
    let orders_created = seed_orders(pool).await?;

    tracing::info!(
        customers = customers_created,
        products = products_created,
        orders = orders_created,
        "Seeding finished"
    );

    Ok(SeedSummary {
        customers_created,
        products_created,
        orders_created,
    })
}

async fn seed_customers(pool: &SqlitePool) -> Result<usize, MutationError> {
    let service = MutationService::new(pool);
    let mut created = 0;

    for (name, email, phone) in SAMPLE_CUSTOMERS {
        let input = CreateCustomerInput {
            name: name.to_string(),
            email: email.to_string(),
            phone: Some(phone.to_string()),
        };
        match service.create_customer(input).await {
            Ok(_) => created += 1,
            Err(MutationError::DuplicateEmail(_)) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(created)
}

async fn seed_products(pool: &SqlitePool) -> Result<usize, MutationError> {
    let existing: HashSet<String> = ProductRepository::new(pool)
        .list(&ProductFilter::default())
        .await?
        .into_iter()
        .map(|product| product.name)
        .collect();

    let service = MutationService::new(pool);
    let mut created = 0;

    for (name, cents, stock) in SAMPLE_PRODUCTS {
        if existing.contains(name) {
            continue;
        }
        service
            .create_product(CreateProductInput {
                name: name.to_string(),
                price: Decimal::new(cents, 2),
                stock: Some(stock),
            })
            .await?;
        created += 1;
    }
    Ok(created)
}

async fn seed_orders(pool: &SqlitePool) -> Result<usize, MutationError> {
    if !OrderRepository::new(pool)
        .list(&OrderFilter::default())
        .await?
        .is_empty()
    {
        return Ok(0);
    }

    let customers = CustomerRepository::new(pool)
        .list(&CustomerFilter::default())
        .await?;
    let products = ProductRepository::new(pool)
        .list(&ProductFilter::default())
        .await?;

    let service = MutationService::new(pool);
    let mut created = 0;

    for (customer_index, product_indexes) in SAMPLE_ORDERS {
        let Some(customer) = customers.get(customer_index) else {
            continue;
        };
        let product_ids: Vec<ProductId> = product_indexes
            .iter()
            .filter_map(|&index| products.get(index).map(|product| product.id))
            .collect();
        if product_ids.is_empty() {
            continue;
        }
        service
            .create_order(CreateOrderInput {
                customer_id: customer.id,
                product_ids,
            })
            .await?;
        created += 1;
    }
    Ok(created)
}
