//! Product domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use copperline_core::{Price, ProductId};

/// Stock level below which a product counts as low-stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Units in stock.
    pub stock: i64,
    /// When the product record was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductInput {
    /// Display name.
    pub name: String,
    /// Unit price; must be positive with at most two decimal places.
    pub price: Decimal,
    /// Initial stock count; defaults to 0 when absent.
    pub stock: Option<i64>,
}

/// Outcome of a low-stock restock run.
#[derive(Debug)]
pub struct RestockResult {
    /// Products that received stock, with post-update stock counts.
    pub products: Vec<Product>,
    /// Human-readable summary, e.g. `Restocked 2 low-stock products`.
    pub message: String,
}
