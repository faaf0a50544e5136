//! Order domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use copperline_core::{CustomerId, Email, OrderId, ProductId};

/// A placed order.
///
/// Orders are immutable once created; `total_amount` is the sum of the
/// referenced products' prices at creation time and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer who placed the order.
    pub customer_id: CustomerId,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
    /// Order total, denormalized at creation.
    pub total_amount: Decimal,
    /// Distinct products in the order, in insertion order.
    pub product_ids: Vec<ProductId>,
}

/// Input for creating an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderInput {
    /// Customer placing the order.
    pub customer_id: CustomerId,
    /// Products to include; must name at least one existing product.
    /// Duplicates collapse to a single association.
    pub product_ids: Vec<ProductId>,
}

/// A recent order joined with its customer's email, for reminder runs.
#[derive(Debug, Clone)]
pub struct OrderReminder {
    /// The order to remind about.
    pub order_id: OrderId,
    /// Email of the customer who placed it.
    pub customer_email: Email,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
}
