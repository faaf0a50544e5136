//! Customer domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use copperline_core::{CustomerId, Email, Phone};

use crate::error::BulkItemError;

/// A CRM customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Email address, unique across customers.
    pub email: Email,
    /// Optional phone number.
    pub phone: Option<Phone>,
    /// When the customer record was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a customer.
///
/// Fields are raw strings; the mutation service validates them. An empty
/// phone string is treated the same as an absent one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerInput {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
}

/// Outcome of a bulk customer creation.
///
/// Partial success is a normal result shape: some rows may land in
/// `created` while others land in `errors`.
#[derive(Debug)]
pub struct BulkCreateResult {
    /// Customers created, in input order.
    pub created: Vec<Customer>,
    /// Per-row failures, in input order.
    pub errors: Vec<BulkItemError>,
    /// Human-readable summary, e.g. `Created 2 customers, 1 failed`.
    pub message: String,
}
