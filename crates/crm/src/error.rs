//! Mutation and job error types.
//!
//! Repository-level errors live in [`crate::db::RepositoryError`]; this
//! module layers the user-facing mutation taxonomy and the job runner
//! error on top.

use thiserror::Error;

use copperline_core::{CustomerId, EmailError, PhoneError, PriceError, ProductId};

use crate::db::RepositoryError;

/// Broad classification of a mutation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// A uniqueness rule was violated.
    Conflict,
    /// The storage layer failed.
    Internal,
}

/// Errors produced by the mutation service.
///
/// Messages are stable API surface; callers render them to end users.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The email address is malformed.
    #[error("Invalid email format")]
    InvalidEmail(#[source] EmailError),

    /// The email address is already taken by another customer.
    #[error("Email '{0}' already exists")]
    DuplicateEmail(String),

    /// The phone number matches no accepted format.
    #[error("Invalid phone number format. Use +1234567890 or 123-456-7890")]
    InvalidPhone(#[source] PhoneError),

    /// The price is not a valid positive two-decimal amount.
    #[error(transparent)]
    InvalidPrice(#[from] PriceError),

    /// The stock count is negative.
    #[error("Stock cannot be negative")]
    NegativeStock,

    /// The referenced customer does not exist.
    #[error("Customer with ID {0} does not exist")]
    CustomerNotFound(CustomerId),

    /// The order names no products at all.
    #[error("At least one product is required")]
    EmptyProductList,

    /// One or more referenced products do not exist.
    #[error("{}", format_missing_products(.0))]
    ProductsNotFound(Vec<ProductId>),

    /// The storage layer failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl MutationError {
    /// Classify this error into the coarse taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEmail(_)
            | Self::InvalidPhone(_)
            | Self::InvalidPrice(_)
            | Self::NegativeStock
            | Self::EmptyProductList => ErrorKind::Validation,
            Self::CustomerNotFound(_) | Self::ProductsNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateEmail(_) | Self::Repository(RepositoryError::Conflict(_)) => {
                ErrorKind::Conflict
            }
            Self::Repository(RepositoryError::NotFound) => ErrorKind::NotFound,
            Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

/// One clause per missing product, joined for a single message.
fn format_missing_products(ids: &[ProductId]) -> String {
    ids.iter()
        .map(|id| format!("Product with ID {id} does not exist"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A failure for one row of a bulk mutation.
#[derive(Debug, Error)]
#[error("Row {row}: {error}")]
pub struct BulkItemError {
    /// 1-based position of the failed row in the input.
    pub row: usize,
    /// What went wrong for that row.
    #[source]
    pub error: MutationError,
}

/// Errors produced by background jobs.
#[derive(Debug, Error)]
pub enum JobError {
    /// The storage layer failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Appending to the job's log sink failed.
    #[error("log sink error: {0}")]
    Sink(#[from] std::io::Error),

    /// A mutation invoked by the job failed.
    #[error("mutation error: {0}")]
    Mutation(#[from] MutationError),
}
