//! Business logic services for the CRM.
//!
//! # Services
//!
//! - `mutations` - validated write flows (customers, products, orders, restock)
//! - `queries` - filtered read flows

pub mod mutations;
pub mod queries;

pub use mutations::MutationService;
pub use queries::QueryService;
