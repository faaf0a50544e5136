//! Domain models for the CRM.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{BulkCreateResult, CreateCustomerInput, Customer};
pub use order::{CreateOrderInput, Order, OrderReminder};
pub use product::{CreateProductInput, Product, RestockResult, LOW_STOCK_THRESHOLD};
