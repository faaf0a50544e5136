//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// Customers table schema.
#[derive(Iden)]
pub enum Customers {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "email"]
    Email,
    #[iden = "phone"]
    Phone,
    #[iden = "created_at"]
    CreatedAt,
}

/// Products table schema.
#[derive(Iden)]
pub enum Products {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "price_cents"]
    PriceCents,
    #[iden = "stock"]
    Stock,
    #[iden = "created_at"]
    CreatedAt,
}

/// Orders table schema.
#[derive(Iden)]
pub enum Orders {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "order_date"]
    OrderDate,
    #[iden = "total_cents"]
    TotalCents,
}

/// Order-product association table schema.
#[derive(Iden)]
pub enum OrderProducts {
    Table,
    #[iden = "order_id"]
    OrderId,
    #[iden = "product_id"]
    ProductId,
}

/// SQL for creating the customers table.
pub const CREATE_CUSTOMERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT,
    created_at TEXT NOT NULL
);
";

/// SQL for creating the products table.
pub const CREATE_PRODUCTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    price_cents INTEGER NOT NULL,
    stock INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
";

/// SQL for creating the orders table.
pub const CREATE_ORDERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    order_date TEXT NOT NULL,
    total_cents INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_orders_customer ON orders(customer_id);
CREATE INDEX IF NOT EXISTS idx_orders_order_date ON orders(order_date);
";

/// SQL for creating the order-product association table.
pub const CREATE_ORDER_PRODUCTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS order_products (
    order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    PRIMARY KEY (order_id, product_id)
);
";
