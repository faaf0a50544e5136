//! Typed listing filters, compiled to sea-query conditions.
//!
//! Each filter is a struct of `Option` fields; every set field contributes
//! exactly one predicate and predicates combine with AND. String matching
//! is case-insensitive substring (`LOWER` + `LIKE` with `\`-escaped
//! wildcards); numeric and date bounds are inclusive.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_query::{Condition, Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

use copperline_core::ProductId;

use crate::db::format_timestamp;
use crate::db::schema::{Customers, Orders, Products};
use crate::models::LOW_STOCK_THRESHOLD;

/// Filter for customer listings.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Case-insensitive substring of the name.
    pub name_icontains: Option<String>,
    /// Case-insensitive substring of the email.
    pub email_icontains: Option<String>,
    /// Created at or after this instant.
    pub created_at_gte: Option<DateTime<Utc>>,
    /// Created at or before this instant.
    pub created_at_lte: Option<DateTime<Utc>>,
    /// Phone starts with this prefix (e.g. `+1`).
    pub phone_prefix: Option<String>,
}

impl CustomerFilter {
    /// Compile into a sea-query condition over the customers table.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(needle) = &self.name_icontains {
            cond = cond.add(icontains(Customers::Name, needle));
        }
        if let Some(needle) = &self.email_icontains {
            cond = cond.add(icontains(Customers::Email, needle));
        }
        if let Some(at) = self.created_at_gte {
            cond = cond.add(Expr::col(Customers::CreatedAt).gte(format_timestamp(at)));
        }
        if let Some(at) = self.created_at_lte {
            cond = cond.add(Expr::col(Customers::CreatedAt).lte(format_timestamp(at)));
        }
        if let Some(prefix) = &self.phone_prefix {
            cond = cond.add(starts_with(Customers::Phone, prefix));
        }
        cond
    }
}

/// Filter for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the name.
    pub name_icontains: Option<String>,
    /// Price at or above this amount.
    pub price_gte: Option<Decimal>,
    /// Price at or below this amount.
    pub price_lte: Option<Decimal>,
    /// Stock at or above this count.
    pub stock_gte: Option<i64>,
    /// Stock at or below this count.
    pub stock_lte: Option<i64>,
    /// When `Some(true)`, only products with stock below the low-stock
    /// threshold. `Some(false)` and `None` add no predicate.
    pub low_stock: Option<bool>,
}

impl ProductFilter {
    /// Compile into a sea-query condition over the products table.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(needle) = &self.name_icontains {
            cond = cond.add(icontains(Products::Name, needle));
        }
        if let Some(amount) = self.price_gte {
            cond = cond.add(Expr::col(Products::PriceCents).gte(to_cents(amount)));
        }
        if let Some(amount) = self.price_lte {
            cond = cond.add(Expr::col(Products::PriceCents).lte(to_cents(amount)));
        }
        if let Some(stock) = self.stock_gte {
            cond = cond.add(Expr::col(Products::Stock).gte(stock));
        }
        if let Some(stock) = self.stock_lte {
            cond = cond.add(Expr::col(Products::Stock).lte(stock));
        }
        if self.low_stock == Some(true) {
            cond = cond.add(Expr::col(Products::Stock).lt(LOW_STOCK_THRESHOLD));
        }
        cond
    }
}

/// Filter for order listings.
///
/// The relation-backed fields (`customer_name_icontains`,
/// `product_name_icontains`, `product_id`) require joins; the order
/// repository adds them (and `DISTINCT`) when these fields are set.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Total at or above this amount.
    pub total_gte: Option<Decimal>,
    /// Total at or below this amount.
    pub total_lte: Option<Decimal>,
    /// Placed at or after this instant.
    pub order_date_gte: Option<DateTime<Utc>>,
    /// Placed at or before this instant.
    pub order_date_lte: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the customer's name.
    pub customer_name_icontains: Option<String>,
    /// Case-insensitive substring of any contained product's name.
    pub product_name_icontains: Option<String>,
    /// Order contains this exact product.
    pub product_id: Option<ProductId>,
}

impl OrderFilter {
    /// Compile into a sea-query condition; column references are
    /// table-qualified so the condition stays valid under joins.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(amount) = self.total_gte {
            cond = cond.add(Expr::col((Orders::Table, Orders::TotalCents)).gte(to_cents(amount)));
        }
        if let Some(amount) = self.total_lte {
            cond = cond.add(Expr::col((Orders::Table, Orders::TotalCents)).lte(to_cents(amount)));
        }
        if let Some(at) = self.order_date_gte {
            cond =
                cond.add(Expr::col((Orders::Table, Orders::OrderDate)).gte(format_timestamp(at)));
        }
        if let Some(at) = self.order_date_lte {
            cond =
                cond.add(Expr::col((Orders::Table, Orders::OrderDate)).lte(format_timestamp(at)));
        }
        if let Some(needle) = &self.customer_name_icontains {
            cond = cond.add(icontains((Customers::Table, Customers::Name), needle));
        }
        if let Some(needle) = &self.product_name_icontains {
            cond = cond.add(icontains((Products::Table, Products::Name), needle));
        }
        if let Some(id) = self.product_id {
            cond = cond.add(Expr::col((Products::Table, Products::Id)).eq(id.as_i64()));
        }
        cond
    }

    /// Whether listing needs a join onto customers.
    #[must_use]
    pub const fn needs_customer_join(&self) -> bool {
        self.customer_name_icontains.is_some()
    }

    /// Whether listing needs joins onto order_products/products.
    #[must_use]
    pub const fn needs_product_join(&self) -> bool {
        self.product_name_icontains.is_some() || self.product_id.is_some()
    }
}

/// `LOWER(col) LIKE '%needle%'` with `\`-escaped wildcards.
fn icontains<C: IntoColumnRef>(col: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Case-sensitive `col LIKE 'prefix%'` with `\`-escaped wildcards.
fn starts_with<C: IntoColumnRef>(col: C, prefix: &str) -> SimpleExpr {
    let pattern = format!("{}%", escape_like(prefix));
    Expr::col(col).like(LikeExpr::new(pattern).escape('\\'))
}

/// Escape `LIKE` wildcards and the escape character itself.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Convert a decimal filter bound to whole cents (banker's rounding past
/// two places, saturating outside the i64 range).
fn to_cents(amount: Decimal) -> i64 {
    let mut scaled = amount;
    scaled.rescale(2);
    let mantissa = scaled.mantissa();
    i64::try_from(mantissa).unwrap_or(if mantissa.is_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
