//! Persisted catalog entities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product category. `code` is unique (e.g. `ELEC`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// `None` until persisted.
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
}

/// A catalog item owned by exactly one category. `sku` is unique; price and
/// stock are non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    /// `None` until persisted.
    pub id: Option<i64>,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub description: Option<String>,
    pub category_id: i64,
}
