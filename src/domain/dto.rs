//! Wire-format DTOs. Field names are camelCase on the wire.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
}

/// Item DTO carrying denormalized category fields so list consumers never
/// need a second request. On writes only `category_id` is consulted;
/// `category_code` and `category_name` are ignored and repopulated from the
/// current category row on the way out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: Option<i64>,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_code: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
}
