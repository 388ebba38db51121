//! Catalog and stock payloads returned by the product API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Product display data from `GET /products/{id}`.
///
/// Older deployments of the product API use `title`/`image` instead of
/// `name`/`imageUrl`; both spellings are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(alias = "image")]
    pub image_url: String,
}

/// Available quantity from `GET /stock/{id}`. Never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub id: ProductId,
    pub amount: u32,
}

impl StockInfo {
    /// Whether `requested` units can be satisfied.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        requested <= self.amount
    }
}
