//! Product catalog and stock API.
//!
//! # Architecture
//!
//! - [`StockOracle`] and [`ProductCatalog`] are the seams the cart store
//!   depends on; tests substitute in-memory fakes
//! - [`ApiClient`] implements both over plain JSON `GET` requests with `reqwest`
//! - Catalog responses are cached in memory via `moka`; stock never is
//!
//! # Endpoints
//!
//! - `GET {base}/stock/{id}` → `{ "id": 1, "amount": 3 }`
//! - `GET {base}/products/{id}` → `{ "id": 1, "name": "...", "price": 179.9, "imageUrl": "..." }`

mod client;

pub use client::ApiClient;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, StockInfo};
use thiserror::Error;

/// Errors that can occur when talking to the product API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status} from {path}")]
    Status {
        /// Response status code.
        status: u16,
        /// Request path relative to the base URL.
        path: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Source of available quantities.
pub trait StockOracle: Send + Sync {
    /// Current stock for a product.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<StockInfo, ApiError>> + Send;
}

/// Source of product display data.
pub trait ProductCatalog: Send + Sync {
    /// Display data for a product.
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send;
}
