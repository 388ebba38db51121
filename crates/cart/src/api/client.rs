//! HTTP implementation of the stock and catalog endpoints.

use std::sync::Arc;

use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, StockInfo};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, ProductCatalog, StockOracle};
use crate::config::ApiConfig;

const CACHE_CAPACITY: u64 = 1000;

/// Client for the product/stock API.
///
/// Cheap to clone; clones share the HTTP connection pool and catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    products: Option<Cache<ProductId, Product>>,
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &ApiConfig) -> Self {
        let products = config.product_cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(ttl)
                .build()
        });

        Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
                products,
            }),
        }
    }

    /// Drop every cached catalog entry.
    pub fn invalidate_products(&self) {
        if let Some(cache) = &self.inner.products {
            cache.invalidate_all();
        }
    }

    /// `GET` a path relative to the base URL and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.inner.base_url.join(path)?;

        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "Product API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse product API response"
            );
            ApiError::Parse(e)
        })
    }
}

impl StockOracle for ApiClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<StockInfo, ApiError> {
        let stock: StockInfo = self.get_json(&format!("stock/{id}")).await?;
        debug!(amount = stock.amount, "Fetched stock");
        Ok(stock)
    }
}

impl ProductCatalog for ApiClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        if let Some(cache) = &self.inner.products
            && let Some(product) = cache.get(&id).await
        {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{id}")).await?;

        if let Some(cache) = &self.inner.products {
            cache.insert(id, product.clone()).await;
        }

        Ok(product)
    }
}
