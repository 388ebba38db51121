//! Integration test support for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Tests run the real `ApiClient` and `FileStore` against
//! [`FakeProductApi`], an in-process `axum` server bound to an ephemeral
//! port that serves `/stock/{id}` and `/products/{id}`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_core::{Product, ProductId, StockInfo};
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use url::Url;

#[derive(Default)]
struct FakeState {
    products: Mutex<HashMap<i32, Product>>,
    stock: Mutex<HashMap<i32, u32>>,
    stock_failure: Mutex<Option<StatusCode>>,
    last_authorization: Mutex<Option<String>>,
    product_hits: AtomicUsize,
    stock_hits: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process product/stock API. Stops serving when dropped.
pub struct FakeProductApi {
    addr: SocketAddr,
    state: Arc<FakeState>,
    task: JoinHandle<()>,
}

impl FakeProductApi {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&state));

        #[allow(clippy::expect_used)]
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake product API");
        #[allow(clippy::expect_used)]
        let addr = listener.local_addr().expect("fake product API address");

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    /// Base URL to point `ApiConfig` at.
    ///
    /// # Panics
    ///
    /// Never in practice; the address is always a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        #[allow(clippy::expect_used)]
        Url::parse(&format!("http://{}/", self.addr)).expect("valid base URL")
    }

    /// Register a product with `stock` units available.
    pub fn add_product(&self, product: Product, stock: u32) {
        let id = product.id.as_i32();
        lock(&self.state.products).insert(id, product);
        lock(&self.state.stock).insert(id, stock);
    }

    pub fn set_stock(&self, id: i32, amount: u32) {
        lock(&self.state.stock).insert(id, amount);
    }

    /// Make `/stock/{id}` answer with `status` (or recover with `None`).
    pub fn fail_stock_with(&self, status: Option<StatusCode>) {
        *lock(&self.state.stock_failure) = status;
    }

    /// Number of `/products/{id}` requests served.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }

    /// Number of `/stock/{id}` requests served.
    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        lock(&self.state.last_authorization).clone()
    }
}

impl Drop for FakeProductApi {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn record_authorization(state: &FakeState, headers: &HeaderMap) {
    *lock(&state.last_authorization) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
}

async fn stock(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    record_authorization(&state, &headers);

    if let Some(status) = *lock(&state.stock_failure) {
        return (status, "stock service unavailable").into_response();
    }

    let amount = lock(&state.stock).get(&id).copied();
    match amount {
        Some(amount) => Json(StockInfo {
            id: ProductId::new(id),
            amount,
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    record_authorization(&state, &headers);

    let product = lock(&state.products).get(&id).cloned();
    match product {
        Some(product) => Json(product).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A catalog entry with predictable fields.
#[must_use]
pub fn sample_product(id: i32, price: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Tênis {id}"),
        price,
        image_url: format!("https://cdn.example/{id}.jpg"),
    }
}

/// A fresh storage file path in its own temp directory.
#[must_use]
pub fn temp_storage_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("rocketshoes_it_{}", uuid::Uuid::new_v4()))
        .join("storage.json")
}
