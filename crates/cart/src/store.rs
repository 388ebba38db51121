//! The cart store: in-memory cart with stock checks and write-through persistence.
//!
//! Every mutation validates against the stock API, writes the full cart to
//! the key-value store, and only then publishes the new cart in memory. A
//! failed write therefore leaves both copies on the previous cart.
//!
//! Mutations are serialized by a writer lock held across their network
//! calls, so each operation decides against a cart no other mutation can
//! change underneath it. Reads never wait on the writer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rocketshoes_core::{Cart, CartItem, ProductId};
use tokio::sync::{Mutex, watch};
use tracing::{debug, instrument};

use crate::api::{ApiClient, ProductCatalog, StockOracle};
use crate::config::{CartConfig, DEFAULT_STORAGE_KEY, LoadPolicy};
use crate::error::{CartError, CartOperation, FailureCause, Result};
use crate::notify::{CartNotice, Notifier, TracingNotifier};
use crate::storage::{FileStore, KeyValueStore, StorageError};

/// Where and how the cart is persisted.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Key the serialized cart lives under
    pub key: String,
    /// Startup behavior for an unreadable stored cart
    pub load_policy: LoadPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            load_policy: LoadPolicy::Strict,
        }
    }
}

/// Shopping cart bound to a product API, a key-value store, and a notifier.
///
/// Cheap to clone; clones share the same cart. Hand a clone to every
/// consumer that needs to read or change the cart.
pub struct CartStore<A, S, N = TracingNotifier> {
    inner: Arc<CartStoreInner<A, S, N>>,
}

struct CartStoreInner<A, S, N> {
    api: A,
    storage: S,
    notifier: N,
    key: String,
    state: watch::Sender<Cart>,
    version: AtomicU64,
    writer: Mutex<()>,
}

impl<A, S, N> Clone for CartStore<A, S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: Notifier> CartStore<ApiClient, FileStore, N> {
    /// Wire a store from configuration: HTTP client plus file-backed storage.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Load` if the storage file or the stored cart
    /// cannot be read (see [`CartStore::open`]).
    pub async fn from_config(config: &CartConfig, notifier: N) -> Result<Self> {
        let storage =
            FileStore::open(&config.storage_path)
                .await
                .map_err(|e| CartError::Load {
                    key: config.storage_key.clone(),
                    source: e.into(),
                })?;

        Self::open(
            ApiClient::new(&config.api),
            storage,
            notifier,
            StoreOptions {
                key: config.storage_key.clone(),
                load_policy: config.load_policy,
            },
        )
        .await
    }
}

impl<A, S, N> CartStore<A, S, N>
where
    A: StockOracle + ProductCatalog,
    S: KeyValueStore,
    N: Notifier,
{
    /// Load the cart from `storage` and build the store.
    ///
    /// An absent entry yields an empty cart. An entry that does not decode
    /// into a valid cart is an error under [`LoadPolicy::Strict`] and an
    /// empty cart under [`LoadPolicy::ResetOnCorrupt`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::Load` if the entry cannot be read, or cannot be
    /// decoded under the strict policy.
    #[instrument(skip(api, storage, notifier), fields(key = %options.key))]
    pub async fn open(api: A, storage: S, notifier: N, options: StoreOptions) -> Result<Self> {
        let StoreOptions { key, load_policy } = options;

        let raw = storage.get(&key).await.map_err(|e| CartError::Load {
            key: key.clone(),
            source: e.into(),
        })?;

        let cart = match raw {
            None => Cart::new(),
            Some(raw) => match serde_json::from_str::<Cart>(&raw) {
                Ok(cart) => cart,
                Err(source) if load_policy == LoadPolicy::ResetOnCorrupt => {
                    tracing::warn!(error = %source, "Stored cart is unreadable, starting empty");
                    Cart::new()
                }
                Err(source) => {
                    return Err(CartError::Load {
                        source: FailureCause::Storage(StorageError::Corrupt {
                            location: key.clone(),
                            source,
                        }),
                        key,
                    });
                }
            },
        };

        debug!(items = cart.len(), "Cart loaded");

        let (state, _) = watch::channel(cart);
        Ok(Self {
            inner: Arc::new(CartStoreInner {
                api,
                storage,
                notifier,
                key,
                state,
                version: AtomicU64::new(0),
                writer: Mutex::new(()),
            }),
        })
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.state.borrow().clone()
    }

    /// Watch the cart; the receiver sees every applied mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state.subscribe()
    }

    /// Number of mutations applied since the store was opened.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is added with amount 1 if it has any
    /// stock; with zero stock nothing happens and nothing is reported. A
    /// product already in the cart is incremented if stock allows.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) {
        let _writer = self.inner.writer.lock().await;
        if let Err(error) = self.try_add_product(product_id).await {
            self.report(CartOperation::AddProduct, product_id, &error);
        }
    }

    /// Remove a product's line.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) {
        let _writer = self.inner.writer.lock().await;
        if let Err(error) = self.try_remove_product(product_id).await {
            self.report(CartOperation::RemoveProduct, product_id, &error);
        }
    }

    /// Set a product's amount. `amount` is caller-supplied and may be out of range.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_product_amount(&self, product_id: ProductId, amount: i64) {
        let _writer = self.inner.writer.lock().await;
        if let Err(error) = self.try_update_amount(product_id, amount).await {
            self.report(CartOperation::UpdateAmount, product_id, &error);
        }
    }

    async fn try_add_product(&self, id: ProductId) -> Result<()> {
        let op = CartOperation::AddProduct;

        let stock = self
            .inner
            .api
            .stock(id)
            .await
            .map_err(|e| CartError::failed(op, e))?;
        let cart = self.cart();

        match cart.get(id).map(|item| item.amount) {
            None => {
                let product = self
                    .inner
                    .api
                    .product(id)
                    .await
                    .map_err(|e| CartError::failed(op, e))?;

                if stock.amount == 0 {
                    debug!("No stock for new product, nothing added");
                    return Ok(());
                }

                let mut next = cart;
                next.push(CartItem::from_product(product, 1))
                    .map_err(|e| CartError::failed(op, e))?;
                self.commit(op, next).await
            }
            Some(current) => {
                let requested = current.saturating_add(1);
                if !stock.covers(requested) {
                    return Err(CartError::OutOfStock {
                        product_id: id,
                        requested: i64::from(requested),
                        available: stock.amount,
                    });
                }
                self.try_update_amount(id, i64::from(requested)).await
            }
        }
    }

    async fn try_remove_product(&self, id: ProductId) -> Result<()> {
        let mut next = self.cart();
        if next.remove(id).is_none() {
            return Err(CartError::ProductNotInCart(id));
        }
        self.commit(CartOperation::RemoveProduct, next).await
    }

    async fn try_update_amount(&self, id: ProductId, amount: i64) -> Result<()> {
        let op = CartOperation::UpdateAmount;

        if !self.cart().contains(id) {
            return Err(CartError::ProductNotInCart(id));
        }

        let stock = self
            .inner
            .api
            .stock(id)
            .await
            .map_err(|e| CartError::failed(op, e))?;

        if amount < 1 {
            return Err(CartError::InvalidAmount {
                product_id: id,
                amount,
            });
        }
        let requested = amount;
        let amount = match u32::try_from(requested) {
            Ok(amount) if stock.covers(amount) => amount,
            _ => {
                return Err(CartError::OutOfStock {
                    product_id: id,
                    requested,
                    available: stock.amount,
                });
            }
        };

        let mut next = self.cart();
        next.set_amount(id, amount)
            .map_err(|e| CartError::failed(op, e))?;
        self.commit(op, next).await
    }

    /// Persist `next`, then publish it.
    async fn commit(&self, operation: CartOperation, next: Cart) -> Result<()> {
        let encoded = serde_json::to_string(&next)
            .map_err(|e| CartError::failed(operation, StorageError::Encode(e)))?;

        self.inner
            .storage
            .set(&self.inner.key, encoded)
            .await
            .map_err(|e| CartError::failed(operation, e))?;

        let version = self.inner.version.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(version, items = next.len(), "Cart saved");
        self.inner.state.send_replace(next);
        Ok(())
    }

    fn report(&self, operation: CartOperation, product_id: ProductId, error: &CartError) {
        match error {
            CartError::Failed { cause, .. } => {
                tracing::error!(%operation, %product_id, error = %error, cause = ?cause, "Cart operation failed");
            }
            _ => {
                tracing::info!(%operation, %product_id, error = %error, "Cart operation rejected");
            }
        }
        self.inner
            .notifier
            .notify(&CartNotice::from_error(operation, product_id, error));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    use rocketshoes_core::{Product, StockInfo};
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::ApiError;
    use crate::notify::NoticeKind;
    use crate::storage::MemoryStore;

    // =========================================================================
    // Fakes
    // =========================================================================

    #[derive(Default)]
    struct FakeApi {
        stock: StdMutex<HashMap<ProductId, u32>>,
        stock_down: AtomicBool,
        catalog_down: AtomicBool,
        stock_calls: AtomicUsize,
    }

    impl FakeApi {
        fn with_stock(stock: &[(i32, u32)]) -> Self {
            let api = Self::default();
            for &(id, amount) in stock {
                api.set_stock(id, amount);
            }
            api
        }

        fn set_stock(&self, id: i32, amount: u32) {
            self.stock.lock().unwrap().insert(ProductId::new(id), amount);
        }
    }

    impl StockOracle for FakeApi {
        async fn stock(&self, id: ProductId) -> std::result::Result<StockInfo, ApiError> {
            // Give overlapping operations a chance to interleave.
            tokio::task::yield_now().await;
            self.stock_calls.fetch_add(1, Ordering::SeqCst);
            if self.stock_down.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 503,
                    path: format!("stock/{id}"),
                });
            }
            let amount = self.stock.lock().unwrap().get(&id).copied();
            amount
                .map(|amount| StockInfo { id, amount })
                .ok_or_else(|| ApiError::NotFound(format!("stock/{id}")))
        }
    }

    impl ProductCatalog for FakeApi {
        async fn product(&self, id: ProductId) -> std::result::Result<Product, ApiError> {
            tokio::task::yield_now().await;
            if self.catalog_down.load(Ordering::SeqCst) {
                return Err(ApiError::NotFound(format!("products/{id}")));
            }
            Ok(Product {
                id,
                name: format!("Tênis {id}"),
                price: Decimal::new(1799, 1),
                image_url: format!("https://cdn.example/{id}.jpg"),
            })
        }
    }

    /// Memory store whose writes can be made to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> std::result::Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Io {
                    path: "quota".into(),
                    source: std::io::Error::other("storage quota exceeded"),
                });
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
            self.inner.remove(key).await
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<StdMutex<Vec<CartNotice>>>);

    impl Recorder {
        fn kinds(&self) -> Vec<NoticeKind> {
            self.0.lock().unwrap().iter().map(|n| n.kind).collect()
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, notice: &CartNotice) {
            self.0.lock().unwrap().push(notice.clone());
        }
    }

    type TestStore = CartStore<FakeApi, FlakyStore, Recorder>;

    fn seeded(stored: impl Into<String>) -> FlakyStore {
        FlakyStore {
            inner: MemoryStore::with_entry(DEFAULT_STORAGE_KEY, stored),
            ..FlakyStore::default()
        }
    }

    fn item(id: i32, amount: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Tênis {id}"),
            price: Decimal::new(1799, 1),
            image_url: format!("https://cdn.example/{id}.jpg"),
            amount,
        }
    }

    async fn store_with(items: Vec<CartItem>, stock: &[(i32, u32)]) -> (TestStore, Recorder) {
        let storage = if items.is_empty() {
            FlakyStore::default()
        } else {
            seeded(serde_json::to_string(&items).unwrap())
        };
        let recorder = Recorder::default();
        let store = CartStore::open(
            FakeApi::with_stock(stock),
            storage,
            recorder.clone(),
            StoreOptions::default(),
        )
        .await
        .unwrap();
        (store, recorder)
    }

    fn persisted(store: &TestStore) -> Cart {
        let raw = store
            .inner
            .storage
            .inner
            .snapshot(DEFAULT_STORAGE_KEY)
            .unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[tokio::test]
    async fn test_open_without_entry_is_empty() {
        let (store, _) = store_with(vec![], &[]).await;
        assert!(store.cart().is_empty());
        assert_eq!(store.version(), 0);
    }

    #[tokio::test]
    async fn test_open_restores_stored_cart() {
        let (store, _) = store_with(vec![item(2, 1), item(1, 3)], &[]).await;
        assert_eq!(store.cart().items(), &[item(2, 1), item(1, 3)]);
    }

    #[tokio::test]
    async fn test_open_strict_rejects_corrupt_entry() {
        let result = CartStore::open(
            FakeApi::default(),
            seeded("{oops"),
            Recorder::default(),
            StoreOptions::default(),
        )
        .await;
        assert!(matches!(result, Err(CartError::Load { .. })));
    }

    #[tokio::test]
    async fn test_open_reset_on_corrupt_starts_empty() {
        let duplicated = serde_json::to_string(&vec![item(1, 1), item(1, 2)]).unwrap();

        let store = CartStore::open(
            FakeApi::default(),
            seeded(duplicated),
            Recorder::default(),
            StoreOptions {
                load_policy: LoadPolicy::ResetOnCorrupt,
                ..StoreOptions::default()
            },
        )
        .await
        .unwrap();
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_open_restores_cart_with_legacy_field_names() {
        let legacy = r#"[{"id":1,"title":"Tênis 1","price":179.9,"image":"https://cdn.example/1.jpg","amount":3}]"#;

        let store = CartStore::open(
            FakeApi::default(),
            seeded(legacy),
            Recorder::default(),
            StoreOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(store.cart().items(), &[item(1, 3)]);
    }

    // =========================================================================
    // add_product
    // =========================================================================

    #[tokio::test]
    async fn test_add_new_product_with_stock() {
        let (store, notices) = store_with(vec![item(2, 1)], &[(1, 3)]).await;

        store.add_product(id(1)).await;

        let cart = store.cart();
        assert_eq!(cart.items(), &[item(2, 1), item(1, 1)]);
        assert_eq!(persisted(&store), cart);
        assert_eq!(store.version(), 1);
        assert!(notices.kinds().is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_increments() {
        let (store, notices) = store_with(vec![item(1, 1)], &[(1, 5)]).await;

        store.add_product(id(1)).await;

        assert_eq!(store.cart().items(), &[item(1, 2)]);
        assert_eq!(persisted(&store).items(), &[item(1, 2)]);
        assert!(notices.kinds().is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_at_stock_limit() {
        let (store, notices) = store_with(vec![item(1, 5)], &[(1, 5)]).await;

        store.add_product(id(1)).await;

        assert_eq!(store.cart().items(), &[item(1, 5)]);
        assert_eq!(store.version(), 0);
        assert_eq!(notices.kinds(), vec![NoticeKind::OutOfStock]);
    }

    #[tokio::test]
    async fn test_add_new_product_without_stock_is_silent() {
        let (store, notices) = store_with(vec![], &[(1, 0)]).await;

        store.add_product(id(1)).await;

        assert!(store.cart().is_empty());
        assert!(store.inner.storage.inner.snapshot(DEFAULT_STORAGE_KEY).is_none());
        assert!(notices.kinds().is_empty());
    }

    #[tokio::test]
    async fn test_add_with_stock_api_down() {
        let (store, notices) = store_with(vec![], &[(1, 3)]).await;
        store.inner.api.stock_down.store(true, Ordering::SeqCst);

        store.add_product(id(1)).await;

        assert!(store.cart().is_empty());
        assert_eq!(notices.kinds(), vec![NoticeKind::AddProductFailed]);
    }

    #[tokio::test]
    async fn test_add_with_catalog_down() {
        let (store, notices) = store_with(vec![], &[(1, 3)]).await;
        store.inner.api.catalog_down.store(true, Ordering::SeqCst);

        store.add_product(id(1)).await;

        assert!(store.cart().is_empty());
        assert_eq!(notices.kinds(), vec![NoticeKind::AddProductFailed]);
    }

    #[tokio::test]
    async fn test_add_new_product_with_failing_storage() {
        let (store, notices) = store_with(vec![], &[(1, 3)]).await;
        store.inner.storage.fail_writes.store(true, Ordering::SeqCst);

        store.add_product(id(1)).await;

        assert!(store.cart().is_empty());
        assert_eq!(store.inner.storage.inner.snapshot(DEFAULT_STORAGE_KEY), None);
        assert_eq!(store.version(), 0);
        assert_eq!(notices.kinds(), vec![NoticeKind::AddProductFailed]);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let (store, notices) = store_with(vec![], &[]).await;

        store.add_product(id(42)).await;

        assert!(store.cart().is_empty());
        assert_eq!(notices.kinds(), vec![NoticeKind::AddProductFailed]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_do_not_lose_updates() {
        let (store, notices) = store_with(vec![item(1, 1)], &[(1, 5)]).await;

        tokio::join!(store.add_product(id(1)), store.add_product(id(1)));

        assert_eq!(store.cart().items(), &[item(1, 3)]);
        assert_eq!(persisted(&store).items(), &[item(1, 3)]);
        assert_eq!(store.version(), 2);
        assert!(notices.kinds().is_empty());
    }

    // =========================================================================
    // remove_product
    // =========================================================================

    #[tokio::test]
    async fn test_remove_present_product() {
        let (store, notices) = store_with(vec![item(1, 1), item(2, 4), item(3, 2)], &[]).await;

        store.remove_product(id(2)).await;

        assert_eq!(store.cart().items(), &[item(1, 1), item(3, 2)]);
        assert_eq!(persisted(&store), store.cart());
        assert_eq!(store.inner.api.stock_calls.load(Ordering::SeqCst), 0);
        assert!(notices.kinds().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_product() {
        let (store, notices) = store_with(vec![item(1, 1)], &[]).await;

        store.remove_product(id(2)).await;

        assert_eq!(store.cart().items(), &[item(1, 1)]);
        assert_eq!(notices.kinds(), vec![NoticeKind::ProductNotInCart]);
    }

    #[tokio::test]
    async fn test_remove_with_failing_storage_keeps_cart() {
        let (store, notices) = store_with(vec![item(1, 1)], &[]).await;
        store.inner.storage.fail_writes.store(true, Ordering::SeqCst);

        store.remove_product(id(1)).await;

        assert_eq!(store.cart().items(), &[item(1, 1)]);
        assert_eq!(persisted(&store).items(), &[item(1, 1)]);
        assert_eq!(store.version(), 0);
        assert_eq!(notices.kinds(), vec![NoticeKind::RemoveProductFailed]);
    }

    // =========================================================================
    // update_product_amount
    // =========================================================================

    #[tokio::test]
    async fn test_update_within_stock() {
        let (store, notices) = store_with(vec![item(1, 1), item(2, 1)], &[(1, 5), (2, 5)]).await;

        store.update_product_amount(id(1), 4).await;

        assert_eq!(store.cart().items(), &[item(1, 4), item(2, 1)]);
        assert_eq!(persisted(&store), store.cart());
        assert!(notices.kinds().is_empty());
    }

    #[tokio::test]
    async fn test_update_to_non_positive_amount() {
        let (store, notices) = store_with(vec![item(1, 2)], &[(1, 5)]).await;

        store.update_product_amount(id(1), 0).await;
        store.update_product_amount(id(1), -3).await;

        assert_eq!(store.cart().items(), &[item(1, 2)]);
        assert_eq!(
            notices.kinds(),
            vec![NoticeKind::InvalidAmount, NoticeKind::InvalidAmount]
        );
    }

    #[tokio::test]
    async fn test_update_beyond_stock() {
        let (store, notices) = store_with(vec![item(1, 2)], &[(1, 5)]).await;

        store.update_product_amount(id(1), 6).await;
        store.update_product_amount(id(1), i64::MAX).await;

        assert_eq!(store.cart().items(), &[item(1, 2)]);
        assert_eq!(
            notices.kinds(),
            vec![NoticeKind::OutOfStock, NoticeKind::OutOfStock]
        );
    }

    #[tokio::test]
    async fn test_update_absent_product_skips_stock_check() {
        let (store, notices) = store_with(vec![item(1, 2)], &[(2, 5)]).await;

        store.update_product_amount(id(2), 1).await;

        assert_eq!(store.inner.api.stock_calls.load(Ordering::SeqCst), 0);
        assert_eq!(notices.kinds(), vec![NoticeKind::ProductNotInCart]);
    }

    #[tokio::test]
    async fn test_update_with_stock_api_down() {
        let (store, notices) = store_with(vec![item(1, 2)], &[(1, 5)]).await;
        store.inner.api.stock_down.store(true, Ordering::SeqCst);

        store.update_product_amount(id(1), 3).await;

        assert_eq!(store.cart().items(), &[item(1, 2)]);
        assert_eq!(notices.kinds(), vec![NoticeKind::UpdateAmountFailed]);
    }

    #[tokio::test]
    async fn test_add_reports_delegated_storage_failure_as_update() {
        let (store, notices) = store_with(vec![item(1, 1)], &[(1, 5)]).await;
        store.inner.storage.fail_writes.store(true, Ordering::SeqCst);

        store.add_product(id(1)).await;

        assert_eq!(store.cart().items(), &[item(1, 1)]);
        assert_eq!(notices.kinds(), vec![NoticeKind::UpdateAmountFailed]);
    }

    // =========================================================================
    // Observation
    // =========================================================================

    #[tokio::test]
    async fn test_subscribers_see_mutations() {
        let (store, _) = store_with(vec![], &[(1, 2)]).await;
        let mut rx = store.subscribe();

        store.add_product(id(1)).await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().items(), &[item(1, 1)]);

        store.remove_product(id(9)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let (store, _) = store_with(vec![], &[(1, 2)]).await;
        let other = store.clone();

        other.add_product(id(1)).await;

        assert_eq!(store.cart(), other.cart());
        assert_eq!(store.version(), 1);
    }
}
