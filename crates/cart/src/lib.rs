//! RocketShoes cart - client-side shopping-cart state manager.
//!
//! Holds the shopper's cart in memory, checks every quantity change
//! against the stock API, and writes the whole cart through to a durable
//! key-value store after each successful change.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartStore, TracingNotifier};
//! use rocketshoes_core::ProductId;
//!
//! let config = CartConfig::from_env()?;
//! let cart = CartStore::from_config(&config, TracingNotifier).await?;
//!
//! cart.add_product(ProductId::new(1)).await;
//! cart.update_product_amount(ProductId::new(1), 3).await;
//! cart.remove_product(ProductId::new(1)).await;
//!
//! for item in &cart.cart() {
//!     tracing::info!(id = %item.id, amount = item.amount, "In cart");
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use api::{ApiClient, ApiError, ProductCatalog, StockOracle};
pub use config::{ApiConfig, CartConfig, ConfigError, LoadPolicy};
pub use error::{CartError, CartOperation, FailureCause};
pub use notify::{CartNotice, ChannelNotifier, NoticeKind, Notifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartStore, StoreOptions};
