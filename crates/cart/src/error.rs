//! Unified error handling for cart operations.
//!
//! Validation failures get their own variants. Everything else (network,
//! decoding, storage) is wrapped in [`CartError::Failed`] together with the
//! operation that was running, so the cause stays inspectable in logs while
//! users only see one consolidated notice per operation.

use core::fmt;

use rocketshoes_core::{CartInvariantError, ProductId};
use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// The three mutating cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateAmount,
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AddProduct => "add product",
            Self::RemoveProduct => "remove product",
            Self::UpdateAmount => "update amount",
        })
    }
}

/// Infrastructure failure behind a [`CartError::Failed`].
#[derive(Debug, Error)]
pub enum FailureCause {
    /// Product or stock API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading or writing the persisted cart failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The computed cart broke an invariant.
    #[error(transparent)]
    Invariant(#[from] CartInvariantError),
}

/// Cart-level error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds available stock.
    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// Operation targets a product absent from the cart.
    #[error("product {0} is not in the cart")]
    ProductNotInCart(ProductId),

    /// Requested quantity is non-positive.
    #[error("product {product_id}: invalid amount {amount}")]
    InvalidAmount { product_id: ProductId, amount: i64 },

    /// The persisted cart could not be loaded at startup.
    #[error("could not load stored cart under {key:?}: {source}")]
    Load {
        key: String,
        #[source]
        source: FailureCause,
    },

    /// Any other failure while running an operation.
    #[error("{operation} failed: {cause}")]
    Failed {
        operation: CartOperation,
        #[source]
        cause: FailureCause,
    },
}

impl CartError {
    /// Wrap an infrastructure failure with the operation it interrupted.
    pub fn failed(operation: CartOperation, cause: impl Into<FailureCause>) -> Self {
        Self::Failed {
            operation,
            cause: cause.into(),
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
