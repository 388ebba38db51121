//! User-visible notices raised by cart operations.
//!
//! Cart operations never return errors to their callers. A failure becomes
//! a [`CartNotice`] handed to the store's [`Notifier`], which is where a UI
//! shows its toast. Successful operations are silent.

use core::fmt;

use rocketshoes_core::ProductId;
use tokio::sync::broadcast;

use crate::error::{CartError, CartOperation};

/// Kind of notice, one per user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    OutOfStock,
    ProductNotInCart,
    InvalidAmount,
    AddProductFailed,
    RemoveProductFailed,
    UpdateAmountFailed,
}

impl NoticeKind {
    /// Message shown to the shopper.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::OutOfStock => "Requested quantity is out of stock",
            Self::ProductNotInCart => "Product is not in the cart",
            Self::InvalidAmount => "Quantity must be at least 1",
            Self::AddProductFailed => "Could not add the product",
            Self::RemoveProductFailed => "Could not remove the product",
            Self::UpdateAmountFailed => "Could not update the product quantity",
        }
    }

    /// Catch-all kind for an operation.
    #[must_use]
    pub const fn failed(operation: CartOperation) -> Self {
        match operation {
            CartOperation::AddProduct => Self::AddProductFailed,
            CartOperation::RemoveProduct => Self::RemoveProductFailed,
            CartOperation::UpdateAmount => Self::UpdateAmountFailed,
        }
    }
}

/// A notice about one failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartNotice {
    pub kind: NoticeKind,
    pub product_id: ProductId,
    /// Underlying error, for logs. Not meant for shoppers.
    pub detail: String,
}

impl CartNotice {
    /// Consolidate an error raised while running `operation` on `product_id`.
    #[must_use]
    pub fn from_error(operation: CartOperation, product_id: ProductId, error: &CartError) -> Self {
        let kind = match error {
            CartError::OutOfStock { .. } => NoticeKind::OutOfStock,
            CartError::ProductNotInCart(_) => NoticeKind::ProductNotInCart,
            CartError::InvalidAmount { .. } => NoticeKind::InvalidAmount,
            // Delegated steps report under the operation that raised them.
            CartError::Failed { operation, .. } => NoticeKind::failed(*operation),
            CartError::Load { .. } => NoticeKind::failed(operation),
        };

        Self {
            kind,
            product_id,
            detail: error.to_string(),
        }
    }

    /// Message shown to the shopper.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl fmt::Display for CartNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Receiver of cart notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &CartNotice);
}

impl<F> Notifier for F
where
    F: Fn(&CartNotice) + Send + Sync,
{
    fn notify(&self, notice: &CartNotice) {
        self(notice);
    }
}

/// Logs every notice at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &CartNotice) {
        tracing::warn!(
            kind = ?notice.kind,
            product_id = %notice.product_id,
            detail = %notice.detail,
            "{}",
            notice.message()
        );
    }
}

/// Fans notices out to any number of subscribers.
///
/// Notices raised while nobody is subscribed are dropped.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: broadcast::Sender<CartNotice>,
}

impl ChannelNotifier {
    /// Create a notifier buffering up to `capacity` notices per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive notices raised from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartNotice> {
        self.sender.subscribe()
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::new(16)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: &CartNotice) {
        if self.sender.send(notice.clone()).is_err() {
            tracing::debug!(kind = ?notice.kind, "No notice subscribers");
        }
    }
}
