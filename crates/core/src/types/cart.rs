//! Cart line items and the cart itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// Errors raised when a list of items cannot form a valid [`Cart`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartInvariantError {
    /// Two lines share the same product.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
    /// A line has a zero quantity.
    #[error("product {0} has a zero amount")]
    ZeroAmount(ProductId),
}

/// One product line in the cart with its requested quantity.
///
/// Stored lines copy the catalog payload, so the legacy `title`/`image`
/// spellings accepted by [`Product`] are accepted here too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(alias = "image")]
    pub image_url: String,
    pub amount: u32,
}

impl CartItem {
    /// Build a line from catalog data.
    #[must_use]
    pub fn from_product(product: Product, amount: u32) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            amount,
        }
    }

    /// Line total (`price × amount`).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.amount)
    }
}

/// Ordered list of cart lines, at most one per product.
///
/// Serialized as a bare JSON array of [`CartItem`]. Deserialization runs the
/// same checks as [`Cart::from_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from existing lines, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error if a product appears twice or a line has amount zero.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, CartInvariantError> {
        let mut cart = Self::new();
        for item in items {
            cart.push(item)?;
        }
        Ok(cart)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line amounts.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Append a new line.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is already in the cart or the amount is zero.
    pub fn push(&mut self, item: CartItem) -> Result<(), CartInvariantError> {
        if item.amount == 0 {
            return Err(CartInvariantError::ZeroAmount(item.id));
        }
        if self.contains(item.id) {
            return Err(CartInvariantError::DuplicateProduct(item.id));
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove a product's line, keeping the order of the rest.
    pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Replace a product's amount. Returns `false` if the product is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is zero.
    pub fn set_amount(&mut self, id: ProductId, amount: u32) -> Result<bool, CartInvariantError> {
        if amount == 0 {
            return Err(CartInvariantError::ZeroAmount(id));
        }
        Ok(self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .map(|item| item.amount = amount)
            .is_some())
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartInvariantError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
