//! Cart
//!
//! The shopper's chosen items. A [`Cart`] is plain data with derived totals; all mutation goes
//! through [`store::CartStore`], which persists and broadcasts every change.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::pricing::{self, PricingError};

pub mod checkout;
pub mod snapshot;
pub mod storage;
pub mod store;

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities passed to `add_item` must be at least 1.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// The product id does not resolve against the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// The quantity for a product would exceed `u32::MAX`.
    #[error("quantity for product {0} is too large")]
    QuantityOverflow(String),

    /// The snapshot could not be written to storage.
    #[error("failed to persist cart: {0}")]
    PersistenceWriteFailed(#[source] storage::StorageError),

    /// The snapshot could not be encoded.
    #[error("failed to encode cart snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A product line in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    product_id: String,
    quantity: u32,
    unit_price: Money<'a, Currency>,
}

impl<'a> CartItem<'a> {
    /// Identifier of the product this line refers to.
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Number of units, always at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Effective price captured when the product was first added.
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// `quantity × unit_price`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, PricingError> {
        pricing::line_total(self.unit_price, self.quantity)
    }
}

/// Cart
///
/// Lines keep the order products were first added in; there is at most one line per product.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart<'a> {
    items: IndexMap<String, CartItem<'a>, FxBuildHasher>,
    currency: &'a Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            items: IndexMap::default(),
            currency,
        }
    }

    /// Iterate over the lines in the order they were added.
    pub fn items(&self) -> impl Iterator<Item = &CartItem<'a>> {
        self.items.values()
    }

    /// Get the line for a product.
    pub fn get(&self, product_id: &str) -> Option<&CartItem<'a>> {
        self.items.get(product_id)
    }

    /// Whether the product is in the cart.
    pub fn contains(&self, product_id: &str) -> bool {
        self.items.contains_key(product_id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency of every line.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u64 {
        self.items.values().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of all line totals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total does not fit in minor units.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        let line_totals = self
            .items
            .values()
            .map(CartItem::line_total)
            .collect::<Result<Vec<_>, _>>()?;

        pricing::sum(self.currency, line_totals)
    }

    /// Add units of a product, creating the line at `unit_price` if it is missing.
    ///
    /// An existing line keeps its original unit price. Returns the new quantity.
    pub(crate) fn add(
        &mut self,
        product_id: &str,
        quantity: u32,
        unit_price: Money<'a, Currency>,
    ) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        if let Some(item) = self.items.get_mut(product_id) {
            item.quantity = item
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(product_id.to_string()))?;

            return Ok(item.quantity);
        }

        self.items.insert(
            product_id.to_string(),
            CartItem {
                product_id: product_id.to_string(),
                quantity,
                unit_price,
            },
        );

        Ok(quantity)
    }

    /// Set the quantity of an existing line; `0` removes it. Missing products are ignored.
    ///
    /// Returns the previous quantity if the product was in the cart.
    pub(crate) fn set_quantity(&mut self, product_id: &str, quantity: u32) -> Option<u32> {
        if quantity == 0 {
            return self.remove(product_id).map(|item| item.quantity);
        }

        let item = self.items.get_mut(product_id)?;

        Some(std::mem::replace(&mut item.quantity, quantity))
    }

    /// Remove a line, keeping the order of the others.
    pub(crate) fn remove(&mut self, product_id: &str) -> Option<CartItem<'a>> {
        self.items.shift_remove(product_id)
    }

    /// Remove every line.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_cart_is_empty() -> TestResult {
        let cart = Cart::new(USD);

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal()?, Money::from_minor(0, USD));
        assert_eq!(cart.currency(), USD);

        Ok(())
    }

    #[test]
    fn adding_twice_increments_the_same_line() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add("p1", 1, Money::from_minor(5_00, USD))?;
        let quantity = cart.add("p1", 2, Money::from_minor(7_00, USD))?;

        assert_eq!(quantity, 3);
        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.get("p1").map(CartItem::unit_price),
            Some(Money::from_minor(5_00, USD))
        );

        Ok(())
    }

    #[test]
    fn add_rejects_zero_quantity() {
        let mut cart = Cart::new(USD);

        let result = cart.add("p1", 0, Money::from_minor(5_00, USD));

        assert!(matches!(result, Err(CartError::InvalidQuantity(0))));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_rejects_quantity_overflow() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add("p1", u32::MAX, Money::from_minor(1, USD))?;
        let result = cart.add("p1", 1, Money::from_minor(1, USD));

        assert!(matches!(result, Err(CartError::QuantityOverflow(id)) if id == "p1"));
        assert_eq!(cart.get("p1").map(CartItem::quantity), Some(u32::MAX));

        Ok(())
    }

    #[test]
    fn totals_follow_lines() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add("a", 2, Money::from_minor(8_00, USD))?;
        cart.add("b", 3, Money::from_minor(1_50, USD))?;

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.subtotal()?, Money::from_minor(20_50, USD));

        Ok(())
    }

    #[test]
    fn set_quantity_replaces_and_zero_removes() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add("a", 2, Money::from_minor(1_00, USD))?;

        assert_eq!(cart.set_quantity("a", 5), Some(2));
        assert_eq!(cart.total_items(), 5);

        assert_eq!(cart.set_quantity("a", 0), Some(5));
        assert!(!cart.contains("a"));

        assert_eq!(cart.set_quantity("missing", 4), None);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn remove_keeps_order_of_remaining_lines() -> TestResult {
        let mut cart = Cart::new(USD);

        for id in ["a", "b", "c"] {
            cart.add(id, 1, Money::from_minor(1_00, USD))?;
        }

        cart.remove("b");

        let ids: Vec<&str> = cart.items().map(CartItem::product_id).collect();

        assert_eq!(ids, ["a", "c"]);

        cart.clear();
        assert!(cart.is_empty());

        Ok(())
    }
}
