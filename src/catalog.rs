//! Catalog
//!
//! The read-only, ordered product list supplied once per session.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    filters::PriceRange,
    products::{Category, Product, ProductError, ProductKey},
    tags::{collection::TagCollection, string::StringTagCollection},
};

/// Errors raised while assembling a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share an identifier.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),

    /// A product breaks its invariants.
    #[error(transparent)]
    InvalidProduct(#[from] ProductError),

    /// A product is priced in a different currency from the catalog (product, product currency,
    /// catalog currency).
    #[error("product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// No product with the given identifier.
    #[error("product not found: {0}")]
    ProductNotFound(String),
}

/// Catalog
#[derive(Debug)]
pub struct Catalog<'a, T: TagCollection = StringTagCollection> {
    products: SlotMap<ProductKey, Product<'a, T>>,
    order: Vec<ProductKey>,
    ids: FxHashMap<String, ProductKey>,
    currency: &'a Currency,
}

impl<'a, T: TagCollection> Catalog<'a, T> {
    /// Create an empty catalog in the given currency.
    pub fn empty(currency: &'a Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            order: Vec::new(),
            ids: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from products, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a product is invalid, priced in another currency, or shares
    /// its id with an earlier product.
    pub fn new(
        products: impl IntoIterator<Item = Product<'a, T>>,
        currency: &'a Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty(currency);

        for product in products {
            catalog.push(product)?;
        }

        Ok(catalog)
    }

    fn push(&mut self, product: Product<'a, T>) -> Result<ProductKey, CatalogError> {
        product.validate()?;

        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.ids.insert(id, key);
        self.order.push(key);

        Ok(key)
    }

    /// Get a product by its identifier.
    pub fn get(&self, id: &str) -> Option<&Product<'a, T>> {
        self.ids.get(id).and_then(|key| self.products.get(*key))
    }

    /// Get a product by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product has this id.
    pub fn product(&self, id: &str) -> Result<&Product<'a, T>, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    /// Get the key of a product by its identifier.
    pub fn key(&self, id: &str) -> Option<ProductKey> {
        self.ids.get(id).copied()
    }

    /// Get a product by its key.
    pub fn by_key(&self, key: ProductKey) -> Option<&Product<'a, T>> {
        self.products.get(key)
    }

    /// Iterate over the products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a, T>> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Iterate over the product keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = ProductKey> + '_ {
        self.order.iter().copied()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Currency every product is priced in.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Lowest and highest effective prices, or `None` for an empty catalog.
    pub fn price_bounds(&self) -> Option<PriceRange<'a>> {
        let mut prices = self.iter().map(|product| product.effective_price().to_minor_units());
        let first = prices.next()?;
        let (min, max) = prices.fold((first, first), |(min, max), price| {
            (min.min(price), max.max(price))
        });

        PriceRange::new(
            Money::from_minor(min, self.currency),
            Money::from_minor(max, self.currency),
        )
        .ok()
    }

    /// Distinct categories present, in order of first appearance.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = Vec::new();

        for product in self.iter() {
            if !categories.contains(&product.category) {
                categories.push(product.category);
            }
        }

        categories
    }

    /// Union of every product's tags.
    pub fn tags(&self) -> T {
        let mut tags = T::empty();

        for tag in self.iter().flat_map(|product| product.tags.iter()) {
            tags.add(tag);
        }

        tags
    }
}
