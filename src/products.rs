//! Products

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;
use thiserror::Error;

use crate::tags::{collection::TagCollection, string::StringTagCollection};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Errors raised when a product breaks its invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// The product has an empty identifier.
    #[error("product id must not be empty")]
    EmptyId,

    /// The base price is zero or negative.
    #[error("product {0} must have a positive price")]
    NonPositivePrice(String),

    /// The discount price is not strictly below the base price.
    #[error("product {0} has a discount price that is not below its price")]
    DiscountNotBelowPrice(String),

    /// The discount price is in a different currency from the base price.
    #[error("product {0} has a discount price in a different currency")]
    DiscountCurrencyMismatch(String),

    /// Rating outside the `0..=5` scale.
    #[error("product {0} has rating {1}, expected a value between 0 and 5")]
    InvalidRating(String, Decimal),

    /// Category code outside the closed set.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Health supplements
    Health,

    /// Beauty and skincare
    Beauty,

    /// Sport nutrition
    Sport,

    /// Pet care
    Pet,

    /// Products spanning several ranges
    Hybrid,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 5] = [
        Self::Health,
        Self::Beauty,
        Self::Sport,
        Self::Pet,
        Self::Hybrid,
    ];

    /// Category code as used in fixtures and filter arguments.
    pub fn code(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Beauty => "beauty",
            Self::Sport => "sport",
            Self::Pet => "pet",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Category {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProductError::UnknownCategory(s.to_string()))
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a, T: TagCollection = StringTagCollection> {
    /// Unique product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Product description
    pub description: String,

    /// Product category
    pub category: Category,

    /// Benefit keywords
    pub tags: T,

    /// Product price
    pub price: Money<'a, Currency>,

    /// Reduced price, strictly below `price` when present
    pub discount_price: Option<Money<'a, Currency>>,

    /// Average rating, `0..=5`
    pub rating: Decimal,

    /// Number of reviews
    pub review_count: u32,

    /// Shown first under the featured sort
    pub featured: bool,

    /// Best seller badge
    pub best_seller: bool,

    /// Shown first under the newest sort
    pub new: bool,

    /// Units in stock
    pub stock: u32,
}

impl<'a, T: TagCollection> Product<'a, T> {
    /// Create a product with no discount, tags, reviews or flags.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            tags: T::empty(),
            price,
            discount_price: None,
            rating: Decimal::ZERO,
            review_count: 0,
            featured: false,
            best_seller: false,
            new: false,
            stock: 0,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: T) -> Self {
        self.tags = tags;
        self
    }

    /// Set the discount price.
    #[must_use]
    pub fn with_discount_price(mut self, discount_price: Money<'a, Currency>) -> Self {
        self.discount_price = Some(discount_price);
        self
    }

    /// Set the rating and review count.
    #[must_use]
    pub fn with_reviews(mut self, rating: Decimal, review_count: u32) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }

    /// Set the featured flag.
    #[must_use]
    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    /// Set the best seller flag.
    #[must_use]
    pub fn best_seller(mut self, best_seller: bool) -> Self {
        self.best_seller = best_seller;
        self
    }

    /// Set the new flag.
    #[must_use]
    pub fn new_arrival(mut self, new: bool) -> Self {
        self.new = new;
        self
    }

    /// Set the stock level.
    #[must_use]
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// The price a shopper pays: the discount price if present, the base price otherwise.
    pub fn effective_price(&self) -> Money<'a, Currency> {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whether the product carries a discount price.
    pub fn is_discounted(&self) -> bool {
        self.discount_price.is_some()
    }

    /// Whether any units are left.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Check the product invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] describing the first broken invariant.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.id.trim().is_empty() {
            return Err(ProductError::EmptyId);
        }

        if self.price.to_minor_units() <= 0 {
            return Err(ProductError::NonPositivePrice(self.id.clone()));
        }

        if let Some(discount) = self.discount_price {
            if discount.currency() != self.price.currency() {
                return Err(ProductError::DiscountCurrencyMismatch(self.id.clone()));
            }

            let discount_minor = discount.to_minor_units();

            if discount_minor <= 0 || discount_minor >= self.price.to_minor_units() {
                return Err(ProductError::DiscountNotBelowPrice(self.id.clone()));
            }
        }

        if self.rating < Decimal::ZERO || self.rating > Decimal::from(5) {
            return Err(ProductError::InvalidRating(self.id.clone(), self.rating));
        }

        Ok(())
    }
}
