//! Filters
//!
//! The filter/sort engine behind the shop listing. [`apply`] is a pure function of the catalog and
//! the criteria: it never mutates the catalog and returns the same sequence for the same inputs.

use std::{cmp::Reverse, fmt, str::FromStr};

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::Catalog,
    products::{Category, Product},
    tags::{collection::TagCollection, string::StringTagCollection},
};

/// Errors raised while building filter criteria.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    /// A sort option outside the supported set.
    #[error("unsupported sort option: {0}")]
    UnsupportedSortOption(String),

    /// The lower bound is above the upper bound (min, max).
    #[error("invalid price range: {0} is above {1}")]
    InvalidPriceRange(String, String),

    /// The bounds are in different currencies.
    #[error("price range bounds use different currencies: {0} and {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Listing sort order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOption {
    /// Featured products first, otherwise catalog order
    #[default]
    Featured,

    /// Cheapest effective price first
    PriceLow,

    /// Most expensive effective price first
    PriceHigh,

    /// New products first, otherwise catalog order
    Newest,

    /// Most reviewed first
    BestSelling,
}

impl SortOption {
    /// Every sort option, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Featured,
        Self::PriceLow,
        Self::PriceHigh,
        Self::Newest,
        Self::BestSelling,
    ];

    /// Option value as used in query strings and CLI arguments.
    pub fn code(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Newest => "newest",
            Self::BestSelling => "best-selling",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SortOption {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.code() == s)
            .ok_or_else(|| FilterError::UnsupportedSortOption(s.to_string()))
    }
}

/// Inclusive price range, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange<'a> {
    min: Money<'a, Currency>,
    max: Money<'a, Currency>,
}

impl<'a> PriceRange<'a> {
    /// Create a new price range.
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] if the bounds are reversed or in different currencies.
    pub fn new(min: Money<'a, Currency>, max: Money<'a, Currency>) -> Result<Self, FilterError> {
        if min.currency() != max.currency() {
            return Err(FilterError::CurrencyMismatch(
                min.currency().iso_alpha_code,
                max.currency().iso_alpha_code,
            ));
        }

        if min.to_minor_units() > max.to_minor_units() {
            return Err(FilterError::InvalidPriceRange(
                min.to_string(),
                max.to_string(),
            ));
        }

        Ok(Self { min, max })
    }

    /// Lower bound.
    pub fn min(&self) -> Money<'a, Currency> {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> Money<'a, Currency> {
        self.max
    }

    /// Whether the amount lies within the range, bounds included.
    ///
    /// Amounts in another currency are never contained.
    pub fn contains(&self, amount: &Money<'_, Currency>) -> bool {
        if amount.currency() != self.min.currency() {
            return false;
        }

        let minor = amount.to_minor_units();

        self.min.to_minor_units() <= minor && minor <= self.max.to_minor_units()
    }
}

/// Filter Criteria
///
/// Every field defaults to "no restriction".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria<'a, T: TagCollection = StringTagCollection> {
    /// Free text matched against name, description and tags, ignoring case
    pub search_text: String,

    /// Selected categories, empty for any
    pub categories: FxHashSet<Category>,

    /// Selected tags, empty for any
    pub tags: T,

    /// Effective price range, `None` for any
    pub price_range: Option<PriceRange<'a>>,

    /// Sort order
    pub sort: SortOption,
}

impl<T: TagCollection> Default for FilterCriteria<'_, T> {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            categories: FxHashSet::default(),
            tags: T::empty(),
            price_range: None,
            sort: SortOption::default(),
        }
    }
}

impl<'a, T: TagCollection> FilterCriteria<'a, T> {
    /// Set the search text.
    #[must_use]
    pub fn with_search(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = search_text.into();
        self
    }

    /// Add a category to the selection.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    /// Add a tag to the selection.
    #[must_use]
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.add(tag);
        self
    }

    /// Restrict the effective price.
    #[must_use]
    pub fn with_price_range(mut self, price_range: PriceRange<'a>) -> Self {
        self.price_range = Some(price_range);
        self
    }

    /// Set the sort order.
    #[must_use]
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Whether the product passes every active filter.
    pub fn matches(&self, product: &Product<'_, T>) -> bool {
        self.matches_search(product)
            && self.matches_category(product)
            && self.matches_tags(product)
            && self.matches_price(product)
    }

    fn matches_search(&self, product: &Product<'_, T>) -> bool {
        if self.search_text.is_empty() {
            return true;
        }

        let needle = self.search_text.to_lowercase();

        product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
            || product.tags.any_contains(&needle)
    }

    fn matches_category(&self, product: &Product<'_, T>) -> bool {
        self.categories.is_empty() || self.categories.contains(&product.category)
    }

    fn matches_tags(&self, product: &Product<'_, T>) -> bool {
        self.tags.is_empty() || self.tags.intersects(&product.tags)
    }

    fn matches_price(&self, product: &Product<'_, T>) -> bool {
        self.price_range
            .is_none_or(|range| range.contains(&product.effective_price()))
    }
}

/// Derive the visible products from the catalog and the criteria.
///
/// Products are filtered, then sorted with a stable sort so ties keep catalog order.
pub fn apply<'c, 'a, T: TagCollection>(
    catalog: &'c Catalog<'a, T>,
    criteria: &FilterCriteria<'_, T>,
) -> Vec<&'c Product<'a, T>> {
    let mut products: Vec<&'c Product<'a, T>> = catalog
        .iter()
        .filter(|product| criteria.matches(product))
        .collect();

    sort(&mut products, criteria.sort);

    products
}

/// Stable-sort products in place.
pub fn sort<T: TagCollection>(products: &mut [&Product<'_, T>], option: SortOption) {
    match option {
        SortOption::Featured => products.sort_by_key(|product| !product.featured),
        SortOption::Newest => products.sort_by_key(|product| !product.new),
        SortOption::PriceLow => {
            products.sort_by_key(|product| product.effective_price().to_minor_units());
        }
        SortOption::PriceHigh => {
            products.sort_by_key(|product| Reverse(product.effective_price().to_minor_units()));
        }
        SortOption::BestSelling => products.sort_by_key(|product| Reverse(product.review_count)),
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    fn product<'a>(id: &str, minor: i64) -> Product<'a> {
        Product::new(id, format!("Product {id}"), Category::Health, Money::from_minor(minor, USD))
    }

    fn ids<'p>(products: &[&'p Product<'_>]) -> Vec<&'p str> {
        products.iter().map(|product| product.id.as_str()).collect()
    }

    #[test]
    fn sort_option_round_trips_codes() -> TestResult {
        for option in SortOption::ALL {
            assert_eq!(option.code().parse::<SortOption>()?, option);
        }

        assert_eq!(SortOption::default(), SortOption::Featured);

        Ok(())
    }

    #[test]
    fn sort_option_rejects_unknown_values() {
        let result = "rating".parse::<SortOption>();

        assert_eq!(
            result,
            Err(FilterError::UnsupportedSortOption("rating".to_string()))
        );
    }

    #[test]
    fn price_range_is_inclusive() -> TestResult {
        let range = PriceRange::new(Money::from_minor(10_00, USD), Money::from_minor(20_00, USD))?;

        assert!(range.contains(&Money::from_minor(10_00, USD)));
        assert!(range.contains(&Money::from_minor(20_00, USD)));
        assert!(!range.contains(&Money::from_minor(20_01, USD)));
        assert!(!range.contains(&Money::from_minor(9_99, USD)));

        Ok(())
    }

    #[test]
    fn price_range_rejects_reversed_bounds() {
        let result = PriceRange::new(Money::from_minor(20_00, USD), Money::from_minor(10_00, USD));

        assert!(matches!(result, Err(FilterError::InvalidPriceRange(_, _))));
    }

    #[test]
    fn price_range_rejects_mixed_currencies() {
        let result = PriceRange::new(Money::from_minor(1_00, USD), Money::from_minor(10_00, GBP));

        assert_eq!(result, Err(FilterError::CurrencyMismatch("USD", "GBP")));
    }

    #[test]
    fn price_range_in_another_currency_matches_nothing() -> TestResult {
        let catalog = Catalog::new([product("a", 5_00), product("b", 15_00)], USD)?;
        let range = PriceRange::new(Money::from_minor(0, GBP), Money::from_minor(100_00, GBP))?;

        assert!(!range.contains(&Money::from_minor(5_00, USD)));
        assert!(range.contains(&Money::from_minor(5_00, GBP)));

        let visible = apply(&catalog, &FilterCriteria::default().with_price_range(range));

        assert!(visible.is_empty());

        Ok(())
    }

    #[test]
    fn default_criteria_keep_everything() -> TestResult {
        let catalog = Catalog::new([product("a", 1_00), product("b", 2_00)], USD)?;

        let visible = apply(&catalog, &FilterCriteria::default());

        assert_eq!(ids(&visible), ["a", "b"]);

        Ok(())
    }

    #[test]
    fn empty_catalog_gives_empty_result() {
        let catalog = Catalog::<'_, StringTagCollection>::empty(USD);

        assert!(apply(&catalog, &FilterCriteria::default()).is_empty());
    }

    #[test]
    fn search_matches_name_description_and_tags_ignoring_case() -> TestResult {
        let catalog = Catalog::new(
            [
                product("name", 1_00).with_description("plain"),
                product("desc", 1_00).with_description("Supports DEEP sleep"),
                product("tag", 1_00).with_tags(StringTagCollection::from_strs(&["Sleep"])),
                product("none", 1_00).with_description("energy"),
            ],
            USD,
        )?;

        let criteria = FilterCriteria::default().with_search("SLEEP");
        assert_eq!(ids(&apply(&catalog, &criteria)), ["desc", "tag"]);

        let criteria = FilterCriteria::default().with_search("product n");
        assert_eq!(ids(&apply(&catalog, &criteria)), ["name", "none"]);

        Ok(())
    }

    #[test]
    fn category_and_tag_filters_combine() -> TestResult {
        let catalog = Catalog::new(
            [
                product("a", 1_00).with_tags(StringTagCollection::from_strs(&["calm"])),
                Product::new("b", "B", Category::Pet, Money::from_minor(1_00, USD))
                    .with_tags(StringTagCollection::from_strs(&["calm", "coat"])),
                Product::new("c", "C", Category::Pet, Money::from_minor(1_00, USD))
                    .with_tags(StringTagCollection::from_strs(&["joints"])),
            ],
            USD,
        )?;

        let pets = FilterCriteria::default().with_category(Category::Pet);
        assert_eq!(ids(&apply(&catalog, &pets)), ["b", "c"]);

        let calm_pets = pets.clone().with_tag("calm");
        assert_eq!(ids(&apply(&catalog, &calm_pets)), ["b"]);

        let calm_or_joints = FilterCriteria::default().with_tag("calm").with_tag("joints");
        assert_eq!(ids(&apply(&catalog, &calm_or_joints)), ["a", "b", "c"]);

        Ok(())
    }

    #[test]
    fn price_filter_uses_effective_price() -> TestResult {
        let catalog = Catalog::new(
            [
                product("discounted", 30_00).with_discount_price(Money::from_minor(15_00, USD)),
                product("full", 30_00),
            ],
            USD,
        )?;

        let range = PriceRange::new(Money::from_minor(0, USD), Money::from_minor(20_00, USD))?;
        let criteria = FilterCriteria::default().with_price_range(range);

        assert_eq!(ids(&apply(&catalog, &criteria)), ["discounted"]);

        Ok(())
    }

    #[test]
    fn maximally_restrictive_filters_give_empty_result() -> TestResult {
        let catalog = Catalog::new([product("a", 5_00)], USD)?;
        let range = PriceRange::new(Money::from_minor(0, USD), Money::from_minor(1_00, USD))?;

        let criteria = FilterCriteria::default()
            .with_search("nothing matches this")
            .with_category(Category::Hybrid)
            .with_tag("unknown")
            .with_price_range(range);

        assert!(apply(&catalog, &criteria).is_empty());

        Ok(())
    }

    #[test]
    fn price_sorts_are_stable() -> TestResult {
        let catalog = Catalog::new(
            [
                product("thirty", 30_00),
                product("ten", 10_00),
                product("twenty", 20_00),
                product("ten-again", 10_00),
            ],
            USD,
        )?;

        let low = apply(&catalog, &FilterCriteria::default().with_sort(SortOption::PriceLow));
        assert_eq!(ids(&low), ["ten", "ten-again", "twenty", "thirty"]);

        let high = apply(&catalog, &FilterCriteria::default().with_sort(SortOption::PriceHigh));
        assert_eq!(ids(&high), ["thirty", "twenty", "ten", "ten-again"]);

        Ok(())
    }

    #[test]
    fn featured_and_newest_are_stable_partitions() -> TestResult {
        let catalog = Catalog::new(
            [
                product("a", 1_00),
                product("b", 1_00).featured(true),
                product("c", 1_00).new_arrival(true),
                product("d", 1_00).featured(true).new_arrival(true),
                product("e", 1_00),
            ],
            USD,
        )?;

        let featured = apply(&catalog, &FilterCriteria::default());
        assert_eq!(ids(&featured), ["b", "d", "a", "c", "e"]);

        let newest = apply(&catalog, &FilterCriteria::default().with_sort(SortOption::Newest));
        assert_eq!(ids(&newest), ["c", "d", "a", "b", "e"]);

        Ok(())
    }

    #[test]
    fn best_selling_orders_by_review_count() -> TestResult {
        let catalog = Catalog::new(
            [
                product("few", 1_00).with_reviews(rust_decimal::Decimal::ONE, 3),
                product("none", 1_00),
                product("many", 1_00).with_reviews(rust_decimal::Decimal::ONE, 300),
                product("few-again", 1_00).with_reviews(rust_decimal::Decimal::ONE, 3),
            ],
            USD,
        )?;

        let visible = apply(&catalog, &FilterCriteria::default().with_sort(SortOption::BestSelling));

        assert_eq!(ids(&visible), ["many", "few", "few-again", "none"]);

        Ok(())
    }
}
