//! Listing
//!
//! The shop listing: current filter criteria plus the products they select. Every change to the
//! criteria re-runs the filter engine before the setter returns and notifies subscribers, so the
//! visible products always reflect the latest criteria.

use tracing::debug;

use crate::{
    catalog::Catalog,
    filters::{self, FilterCriteria, PriceRange, SortOption},
    products::{Category, Product},
    subscriptions::{SubscriptionKey, Subscribers},
    tags::{collection::TagCollection, string::StringTagCollection},
};

/// Listing
#[derive(Debug)]
pub struct Listing<'a, T: TagCollection = StringTagCollection> {
    catalog: &'a Catalog<'a, T>,
    criteria: FilterCriteria<'a, T>,
    visible: Vec<&'a Product<'a, T>>,
    subscribers: Subscribers<'a, [&'a Product<'a, T>]>,
}

impl<'a, T: TagCollection> Listing<'a, T> {
    /// Create a listing showing the whole catalog in the default order.
    pub fn new(catalog: &'a Catalog<'a, T>) -> Self {
        Self::with_criteria(catalog, FilterCriteria::default())
    }

    /// Create a listing with the given criteria.
    pub fn with_criteria(catalog: &'a Catalog<'a, T>, criteria: FilterCriteria<'a, T>) -> Self {
        let visible = filters::apply(catalog, &criteria);

        Self {
            catalog,
            criteria,
            visible,
            subscribers: Subscribers::new(),
        }
    }

    /// Current criteria.
    pub fn criteria(&self) -> &FilterCriteria<'a, T> {
        &self.criteria
    }

    /// Products matching the current criteria, in display order.
    pub fn products(&self) -> &[&'a Product<'a, T>] {
        &self.visible
    }

    /// Number of visible products.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Whether no product matches.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// The catalog this listing draws from.
    pub fn catalog(&self) -> &'a Catalog<'a, T> {
        self.catalog
    }

    /// Replace the search text.
    pub fn set_search_text(&mut self, search_text: impl Into<String>) {
        self.criteria.search_text = search_text.into();
        self.refresh();
    }

    /// Select the category if unselected, unselect it otherwise.
    ///
    /// Returns `true` if the category is selected afterwards.
    pub fn toggle_category(&mut self, category: Category) -> bool {
        let selected = if self.criteria.categories.remove(&category) {
            false
        } else {
            self.criteria.categories.insert(category)
        };

        self.refresh();

        selected
    }

    /// Select the tag if unselected, unselect it otherwise.
    ///
    /// Returns `true` if the tag is selected afterwards.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        let selected = self.criteria.tags.toggle(tag);

        self.refresh();

        selected
    }

    /// Restrict the effective price.
    pub fn set_price_range(&mut self, price_range: PriceRange<'a>) {
        self.criteria.price_range = Some(price_range);
        self.refresh();
    }

    /// Remove the price restriction.
    pub fn clear_price_range(&mut self) {
        self.criteria.price_range = None;
        self.refresh();
    }

    /// Change the sort order.
    pub fn set_sort(&mut self, sort: SortOption) {
        self.criteria.sort = sort;
        self.refresh();
    }

    /// Drop every filter and return to the default order.
    pub fn reset(&mut self) {
        self.criteria = FilterCriteria::default();
        self.refresh();
    }

    /// Register a listener called with the visible products after every change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&[&'a Product<'a, T>]) + 'a,
    ) -> SubscriptionKey {
        self.subscribers.subscribe(listener)
    }

    /// Remove a listener. Returns `false` if the key was unknown.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.subscribers.unsubscribe(key)
    }

    fn refresh(&mut self) {
        self.visible = filters::apply(self.catalog, &self.criteria);

        debug!(
            visible = self.visible.len(),
            catalog = self.catalog.len(),
            sort = %self.criteria.sort,
            "recomputed listing"
        );

        self.subscribers.notify(&self.visible);
    }
}
