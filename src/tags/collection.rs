//! Tag Collection
//!
//! A set-like collection of tags used for product keywords and tag filters.

use std::fmt;

/// Trait for tag collections used by products and filter criteria.
pub trait TagCollection: Clone + fmt::Debug + PartialEq {
    /// Check if this collection intersects with another collection.
    /// Returns true if they have at least one tag in common.
    fn intersects(&self, other: &Self) -> bool;

    /// Check if this collection contains a specific tag.
    fn contains(&self, tag: &str) -> bool;

    /// Check if any tag contains the given lower-cased text, ignoring case.
    fn any_contains(&self, needle: &str) -> bool;

    /// Iterate over the tags in this collection.
    fn iter(&self) -> impl Iterator<Item = &str>;

    /// Check if this collection is empty.
    fn is_empty(&self) -> bool;

    /// Get the number of tags in this collection.
    fn len(&self) -> usize;

    /// Create an empty collection.
    fn empty() -> Self;

    /// Add a tag to this collection.
    fn add(&mut self, tag: &str);

    /// Remove a tag from this collection.
    fn remove(&mut self, tag: &str);

    /// Add the tag if it is missing, remove it otherwise.
    ///
    /// Returns `true` if the tag is present afterwards.
    fn toggle(&mut self, tag: &str) -> bool {
        if self.contains(tag) {
            self.remove(tag);
            false
        } else {
            self.add(tag);
            true
        }
    }
}
