//! String-based Tag Collection
//!
//! A sorted `SmallVec<String>` implementation of [`TagCollection`].

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::tags::collection::TagCollection;

/// A string-based tag collection, kept sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTagCollection {
    tags: SmallVec<[String; 5]>,
}

impl StringTagCollection {
    /// Create a new string tag collection from a vector of strings.
    #[must_use]
    pub fn new(tags: SmallVec<[String; 5]>) -> Self {
        let mut collection = Self { tags };

        collection.tags.sort();
        collection.tags.dedup();

        collection
    }

    /// Create a new string tag collection from string slices.
    pub fn from_strs(tags: &[&str]) -> Self {
        Self::new(tags.iter().map(ToString::to_string).collect())
    }

    /// Convert the tag collection to a vector of strings.
    #[must_use]
    pub fn to_strs(&self) -> SmallVec<[String; 5]> {
        self.tags.clone()
    }
}

impl TagCollection for StringTagCollection {
    fn empty() -> Self {
        Self::default()
    }

    fn intersects(&self, other: &Self) -> bool {
        // Both sides are sorted, so walk them together.
        let mut left = self.tags.iter();
        let mut right = other.tags.iter();
        let mut left_tag = left.next();
        let mut right_tag = right.next();

        while let (Some(left_tag_ref), Some(right_tag_ref)) = (left_tag, right_tag) {
            match left_tag_ref.cmp(right_tag_ref) {
                Ordering::Equal => return true,
                Ordering::Less => left_tag = left.next(),
                Ordering::Greater => right_tag = right.next(),
            }
        }

        false
    }

    fn contains(&self, tag: &str) -> bool {
        self.tags
            .binary_search_by(|probe| probe.as_str().cmp(tag))
            .is_ok()
    }

    fn any_contains(&self, needle: &str) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
    }

    fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    fn len(&self) -> usize {
        self.tags.len()
    }

    fn add(&mut self, tag: &str) {
        if let Err(pos) = self.tags.binary_search_by(|probe| probe.as_str().cmp(tag)) {
            self.tags.insert(pos, tag.to_string());
        }
    }

    fn remove(&mut self, tag: &str) {
        if let Ok(pos) = self.tags.binary_search_by(|probe| probe.as_str().cmp(tag)) {
            self.tags.remove(pos);
        }
    }
}

impl FromIterator<String> for StringTagCollection {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersects_finds_shared_tag() {
        let tags1 = StringTagCollection::from_strs(&["energy", "immunity", "sleep"]);
        let tags2 = StringTagCollection::from_strs(&["focus", "immunity"]);
        let tags3 = StringTagCollection::from_strs(&["coat", "joints"]);

        assert!(tags1.intersects(&tags2));
        assert!(!tags1.intersects(&tags3));
        assert!(!tags2.intersects(&StringTagCollection::empty()));
    }

    #[test]
    fn contains_uses_exact_match() {
        let tags = StringTagCollection::from_strs(&["energy", "sleep"]);

        assert!(tags.contains("energy"));
        assert!(!tags.contains("Energy"));
        assert!(!tags.contains("ener"));
    }

    #[test]
    fn any_contains_ignores_case() {
        let tags = StringTagCollection::from_strs(&["Anti-Aging", "hydration"]);

        assert!(tags.any_contains("aging"));
        assert!(tags.any_contains("hydra"));
        assert!(!tags.any_contains("sleep"));
    }

    #[test]
    fn collects_from_owned_strings() {
        let tags: StringTagCollection = ["pet".to_string(), "coat".to_string()]
            .into_iter()
            .collect();

        assert_eq!(tags, StringTagCollection::from_strs(&["coat", "pet"]));
    }

    #[test]
    fn deduplicates_and_sorts_tags() {
        let tags = StringTagCollection::from_strs(&["sleep", "energy", "sleep", "calm"]);

        assert_eq!(tags.len(), 3);
        assert_eq!(tags.iter().collect::<Vec<_>>(), ["calm", "energy", "sleep"]);
    }

    #[test]
    fn add_remove_and_toggle() {
        let mut tags = StringTagCollection::from_strs(&["energy"]);

        tags.add("calm");
        tags.add("calm");
        assert_eq!(tags.len(), 2);

        tags.remove("energy");
        assert!(!tags.contains("energy"));

        assert!(tags.toggle("focus"));
        assert!(!tags.toggle("focus"));
        assert!(!tags.contains("focus"));
        assert!(!tags.is_empty());
    }
}
