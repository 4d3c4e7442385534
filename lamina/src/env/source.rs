//! Named, ordered property sources and the mutable source collection.
//!
//! A [`PropertySource`] is one named layer of key/value configuration.
//! The [`SourceCollection`] holds the sources that make up an
//! environment, in precedence order: lookups walk the collection from
//! front to back and the first source containing a key wins.

use std::fmt;

/// A named, ordered mapping from configuration keys to string values.
///
/// Sources are created during one load pass and immutable thereafter.
/// Keys within a source keep their insertion order.
///
/// # Examples
///
/// ```
/// use lamina::env::PropertySource;
///
/// let source = PropertySource::new(
///     "applicationConfig: [file:./application.properties]",
///     vec![("server.port".to_string(), "8080".to_string())],
/// );
/// assert_eq!(source.get("server.port"), Some("8080"));
/// assert_eq!(source.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySource {
    name: String,
    entries: Vec<(String, String)>,
}

impl PropertySource {
    /// Creates a new property source from a name and ordered entries.
    #[must_use]
    pub fn new(name: impl Into<String>, entries: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Creates an empty property source with the given name.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Returns the source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a key, returning the first value recorded for it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the source contains the key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the source holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An ordered, mutable collection of uniquely named property sources.
///
/// The collection defines global lookup precedence: earlier sources
/// shadow later ones. Adding a source under a name that already exists
/// replaces the old source at its new position.
///
/// # Examples
///
/// ```
/// use lamina::env::{PropertySource, SourceCollection};
///
/// let mut sources = SourceCollection::new();
/// sources.add_last(PropertySource::new("base", vec![]));
/// sources.add_first(PropertySource::new("override", vec![]));
/// assert_eq!(sources.names(), vec!["override", "base"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceCollection {
    sources: Vec<PropertySource>,
}

impl SourceCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a source with the given name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sources.iter().any(|s| s.name() == name)
    }

    /// Returns the source with the given name, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertySource> {
        self.sources.iter().find(|s| s.name() == name)
    }

    /// Removes and returns the source with the given name.
    pub fn remove(&mut self, name: &str) -> Option<PropertySource> {
        let index = self.sources.iter().position(|s| s.name() == name)?;
        Some(self.sources.remove(index))
    }

    /// Adds a source with highest precedence.
    pub fn add_first(&mut self, source: PropertySource) {
        self.remove(source.name());
        self.sources.insert(0, source);
    }

    /// Adds a source with lowest precedence.
    pub fn add_last(&mut self, source: PropertySource) {
        self.remove(source.name());
        self.sources.push(source);
    }

    /// Adds a source immediately before the named anchor.
    ///
    /// If the anchor is not present the source is added first instead.
    pub fn add_before(&mut self, anchor: &str, source: PropertySource) {
        self.remove(source.name());
        match self.sources.iter().position(|s| s.name() == anchor) {
            Some(index) => self.sources.insert(index, source),
            None => self.sources.insert(0, source),
        }
    }

    /// Adds a source immediately after the named anchor.
    ///
    /// If the anchor is not present the source is added last instead.
    pub fn add_after(&mut self, anchor: &str, source: PropertySource) {
        self.remove(source.name());
        match self.sources.iter().position(|s| s.name() == anchor) {
            Some(index) => self.sources.insert(index + 1, source),
            None => self.sources.push(source),
        }
    }

    /// Iterates over the sources in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertySource> {
        self.sources.iter()
    }

    /// Returns the source names in precedence order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(PropertySource::name).collect()
    }

    /// Returns the number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if the collection holds no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}


// Property-based tests for the source collection invariants
#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Property: names stay unique no matter how sources are added.
    proptest! {
        #[test]
        fn prop_names_stay_unique(
            names in prop::collection::vec("[a-d]", 1..=12),
            positions in prop::collection::vec(0usize..4, 1..=12),
        ) {
            let mut sources = SourceCollection::new();
            for (name, pos) in names.iter().zip(positions.iter()) {
                let source = PropertySource::empty(name.clone());
                match pos {
                    0 => sources.add_first(source),
                    1 => sources.add_last(source),
                    2 => sources.add_before("a", source),
                    _ => sources.add_after("a", source),
                }
            }

            let mut seen = std::collections::HashSet::new();
            for name in sources.names() {
                prop_assert!(seen.insert(name.to_string()), "duplicate name {}", name);
            }
        }
    }

    /// Property: add_first always yields the highest-precedence source.
    proptest! {
        #[test]
        fn prop_add_first_wins(names in prop::collection::vec("[a-z]{1,6}", 1..=8)) {
            let mut sources = SourceCollection::new();
            for name in &names {
                sources.add_first(PropertySource::empty(name.clone()));
            }
            // The last add_first call owns the front slot.
            prop_assert_eq!(sources.names()[0], names.last().unwrap().as_str());
        }
    }
}
