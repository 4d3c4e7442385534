//! The destination environment mutated by the configuration pipeline.
//!
//! An [`Environment`] owns the ordered property-source collection, the
//! active- and default-profile lists, and key lookup with `${...}`
//! placeholder resolution. It is the single shared mutable resource of
//! the pipeline and is only ever touched from the bootstrap thread.

use crate::env::source::SourceCollection;

/// The built-in default profile name used when nothing is activated.
pub const DEFAULT_PROFILE: &str = "default";

/// Mutable configuration environment.
///
/// # Examples
///
/// ```
/// use lamina::env::{Environment, PropertySource};
///
/// let mut env = Environment::new();
/// env.sources_mut().add_first(PropertySource::new(
///     "test",
///     vec![("greeting".to_string(), "hello".to_string())],
/// ));
/// assert_eq!(env.property("greeting"), Some("hello".to_string()));
/// assert_eq!(env.default_profiles(), &["default".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    sources: SourceCollection,
    active_profiles: Vec<String>,
    default_profiles: Vec<String>,
}

impl Environment {
    /// Creates an environment with no sources and the standard default
    /// profile.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: SourceCollection::new(),
            active_profiles: Vec::new(),
            default_profiles: vec![DEFAULT_PROFILE.to_string()],
        }
    }

    /// Returns the property-source collection.
    #[must_use]
    pub fn sources(&self) -> &SourceCollection {
        &self.sources
    }

    /// Returns the property-source collection for mutation.
    pub fn sources_mut(&mut self) -> &mut SourceCollection {
        &mut self.sources
    }

    /// Returns true if any source contains the key.
    #[must_use]
    pub fn contains_property(&self, key: &str) -> bool {
        self.sources.iter().any(|s| s.contains(key))
    }

    /// Looks up a key across sources in precedence order.
    ///
    /// The first source containing the key wins. The raw value is
    /// returned without placeholder resolution.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<String> {
        self.sources
            .iter()
            .find_map(|s| s.get(key).map(ToString::to_string))
    }

    /// Looks up a key and resolves `${...}` placeholders in its value.
    #[must_use]
    pub fn resolved_property(&self, key: &str) -> Option<String> {
        self.property(key).map(|v| self.resolve_placeholders(&v))
    }

    /// Resolves `${name}` and `${name:default}` placeholders against
    /// this environment.
    ///
    /// Placeholders are replaced left to right in a single pass. A
    /// placeholder whose name is unknown and that carries no default is
    /// left verbatim.
    #[must_use]
    pub fn resolve_placeholders(&self, value: &str) -> String {
        let mut result = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let inner = &after[..end];
                    let (name, default) = match inner.split_once(':') {
                        Some((name, default)) => (name, Some(default)),
                        None => (inner, None),
                    };
                    match self.property(name) {
                        Some(replacement) => result.push_str(&replacement),
                        None => match default {
                            Some(default) => result.push_str(default),
                            None => {
                                result.push_str("${");
                                result.push_str(inner);
                                result.push('}');
                            }
                        },
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    // Unterminated placeholder, keep the remainder as-is.
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Reads a comma-separated list property, resolved and trimmed.
    ///
    /// Returns an empty list when the key is absent. Empty elements are
    /// dropped.
    #[must_use]
    pub fn comma_list(&self, key: &str) -> Vec<String> {
        match self.resolved_property(key) {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns the active profiles in registration order.
    #[must_use]
    pub fn active_profiles(&self) -> &[String] {
        &self.active_profiles
    }

    /// Registers a profile as active.
    ///
    /// Duplicate-safe: adding a name that is already active leaves the
    /// list unchanged, preserving existing order.
    pub fn add_active_profile(&mut self, name: &str) {
        if !self.active_profiles.iter().any(|p| p == name) {
            self.active_profiles.push(name.to_string());
        }
    }

    /// Replaces the active-profile list.
    pub fn set_active_profiles(&mut self, names: Vec<String>) {
        self.active_profiles = names;
    }

    /// Returns the default profiles.
    #[must_use]
    pub fn default_profiles(&self) -> &[String] {
        &self.default_profiles
    }

    /// Replaces the default-profile list.
    pub fn set_default_profiles(&mut self, names: Vec<String>) {
        self.default_profiles = names;
    }

    /// Returns true if the environment accepts a document restricted to
    /// the given profile names.
    ///
    /// A declared set is accepted when any of its names is active, or,
    /// with no active profiles at all, when any of its names is a
    /// default profile.
    #[must_use]
    pub fn accepts_profiles(&self, declared: &[String]) -> bool {
        declared.iter().any(|name| {
            self.active_profiles.iter().any(|p| p == name)
                || (self.active_profiles.is_empty()
                    && self.default_profiles.iter().any(|p| p == name))
        })
    }

    /// Flattens the source collection into the effective view.
    ///
    /// Keys keep the order of their first (winning) occurrence across
    /// sources in precedence order. Values are raw.
    #[must_use]
    pub fn merged_entries(&self) -> Vec<(String, String)> {
        let mut seen = std::collections::HashSet::new();
        let mut merged = Vec::new();
        for source in self.sources.iter() {
            for (key, value) in source.iter() {
                if seen.insert(key.to_string()) {
                    merged.push((key.to_string(), value.to_string()));
                }
            }
        }
        merged
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
