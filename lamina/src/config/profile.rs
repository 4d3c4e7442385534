//! Named configuration profiles.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A named configuration layer that can be activated by name.
///
/// Two profiles are equal iff their names match; the default-profile
/// marker does not participate in equality. The profile-independent
/// base configuration is represented as `Option<Profile>::None`
/// throughout the loader.
///
/// # Examples
///
/// ```
/// use lamina::config::Profile;
///
/// let prod = Profile::new("prod");
/// let fallback = Profile::default_profile("prod");
/// assert_eq!(prod, fallback);
/// assert!(!prod.is_default());
/// assert!(fallback.is_default());
/// ```
#[derive(Debug, Clone)]
pub struct Profile {
    name: String,
    default: bool,
}

impl Profile {
    /// Creates a profile activated explicitly.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: false,
        }
    }

    /// Creates a profile seeded from the environment's default-profile
    /// list.
    ///
    /// Default profiles are purged from the pending queue as soon as
    /// any explicit activation occurs.
    #[must_use]
    pub fn default_profile(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: true,
        }
    }

    /// Returns the profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the profile was seeded as a default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.default
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Profile {}

impl Hash for Profile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_default_marker() {
        assert_eq!(Profile::new("dev"), Profile::default_profile("dev"));
        assert_ne!(Profile::new("dev"), Profile::new("prod"));
    }

    #[test]
    fn test_hash_consistent_with_equality() {
        let mut set = HashSet::new();
        set.insert(Profile::new("dev"));
        assert!(set.contains(&Profile::default_profile("dev")));
    }
}
