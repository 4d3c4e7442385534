//! Declarative factory registry.
//!
//! The registry maps a capability key to an ordered list of
//! implementation identifiers, loaded from a registration file rather
//! than discovered reflectively. The same registry serves both
//! lifecycle-listener discovery and contributor-candidate discovery;
//! it is passed into the pipeline explicitly, never read from ambient
//! global state.
//!
//! # Registration format
//!
//! ```text
//! # capability = comma-separated identifiers
//! lamina.lifecycle-listeners=logging,metrics
//! lamina.contributors=web,\
//!     jdbc,\
//!     cache
//! ```
//!
//! Repeated keys append to the existing list, preserving declaration
//! order.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Capability key under which contributor candidates are registered.
pub const CONTRIBUTORS_CAPABILITY: &str = "lamina.contributors";

/// Capability key under which lifecycle listeners are registered.
pub const LIFECYCLE_LISTENERS_CAPABILITY: &str = "lamina.lifecycle-listeners";

/// Ordered capability-to-identifiers registry.
///
/// # Examples
///
/// ```
/// use lamina::registry::FactoryRegistry;
///
/// let registry = FactoryRegistry::parse(
///     "lamina.contributors=web,jdbc\n",
/// ).unwrap();
/// assert_eq!(registry.lookup("lamina.contributors"), &["web", "jdbc"]);
/// assert!(registry.lookup("other").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FactoryRegistry {
    entries: Vec<(String, Vec<String>)>,
}

impl FactoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses registry content in the registration format.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-comment line without a
    /// `=` separator or with an empty capability key.
    pub fn parse(content: &str) -> Result<Self> {
        let mut registry = Self::new();
        let mut pending = String::new();
        for line in content.lines() {
            let line = line.trim();
            if pending.is_empty() && (line.is_empty() || line.starts_with('#')) {
                continue;
            }
            if let Some(continued) = line.strip_suffix('\\') {
                pending.push_str(continued.trim());
                continue;
            }
            pending.push_str(line);
            registry.add_line(&pending)?;
            pending.clear();
        }
        if !pending.is_empty() {
            registry.add_line(&pending)?;
        }
        Ok(registry)
    }

    /// Loads a registry from a registration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn add_line(&mut self, line: &str) -> Result<()> {
        let (key, values) = line.split_once('=').ok_or_else(|| Error::Validation {
            field: "registry".to_string(),
            message: format!("missing '=' separator in line '{line}'"),
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::Validation {
                field: "registry".to_string(),
                message: format!("empty capability key in line '{line}'"),
            });
        }
        let values = values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string);
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => existing.extend(values),
            None => self.entries.push((key.to_string(), values.collect())),
        }
        Ok(())
    }

    /// Registers identifiers for a capability programmatically.
    ///
    /// Appends to any existing registration for the key.
    pub fn register(&mut self, capability: &str, identifiers: Vec<String>) {
        match self.entries.iter_mut().find(|(k, _)| k == capability) {
            Some((_, existing)) => existing.extend(identifiers),
            None => self.entries.push((capability.to_string(), identifiers)),
        }
    }

    /// Returns the identifiers registered for a capability, in
    /// declaration order.
    ///
    /// Unknown capabilities yield an empty slice.
    #[must_use]
    pub fn lookup(&self, capability: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == capability)
            .map_or(&[], |(_, values)| values.as_slice())
    }

    /// Returns the identifiers for a mandatory capability.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCandidates`] if the capability has no
    /// registered identifiers.
    pub fn require(&self, capability: &str) -> Result<&[String]> {
        let values = self.lookup(capability);
        if values.is_empty() {
            return Err(Error::NoCandidates {
                capability: capability.to_string(),
            });
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_basic() {
        let registry =
            FactoryRegistry::parse("lamina.contributors=a,b\nlamina.lifecycle-listeners=x\n")
                .unwrap();
        assert_eq!(registry.lookup(CONTRIBUTORS_CAPABILITY), &["a", "b"]);
        assert_eq!(registry.lookup(LIFECYCLE_LISTENERS_CAPABILITY), &["x"]);
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let registry = FactoryRegistry::parse("# header\n\nkey=a\n# tail\n").unwrap();
        assert_eq!(registry.lookup("key"), &["a"]);
    }

    #[test]
    fn test_parse_continuation() {
        let registry = FactoryRegistry::parse("key=a,\\\n  b,\\\n  c\n").unwrap();
        assert_eq!(registry.lookup("key"), &["a", "b", "c"]);
    }

    #[test]
    fn test_repeated_keys_append() {
        let registry = FactoryRegistry::parse("key=a\nkey=b\n").unwrap();
        assert_eq!(registry.lookup("key"), &["a", "b"]);
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert!(FactoryRegistry::parse("not a registration\n").is_err());
    }

    #[test]
    fn test_require_empty_is_fatal() {
        let registry = FactoryRegistry::new();
        let err = registry.require(CONTRIBUTORS_CAPABILITY).unwrap_err();
        assert!(format!("{err}").contains(CONTRIBUTORS_CAPABILITY));
    }

    #[test]
    fn test_register_appends() {
        let mut registry = FactoryRegistry::new();
        registry.register("key", vec!["a".to_string()]);
        registry.register("key", vec!["b".to_string()]);
        assert_eq!(registry.lookup("key"), &["a", "b"]);
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registrations");
        fs::write(&path, "key=a,b\n").unwrap();
        let registry = FactoryRegistry::from_file(&path).unwrap();
        assert_eq!(registry.lookup("key"), &["a", "b"]);
    }
}
