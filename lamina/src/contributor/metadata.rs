//! Precomputed contributor metadata.
//!
//! Ordering constraints and requirements for contributor candidates
//! are declared in a metadata file generated alongside the registry,
//! so filters and the sorter never have to inspect the contributors
//! themselves.
//!
//! # Metadata format
//!
//! ```text
//! web.order=-100
//! jdbc.after=web
//! cache.before=web
//! jdbc.requires=datasource
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

const ORDER_SUFFIX: &str = ".order";
const AFTER_SUFFIX: &str = ".after";
const BEFORE_SUFFIX: &str = ".before";
const REQUIRES_SUFFIX: &str = ".requires";

/// Ordering and requirement metadata for one contributor.
#[derive(Debug, Clone, Default)]
pub struct MetadataEntry {
    /// Explicit numeric order; lower runs earlier. Defaults to 0.
    pub order: Option<i32>,
    /// Contributors this one must run after.
    pub after: Vec<String>,
    /// Contributors this one must run before.
    pub before: Vec<String>,
    /// Features that must be available for this contributor to apply.
    pub requires: Vec<String>,
}

/// Metadata table keyed by contributor identifier.
///
/// # Examples
///
/// ```
/// use lamina::contributor::ContributorMetadata;
///
/// let metadata = ContributorMetadata::parse("jdbc.after=web\n").unwrap();
/// assert_eq!(metadata.after("jdbc"), &["web"]);
/// assert_eq!(metadata.order_of("jdbc"), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContributorMetadata {
    entries: HashMap<String, MetadataEntry>,
}

impl ContributorMetadata {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses metadata content.
    ///
    /// # Errors
    ///
    /// Returns a validation error for lines without a recognized
    /// `.order`/`.after`/`.before`/`.requires` key suffix or with a
    /// non-numeric order value.
    pub fn parse(content: &str) -> Result<Self> {
        let mut metadata = Self::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| Error::Validation {
                field: "contributor-metadata".to_string(),
                message: format!("missing '=' separator in line '{line}'"),
            })?;
            let key = key.trim();
            let value = value.trim();
            if let Some(identifier) = key.strip_suffix(ORDER_SUFFIX) {
                let order = value.parse().map_err(|_| Error::Validation {
                    field: "contributor-metadata".to_string(),
                    message: format!("invalid order value '{value}' for '{identifier}'"),
                })?;
                metadata.entry_mut(identifier).order = Some(order);
            } else if let Some(identifier) = key.strip_suffix(AFTER_SUFFIX) {
                metadata.entry_mut(identifier).after.extend(split_list(value));
            } else if let Some(identifier) = key.strip_suffix(BEFORE_SUFFIX) {
                metadata
                    .entry_mut(identifier)
                    .before
                    .extend(split_list(value));
            } else if let Some(identifier) = key.strip_suffix(REQUIRES_SUFFIX) {
                metadata
                    .entry_mut(identifier)
                    .requires
                    .extend(split_list(value));
            } else {
                return Err(Error::Validation {
                    field: "contributor-metadata".to_string(),
                    message: format!("unrecognized metadata key '{key}'"),
                });
            }
        }
        Ok(metadata)
    }

    /// Loads metadata from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn entry_mut(&mut self, identifier: &str) -> &mut MetadataEntry {
        self.entries.entry(identifier.to_string()).or_default()
    }

    /// Returns the metadata entry for an identifier, if declared.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&MetadataEntry> {
        self.entries.get(identifier)
    }

    /// Returns the numeric order of an identifier (0 when undeclared).
    #[must_use]
    pub fn order_of(&self, identifier: &str) -> i32 {
        self.get(identifier).and_then(|e| e.order).unwrap_or(0)
    }

    /// Returns the must-run-after constraints of an identifier.
    #[must_use]
    pub fn after(&self, identifier: &str) -> &[String] {
        self.get(identifier).map_or(&[], |e| e.after.as_slice())
    }

    /// Returns the must-run-before constraints of an identifier.
    #[must_use]
    pub fn before(&self, identifier: &str) -> &[String] {
        self.get(identifier).map_or(&[], |e| e.before.as_slice())
    }

    /// Returns the required features of an identifier.
    #[must_use]
    pub fn requires(&self, identifier: &str) -> &[String] {
        self.get(identifier).map_or(&[], |e| e.requires.as_slice())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect()
}
