//! Parsed configuration documents and the per-run document cache.

use std::collections::HashMap;
use std::rc::Rc;

use crate::config::parser::DocumentParser;
use crate::config::profile::Profile;
use crate::env::{Environment, PropertySource};
use crate::error::Result;
use crate::resource::Resource;

/// The per-document key restricting it to named profiles.
pub const PROFILES_KEY: &str = "profiles";

/// The key naming profiles a document activates.
pub const ACTIVE_PROFILES_KEY: &str = "profiles.active";

/// The key naming profiles a document includes.
pub const INCLUDE_PROFILES_KEY: &str = "profiles.include";

/// One parsed unit of configuration content plus its declared profile
/// metadata.
///
/// The three profile keys are extracted eagerly at construction, with
/// placeholders in their values resolved against the whole environment
/// accumulated so far.
#[derive(Debug, Clone)]
pub struct Document {
    source: PropertySource,
    profiles: Vec<String>,
    active_profiles: Vec<Profile>,
    include_profiles: Vec<Profile>,
}

impl Document {
    /// Builds a document from a freshly parsed source, extracting the
    /// declared profile keys.
    #[must_use]
    pub fn from_source(source: PropertySource, environment: &Environment) -> Self {
        let profiles = bound_list(&source, environment, PROFILES_KEY);
        let active_profiles = bound_list(&source, environment, ACTIVE_PROFILES_KEY)
            .into_iter()
            .map(Profile::new)
            .collect();
        let include_profiles = bound_list(&source, environment, INCLUDE_PROFILES_KEY)
            .into_iter()
            .map(Profile::new)
            .collect();
        Self {
            source,
            profiles,
            active_profiles,
            include_profiles,
        }
    }

    /// Returns the property source of this document.
    #[must_use]
    pub fn property_source(&self) -> &PropertySource {
        &self.source
    }

    /// Returns the profile names this document is restricted to.
    #[must_use]
    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    /// Returns the profiles this document activates.
    #[must_use]
    pub fn active_profiles(&self) -> &[Profile] {
        &self.active_profiles
    }

    /// Returns the profiles this document includes.
    #[must_use]
    pub fn include_profiles(&self) -> &[Profile] {
        &self.include_profiles
    }
}

/// Reads a list-valued key from a single source.
///
/// Accepts either a comma-separated scalar (`profiles=a,b`) or indexed
/// entries produced by flattening a sequence (`profiles[0]`,
/// `profiles[1]`, ...). Each element has placeholders resolved against
/// the environment.
fn bound_list(source: &PropertySource, environment: &Environment, key: &str) -> Vec<String> {
    if let Some(value) = source.get(key) {
        return environment
            .resolve_placeholders(value)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();
    }

    let mut values = Vec::new();
    let mut index = 0;
    while let Some(value) = source.get(&format!("{key}[{index}]")) {
        let resolved = environment.resolve_placeholders(value);
        let trimmed = resolved.trim();
        if !trimmed.is_empty() {
            values.push(trimmed.to_string());
        }
        index += 1;
    }
    values
}

/// Memoizes document loading per (parser, resource) pair for the
/// duration of one resolution run.
///
/// Repeated requests for the same pair return the cached sequence
/// without re-invoking the parser.
#[derive(Debug, Default)]
pub struct DocumentCache {
    cache: HashMap<(usize, String), Rc<Vec<Document>>>,
}

impl DocumentCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the documents for a (parser, resource) pair, reading and
    /// parsing only on the first request.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be read or parsed.
    pub fn load(
        &mut self,
        parser_index: usize,
        parser: &dyn DocumentParser,
        name: &str,
        location: &str,
        resource: &dyn Resource,
        environment: &Environment,
    ) -> Result<Rc<Vec<Document>>> {
        let key = (parser_index, location.to_string());
        if let Some(documents) = self.cache.get(&key) {
            return Ok(Rc::clone(documents));
        }

        let content = resource.read_to_string()?;
        let documents: Vec<Document> = parser
            .parse(name, &content)?
            .into_iter()
            .map(|parsed| {
                Document::from_source(
                    PropertySource::new(parsed.source_name, parsed.entries),
                    environment,
                )
            })
            .collect();
        let documents = Rc::new(documents);
        self.cache.insert(key, Rc::clone(&documents));
        Ok(documents)
    }
}
