//! Two-pass contributor selection.
//!
//! Pass 1 ([`collect_entries`]) builds one immutable
//! [`ContributorEntry`] per requesting source: registry candidates are
//! deduplicated, exclusions validated and removed, and every
//! registered condition filter applied in one batch call each. Pass 2
//! ([`flatten_and_sort`]) unions all entries, subtracts all
//! exclusions, and applies the priority sort. The caller sequences the
//! two passes explicitly.

use log::trace;

use crate::contributor::filter::ContributorFilter;
use crate::contributor::metadata::ContributorMetadata;
use crate::contributor::sorter;
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::registry::{FactoryRegistry, CONTRIBUTORS_CAPABILITY};

/// Environment property listing contributor identifiers to exclude.
pub const EXCLUDE_KEY: &str = "autoconfigure.exclude";

/// One source requesting contributor selection, with its declared
/// exclusions.
#[derive(Debug, Clone, Default)]
pub struct RequestingSource {
    /// Name of the requesting source, re-associated with every
    /// contributor it first introduces.
    pub name: String,
    /// Identifiers this source explicitly excludes.
    pub excludes: Vec<String>,
}

impl RequestingSource {
    /// Creates a requesting source without exclusions.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            excludes: Vec::new(),
        }
    }
}

/// The immutable result of pass 1 for one requesting source.
#[derive(Debug, Clone)]
pub struct ContributorEntry {
    source: String,
    accepted: Vec<String>,
    excluded: Vec<String>,
}

impl ContributorEntry {
    /// Returns the accepted identifiers in candidate order.
    #[must_use]
    pub fn accepted(&self) -> &[String] {
        &self.accepted
    }

    /// Returns the exclusions applied to this entry.
    #[must_use]
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Returns the requesting source name.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A contributor in the final ordered selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedContributor {
    /// The contributor identifier.
    pub identifier: String,
    /// The requesting source that first introduced the identifier.
    pub source: String,
}

/// Pass 1: builds a [`ContributorEntry`] per requesting source.
///
/// # Errors
///
/// Returns [`Error::NoCandidates`] when the registry holds no
/// contributor candidates, and [`Error::InvalidExclusions`] when an
/// exclusion names an identifier absent from the candidate set (all
/// invalid identifiers are reported together).
pub fn collect_entries(
    sources: &[RequestingSource],
    registry: &FactoryRegistry,
    environment: &Environment,
    metadata: &ContributorMetadata,
    filters: &[Box<dyn ContributorFilter>],
) -> Result<Vec<ContributorEntry>> {
    sources
        .iter()
        .map(|source| collect_entry(source, registry, environment, metadata, filters))
        .collect()
}

fn collect_entry(
    source: &RequestingSource,
    registry: &FactoryRegistry,
    environment: &Environment,
    metadata: &ContributorMetadata,
    filters: &[Box<dyn ContributorFilter>],
) -> Result<ContributorEntry> {
    let mut candidates = Vec::new();
    for candidate in registry.require(CONTRIBUTORS_CAPABILITY)? {
        if !candidates.contains(candidate) {
            candidates.push(candidate.clone());
        }
    }

    let mut exclusions = source.excludes.clone();
    for exclusion in environment.comma_list(EXCLUDE_KEY) {
        if !exclusions.contains(&exclusion) {
            exclusions.push(exclusion);
        }
    }
    check_excluded(&candidates, &exclusions)?;
    candidates.retain(|candidate| !exclusions.contains(candidate));

    for filter in filters {
        let matches = filter.matches(&candidates, metadata);
        let mut index = 0;
        candidates.retain(|candidate| {
            let keep = matches.get(index).copied().unwrap_or(false);
            if !keep {
                trace!("contributor '{candidate}' rejected by condition filter");
            }
            index += 1;
            keep
        });
    }

    Ok(ContributorEntry {
        source: source.name.clone(),
        accepted: candidates,
        excluded: exclusions,
    })
}

fn check_excluded(candidates: &[String], exclusions: &[String]) -> Result<()> {
    let invalid: Vec<String> = exclusions
        .iter()
        .filter(|exclusion| !candidates.contains(exclusion))
        .cloned()
        .collect();
    if invalid.is_empty() {
        return Ok(());
    }
    Err(Error::InvalidExclusions {
        identifiers: invalid,
    })
}

/// Pass 2: flattens all entries into the final ordered selection.
///
/// Accepted lists are unioned preserving first-seen order, all
/// exclusion sets subtracted, and the survivors priority-sorted. Each
/// selected contributor is paired with the requesting source that
/// first introduced it.
#[must_use]
pub fn flatten_and_sort(
    entries: &[ContributorEntry],
    metadata: &ContributorMetadata,
) -> Vec<SelectedContributor> {
    let mut identifiers: Vec<String> = Vec::new();
    let mut introduced_by: Vec<String> = Vec::new();
    for entry in entries {
        for identifier in entry.accepted() {
            if !identifiers.contains(identifier) {
                identifiers.push(identifier.clone());
                introduced_by.push(entry.source.clone());
            }
        }
    }

    let excluded: Vec<&String> = entries.iter().flat_map(ContributorEntry::excluded).collect();
    let survivors: Vec<String> = identifiers
        .iter()
        .filter(|identifier| !excluded.contains(identifier))
        .cloned()
        .collect();

    sorter::in_priority_order(survivors, metadata)
        .into_iter()
        .map(|identifier| {
            let source = identifiers
                .iter()
                .position(|i| *i == identifier)
                .map(|index| introduced_by[index].clone())
                .unwrap_or_default();
            SelectedContributor { identifier, source }
        })
        .collect()
}
