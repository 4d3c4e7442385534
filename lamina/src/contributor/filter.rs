//! Batch condition filters over contributor candidates.

use std::collections::HashSet;

use crate::contributor::metadata::ContributorMetadata;

/// A condition filter applied to the whole remaining candidate array
/// in one batch call.
///
/// The returned vector is parallel to `candidates`: `false` at an
/// index rejects that candidate. Rejections accumulate across filters;
/// a later filter can never re-admit an entry.
pub trait ContributorFilter {
    /// Evaluates all candidates at once.
    fn matches(&self, candidates: &[String], metadata: &ContributorMetadata) -> Vec<bool>;
}

/// Rejects candidates whose declared `requires` features are not all
/// available.
///
/// # Examples
///
/// ```
/// use lamina::contributor::{ContributorFilter, ContributorMetadata, RequiresFilter};
///
/// let metadata = ContributorMetadata::parse("jdbc.requires=datasource\n").unwrap();
/// let filter = RequiresFilter::new(["http"].into_iter().map(String::from).collect());
/// let matches = filter.matches(
///     &["web".to_string(), "jdbc".to_string()],
///     &metadata,
/// );
/// assert_eq!(matches, vec![true, false]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequiresFilter {
    available: HashSet<String>,
}

impl RequiresFilter {
    /// Creates a filter over the given available feature set.
    #[must_use]
    pub fn new(available: HashSet<String>) -> Self {
        Self { available }
    }
}

impl ContributorFilter for RequiresFilter {
    fn matches(&self, candidates: &[String], metadata: &ContributorMetadata) -> Vec<bool> {
        candidates
            .iter()
            .map(|candidate| {
                metadata
                    .requires(candidate)
                    .iter()
                    .all(|feature| self.available.contains(feature))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_no_requirements_always_match() {
        let filter = RequiresFilter::default();
        let metadata = ContributorMetadata::new();
        assert_eq!(
            filter.matches(&candidates(&["a", "b"]), &metadata),
            vec![true, true]
        );
    }

    #[test]
    fn test_missing_requirement_rejects() {
        let metadata =
            ContributorMetadata::parse("a.requires=x\nb.requires=x,y\n").unwrap();
        let filter = RequiresFilter::new(["x".to_string()].into_iter().collect());
        assert_eq!(
            filter.matches(&candidates(&["a", "b", "c"]), &metadata),
            vec![true, false, true]
        );
    }
}
