//! Committing loaded per-profile source buckets into the destination
//! environment.

use std::collections::HashSet;

use crate::config::profile::Profile;
use crate::env::{Environment, PropertySource};

/// Name of the designated low-priority sentinel source.
///
/// If present, the sentinel always ends up with the lowest precedence
/// of the whole collection after commit and after
/// [`SourceMerger::reorder_sentinel`].
pub const DEFAULT_PROPERTIES: &str = "defaultProperties";

/// Flattens per-profile source buckets into an environment.
pub struct SourceMerger;

impl SourceMerger {
    /// Commits the loaded buckets, most-recently-discovered profile
    /// first.
    ///
    /// Buckets are walked in reverse discovery order so sources for
    /// later-processed profiles gain higher precedence. Within a
    /// bucket relative order is preserved by chaining each source
    /// immediately after the previously inserted one; the very first
    /// source goes immediately before the sentinel if present, else
    /// last. A source whose name was already inserted is silently
    /// skipped (first writer wins per source name).
    pub fn commit(
        loaded: Vec<(Option<Profile>, Vec<PropertySource>)>,
        environment: &mut Environment,
    ) {
        let mut last_added: Option<String> = None;
        let mut added: HashSet<String> = HashSet::new();
        for (_, bucket) in loaded.iter().rev() {
            for source in bucket {
                if !added.insert(source.name().to_string()) {
                    continue;
                }
                match &last_added {
                    None => {
                        if environment.sources().contains(DEFAULT_PROPERTIES) {
                            environment
                                .sources_mut()
                                .add_before(DEFAULT_PROPERTIES, source.clone());
                        } else {
                            environment.sources_mut().add_last(source.clone());
                        }
                    }
                    Some(anchor) => {
                        environment.sources_mut().add_after(anchor, source.clone());
                    }
                }
                last_added = Some(source.name().to_string());
            }
        }
    }

    /// Re-anchors the sentinel source at the lowest precedence.
    ///
    /// No-op when no sentinel is present.
    pub fn reorder_sentinel(environment: &mut Environment) {
        if let Some(sentinel) = environment.sources_mut().remove(DEFAULT_PROPERTIES) {
            environment.sources_mut().add_last(sentinel);
        }
    }
}


// Property-based tests for commit precedence
#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Property: with unique source names, commit inserts every source
    /// and buckets discovered later always precede earlier ones.
    proptest! {
        #[test]
        fn prop_commit_orders_buckets_by_reverse_discovery(
            bucket_sizes in prop::collection::vec(1usize..=3, 1..=4),
        ) {
            let mut loaded = Vec::new();
            let mut names_by_bucket = Vec::new();
            for (b, size) in bucket_sizes.iter().enumerate() {
                let profile = if b == 0 {
                    None
                } else {
                    Some(Profile::new(format!("p{b}")))
                };
                let mut bucket = Vec::new();
                let mut names = Vec::new();
                for s in 0..*size {
                    let name = format!("source-{b}-{s}");
                    bucket.push(PropertySource::empty(name.clone()));
                    names.push(name);
                }
                loaded.push((profile, bucket));
                names_by_bucket.push(names);
            }

            let mut env = Environment::new();
            SourceMerger::commit(loaded, &mut env);

            let committed: Vec<String> =
                env.sources().names().iter().map(ToString::to_string).collect();
            let expected: Vec<String> = names_by_bucket
                .iter()
                .rev()
                .flatten()
                .cloned()
                .collect();
            prop_assert_eq!(committed, expected);
        }
    }

    /// Property: the sentinel keeps the lowest precedence regardless of
    /// how many buckets are committed.
    proptest! {
        #[test]
        fn prop_sentinel_stays_last(bucket_count in 1usize..=5) {
            let mut env = Environment::new();
            env.sources_mut()
                .add_last(PropertySource::empty(DEFAULT_PROPERTIES));

            let mut loaded = Vec::new();
            for b in 0..bucket_count {
                loaded.push((
                    Some(Profile::new(format!("p{b}"))),
                    vec![PropertySource::empty(format!("source-{b}"))],
                ));
            }
            SourceMerger::commit(loaded, &mut env);

            let names = env.sources().names();
            prop_assert_eq!(*names.last().unwrap(), DEFAULT_PROPERTIES);
        }
    }
}
