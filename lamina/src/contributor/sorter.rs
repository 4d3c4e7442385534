//! Priority ordering of selected contributors.
//!
//! The sort is a stable topological sort over must-run-after and
//! must-run-before constraints, with ready candidates drained in
//! (numeric order, input index) order so the output is fully
//! deterministic for a fixed input.

use std::collections::BTreeSet;

use log::debug;

use crate::contributor::metadata::ContributorMetadata;

/// Sorts identifiers into priority order.
///
/// Constraints naming identifiers outside the candidate set are
/// ignored. When constraints form a cycle, the remaining candidate
/// with the smallest (numeric order, input index) is forced ready and
/// its unsatisfied constraints dropped, so every input identifier
/// appears exactly once in the output.
///
/// # Examples
///
/// ```
/// use lamina::contributor::{sorter, ContributorMetadata};
///
/// let metadata = ContributorMetadata::parse("b.after=a\n").unwrap();
/// let sorted = sorter::in_priority_order(
///     vec!["b".to_string(), "a".to_string()],
///     &metadata,
/// );
/// assert_eq!(sorted, vec!["a", "b"]);
/// ```
#[must_use]
pub fn in_priority_order(
    candidates: Vec<String>,
    metadata: &ContributorMetadata,
) -> Vec<String> {
    let count = candidates.len();
    let index_of = |name: &str| candidates.iter().position(|c| c == name);

    // successors[i] must run after i; indegree counts unsatisfied
    // predecessors.
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut indegree: Vec<usize> = vec![0; count];
    for (index, candidate) in candidates.iter().enumerate() {
        for predecessor in metadata.after(candidate) {
            if let Some(predecessor_index) = index_of(predecessor) {
                successors[predecessor_index].push(index);
                indegree[index] += 1;
            }
        }
        for successor in metadata.before(candidate) {
            if let Some(successor_index) = index_of(successor) {
                successors[index].push(successor_index);
                indegree[successor_index] += 1;
            }
        }
    }

    let priority = |index: usize| (metadata.order_of(&candidates[index]), index);

    let mut ready: BTreeSet<(i32, usize)> = indegree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(index, _)| priority(index))
        .collect();
    let mut placed = vec![false; count];
    let mut sorted = Vec::with_capacity(count);

    while sorted.len() < count {
        let (_, index) = match ready.iter().next().copied() {
            Some(next) => next,
            None => {
                // Constraint cycle: force the smallest remaining
                // candidate ready and drop what still blocks it.
                let forced = (0..count)
                    .filter(|i| !placed[*i])
                    .map(priority)
                    .min()
                    .unwrap_or((0, 0));
                debug!(
                    "breaking ordering cycle at '{}'",
                    candidates[forced.1]
                );
                forced
            }
        };
        ready.remove(&priority(index));
        if placed[index] {
            continue;
        }
        placed[index] = true;
        sorted.push(candidates[index].clone());
        for &successor in &successors[index] {
            if placed[successor] {
                continue;
            }
            indegree[successor] = indegree[successor].saturating_sub(1);
            if indegree[successor] == 0 {
                ready.insert(priority(successor));
            }
        }
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_no_constraints_keeps_input_order() {
        let metadata = ContributorMetadata::new();
        assert_eq!(
            in_priority_order(names(&["c", "a", "b"]), &metadata),
            names(&["c", "a", "b"])
        );
    }

    #[test]
    fn test_numeric_order_applied() {
        let metadata = ContributorMetadata::parse("b.order=-10\nc.order=10\n").unwrap();
        assert_eq!(
            in_priority_order(names(&["a", "b", "c"]), &metadata),
            names(&["b", "a", "c"])
        );
    }

    #[test]
    fn test_after_constraint() {
        let metadata = ContributorMetadata::parse("a.after=b\n").unwrap();
        assert_eq!(
            in_priority_order(names(&["a", "b"]), &metadata),
            names(&["b", "a"])
        );
    }

    #[test]
    fn test_before_constraint() {
        let metadata = ContributorMetadata::parse("c.before=a\n").unwrap();
        // a is blocked until c is placed; unconstrained b drains first.
        assert_eq!(
            in_priority_order(names(&["a", "b", "c"]), &metadata),
            names(&["b", "c", "a"])
        );
    }

    #[test]
    fn test_constraint_on_absent_identifier_ignored() {
        let metadata = ContributorMetadata::parse("a.after=missing\n").unwrap();
        assert_eq!(
            in_priority_order(names(&["a", "b"]), &metadata),
            names(&["a", "b"])
        );
    }

    #[test]
    fn test_constraint_beats_numeric_order() {
        // b would sort first by order, but must run after a.
        let metadata = ContributorMetadata::parse("b.order=-10\nb.after=a\n").unwrap();
        assert_eq!(
            in_priority_order(names(&["a", "b"]), &metadata),
            names(&["a", "b"])
        );
    }

    #[test]
    fn test_cycle_broken_deterministically() {
        let metadata = ContributorMetadata::parse("a.after=b\nb.after=a\n").unwrap();
        let first = in_priority_order(names(&["a", "b"]), &metadata);
        let second = in_priority_order(names(&["a", "b"]), &metadata);
        // The cycle breaks at the first-declared candidate.
        assert_eq!(first, names(&["a", "b"]));
        assert_eq!(first, second);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let metadata =
            ContributorMetadata::parse("d.after=b\nc.before=b\na.order=5\n").unwrap();
        let input = names(&["a", "b", "c", "d"]);
        let expected = in_priority_order(input.clone(), &metadata);
        for _ in 0..10 {
            assert_eq!(in_priority_order(input.clone(), &metadata), expected);
        }
    }
}
