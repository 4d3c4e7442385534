//! Contributor discovery, filtering, and ordering.
//!
//! Contributors are pluggable units identified by opaque names,
//! discovered through the [`crate::registry::FactoryRegistry`] and
//! narrowed down in two explicit passes: per-source entry construction
//! ([`collect_entries`]) and a global flatten-and-sort
//! ([`flatten_and_sort`]).

pub mod entry;
pub mod filter;
pub mod metadata;
pub mod sorter;

pub use entry::{
    collect_entries, flatten_and_sort, ContributorEntry, RequestingSource,
    SelectedContributor, EXCLUDE_KEY,
};
pub use filter::{ContributorFilter, RequiresFilter};
pub use metadata::{ContributorMetadata, MetadataEntry};
