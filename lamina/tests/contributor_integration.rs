//! Integration tests for contributor selection and ordering.

use lamina::contributor::{
    collect_entries, flatten_and_sort, ContributorFilter, ContributorMetadata,
    RequestingSource, RequiresFilter,
};
use lamina::env::{Environment, PropertySource};
use lamina::registry::{FactoryRegistry, CONTRIBUTORS_CAPABILITY};
use lamina::Error;

fn registry(candidates: &[&str]) -> FactoryRegistry {
    let mut registry = FactoryRegistry::new();
    registry.register(
        CONTRIBUTORS_CAPABILITY,
        candidates.iter().map(ToString::to_string).collect(),
    );
    registry
}

fn select(
    sources: &[RequestingSource],
    registry: &FactoryRegistry,
    environment: &Environment,
    metadata: &ContributorMetadata,
    filters: &[Box<dyn ContributorFilter>],
) -> Result<Vec<String>, Error> {
    let entries = collect_entries(sources, registry, environment, metadata, filters)?;
    Ok(flatten_and_sort(&entries, metadata)
        .into_iter()
        .map(|selected| selected.identifier)
        .collect())
}

#[test]
fn unknown_exclusion_is_fatal_and_lists_exactly_the_identifier() {
    let mut source = RequestingSource::new("app");
    source.excludes.push("ghost".to_string());

    let err = select(
        &[source],
        &registry(&["web", "jdbc"]),
        &Environment::new(),
        &ContributorMetadata::new(),
        &[],
    )
    .unwrap_err();

    match err {
        Error::InvalidExclusions { identifiers } => {
            assert_eq!(identifiers, vec!["ghost".to_string()]);
        }
        other => panic!("expected InvalidExclusions, got {other}"),
    }
}

#[test]
fn selection_is_deterministic_across_runs() {
    let metadata = ContributorMetadata::parse(
        "cache.after=web\nsecurity.before=web\nactuator.order=100\n",
    )
    .unwrap();
    let registry = registry(&["web", "cache", "security", "actuator", "jdbc"]);
    let sources = [RequestingSource::new("app")];

    let first = select(&sources, &registry, &Environment::new(), &metadata, &[]).unwrap();
    for _ in 0..20 {
        let run = select(&sources, &registry, &Environment::new(), &metadata, &[]).unwrap();
        assert_eq!(run, first);
    }
}

#[test]
fn ordering_constraints_and_numeric_order_combine() {
    let metadata = ContributorMetadata::parse(
        "security.order=-100\njdbc.after=web\n",
    )
    .unwrap();
    let selected = select(
        &[RequestingSource::new("app")],
        &registry(&["web", "jdbc", "security"]),
        &Environment::new(),
        &metadata,
        &[],
    )
    .unwrap();

    assert_eq!(selected, vec!["security", "web", "jdbc"]);
}

#[test]
fn cycle_breaks_at_first_declared_candidate() {
    let metadata =
        ContributorMetadata::parse("web.after=jdbc\njdbc.after=web\n").unwrap();
    let selected = select(
        &[RequestingSource::new("app")],
        &registry(&["web", "jdbc"]),
        &Environment::new(),
        &metadata,
        &[],
    )
    .unwrap();

    assert_eq!(selected, vec!["web", "jdbc"]);
}

#[test]
fn exclusion_property_combines_with_explicit_excludes() {
    let mut env = Environment::new();
    env.sources_mut().add_first(PropertySource::new(
        "test",
        vec![("autoconfigure.exclude".to_string(), "cache".to_string())],
    ));
    let mut source = RequestingSource::new("app");
    source.excludes.push("jdbc".to_string());

    let selected = select(
        &[source],
        &registry(&["web", "jdbc", "cache"]),
        &env,
        &ContributorMetadata::new(),
        &[],
    )
    .unwrap();

    assert_eq!(selected, vec!["web"]);
}

#[test]
fn filters_see_whole_batch_and_rejections_propagate() {
    struct RejectSecond;

    impl ContributorFilter for RejectSecond {
        fn matches(
            &self,
            candidates: &[String],
            _metadata: &ContributorMetadata,
        ) -> Vec<bool> {
            candidates.iter().enumerate().map(|(i, _)| i != 1).collect()
        }
    }

    let metadata = ContributorMetadata::parse("cache.requires=redis\n").unwrap();
    let filters: Vec<Box<dyn ContributorFilter>> = vec![
        Box::new(RequiresFilter::default()),
        Box::new(RejectSecond),
    ];

    let selected = select(
        &[RequestingSource::new("app")],
        &registry(&["web", "cache", "jdbc", "mail"]),
        &Environment::new(),
        &metadata,
        &filters,
    )
    .unwrap();

    // RequiresFilter drops cache (redis unavailable); the second filter
    // then sees [web, jdbc, mail] and drops the entry at index 1.
    assert_eq!(selected, vec!["web", "mail"]);
}

#[test]
fn multiple_sources_union_preserving_first_seen_order() {
    let sources = [
        RequestingSource::new("first"),
        RequestingSource::new("second"),
    ];
    let registry = registry(&["web", "jdbc"]);

    let entries = collect_entries(
        &sources,
        &registry,
        &Environment::new(),
        &ContributorMetadata::new(),
        &[],
    )
    .unwrap();
    let selected = flatten_and_sort(&entries, &ContributorMetadata::new());

    assert_eq!(selected.len(), 2);
    // Every identifier is attributed to the source that introduced it.
    assert!(selected.iter().all(|s| s.source == "first"));
}
