//! The caller-sequenced bootstrap pipeline.
//!
//! A [`Bootstrap`] wires the collaborators together and runs the whole
//! startup sequence once, on the calling thread: fire `starting`,
//! build the environment and resolve its configuration, fire
//! `environment-prepared`, select and sort contributors, fire
//! `context-prepared` and `context-loaded` (re-anchoring the
//! low-priority sentinel), then `started` and `running`. Any fatal
//! error fires the terminal `failed` phase and propagates.
//!
//! All collaborators are passed in explicitly; nothing is discovered
//! through ambient global state.

use std::collections::HashMap;

use crate::config::merger::SourceMerger;
use crate::config::parser::{DocumentParser, PropertiesParser, YamlParser};
use crate::config::Loader;
use crate::contributor::{
    collect_entries, flatten_and_sort, ContributorFilter, ContributorMetadata,
    RequestingSource, SelectedContributor,
};
use crate::env::{Environment, PropertySource};
use crate::error::{Error, Result};
use crate::lifecycle::{LifecycleDispatcher, LifecycleListener};
use crate::registry::{FactoryRegistry, LIFECYCLE_LISTENERS_CAPABILITY};
use crate::resource::ResourceResolver;

/// Constructor for a lifecycle listener instance.
pub type ListenerConstructor = Box<dyn Fn() -> Box<dyn LifecycleListener>>;

/// The result of a successful bootstrap run.
pub struct BootstrapContext {
    /// The environment holding the merged configuration view.
    pub environment: Environment,
    /// The final ordered contributor selection.
    pub contributors: Vec<SelectedContributor>,
    late_listeners: Vec<Box<dyn LifecycleListener>>,
}

impl std::fmt::Debug for BootstrapContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapContext")
            .field("environment", &self.environment)
            .field("contributors", &self.contributors)
            .field("late_listeners", &self.late_listeners.len())
            .finish()
    }
}

impl BootstrapContext {
    /// Registers an additional listener for the remaining phases.
    ///
    /// Only the context phases hand out a mutable context, so listeners
    /// can first be added at `context-prepared`/`context-loaded`; a
    /// listener added here sees no earlier phases replayed.
    pub fn add_listener(&mut self, listener: Box<dyn LifecycleListener>) {
        self.late_listeners.push(listener);
    }

    fn take_late_listeners(&mut self) -> Vec<Box<dyn LifecycleListener>> {
        std::mem::take(&mut self.late_listeners)
    }
}

/// Configures and runs the bootstrap pipeline.
///
/// # Examples
///
/// ```no_run
/// use lamina::bootstrap::Bootstrap;
/// use lamina::registry::FactoryRegistry;
/// use lamina::resource::FsResourceResolver;
/// use std::path::Path;
///
/// let registry = FactoryRegistry::parse("lamina.contributors=web\n").unwrap();
/// let resolver = FsResourceResolver::new(Path::new("resources"), Path::new("."));
/// let context = Bootstrap::new(registry, Box::new(resolver))
///     .run()
///     .unwrap();
/// println!("selected {} contributors", context.contributors.len());
/// ```
pub struct Bootstrap {
    registry: FactoryRegistry,
    resolver: Box<dyn ResourceResolver>,
    parsers: Vec<Box<dyn DocumentParser>>,
    listener_constructors: HashMap<String, ListenerConstructor>,
    filters: Vec<Box<dyn ContributorFilter>>,
    metadata: ContributorMetadata,
    requesting_sources: Vec<RequestingSource>,
    initial_sources: Vec<PropertySource>,
    default_properties: Option<PropertySource>,
    default_profiles: Option<Vec<String>>,
}

impl Bootstrap {
    /// Creates a bootstrap over a registry and a resource resolver.
    ///
    /// The standard properties and YAML parsers are registered by
    /// default, in that order.
    #[must_use]
    pub fn new(registry: FactoryRegistry, resolver: Box<dyn ResourceResolver>) -> Self {
        Self {
            registry,
            resolver,
            parsers: vec![
                Box::new(PropertiesParser::new()),
                Box::new(YamlParser::new()),
            ],
            listener_constructors: HashMap::new(),
            filters: Vec::new(),
            metadata: ContributorMetadata::new(),
            requesting_sources: Vec::new(),
            initial_sources: Vec::new(),
            default_properties: None,
            default_profiles: None,
        }
    }

    /// Replaces the document parsers.
    #[must_use]
    pub fn with_parsers(mut self, parsers: Vec<Box<dyn DocumentParser>>) -> Self {
        self.parsers = parsers;
        self
    }

    /// Registers a constructor for a listener identifier.
    ///
    /// Identifiers come from the registry's lifecycle-listener
    /// capability; each must have a constructor registered here.
    #[must_use]
    pub fn with_listener_constructor(
        mut self,
        identifier: impl Into<String>,
        constructor: ListenerConstructor,
    ) -> Self {
        self.listener_constructors.insert(identifier.into(), constructor);
        self
    }

    /// Adds a contributor condition filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Box<dyn ContributorFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sets the contributor metadata table.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ContributorMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds a requesting source for contributor selection.
    ///
    /// Without any, a single source named `application` is used.
    #[must_use]
    pub fn with_requesting_source(mut self, source: RequestingSource) -> Self {
        self.requesting_sources.push(source);
        self
    }

    /// Adds a property source ahead of everything loaded from files.
    ///
    /// Sources keep their declaration order, first declared winning.
    #[must_use]
    pub fn with_property_source(mut self, source: PropertySource) -> Self {
        self.initial_sources.push(source);
        self
    }

    /// Sets the low-priority sentinel entries.
    #[must_use]
    pub fn with_default_properties(mut self, entries: Vec<(String, String)>) -> Self {
        self.default_properties = Some(PropertySource::new(
            crate::config::DEFAULT_PROPERTIES,
            entries,
        ));
        self
    }

    /// Overrides the environment's default profiles.
    #[must_use]
    pub fn with_default_profiles(mut self, names: Vec<String>) -> Self {
        self.default_profiles = Some(names);
        self
    }

    /// Runs the pipeline once.
    ///
    /// # Errors
    ///
    /// Any fatal error (configuration load failure, contributor
    /// selection failure, or listener error) aborts the run after the
    /// `failed` phase has been broadcast.
    pub fn run(mut self) -> Result<BootstrapContext> {
        let mut dispatcher = self.build_dispatcher()?;

        if let Err(error) = dispatcher.starting() {
            let _ = dispatcher.failed(None, Some(&error));
            return Err(error);
        }

        let mut environment = self.build_environment();
        if let Err(error) = Loader::new(&mut environment, self.resolver.as_ref(), &self.parsers).load()
        {
            let _ = dispatcher.failed(None, Some(&error));
            return Err(error);
        }
        if let Err(error) = dispatcher.environment_prepared(&mut environment) {
            let _ = dispatcher.failed(None, Some(&error));
            return Err(error);
        }

        let contributors = match self.select_contributors(&environment) {
            Ok(contributors) => contributors,
            Err(error) => {
                let _ = dispatcher.failed(None, Some(&error));
                return Err(error);
            }
        };

        let mut context = BootstrapContext {
            environment,
            contributors,
            late_listeners: Vec::new(),
        };
        if let Err(error) = dispatcher.context_prepared(&mut context) {
            let _ = dispatcher.failed(Some(&context), Some(&error));
            return Err(error);
        }
        if let Err(error) = dispatcher.context_loaded(&mut context) {
            let _ = dispatcher.failed(Some(&context), Some(&error));
            return Err(error);
        }
        for listener in context.take_late_listeners() {
            dispatcher.add_listener(listener);
        }
        // A loaded context may have contributed higher-priority
        // sources; the sentinel goes back to the tail.
        SourceMerger::reorder_sentinel(&mut context.environment);

        if let Err(error) = dispatcher.started(&context) {
            let _ = dispatcher.failed(Some(&context), Some(&error));
            return Err(error);
        }
        if let Err(error) = dispatcher.running(&context) {
            let _ = dispatcher.failed(Some(&context), Some(&error));
            return Err(error);
        }
        Ok(context)
    }

    fn build_dispatcher(&self) -> Result<LifecycleDispatcher> {
        let mut dispatcher = LifecycleDispatcher::new();
        for identifier in self.registry.lookup(LIFECYCLE_LISTENERS_CAPABILITY) {
            let constructor =
                self.listener_constructors
                    .get(identifier)
                    .ok_or_else(|| Error::Validation {
                        field: LIFECYCLE_LISTENERS_CAPABILITY.to_string(),
                        message: format!("no listener constructor registered for '{identifier}'"),
                    })?;
            dispatcher.add_listener(constructor());
        }
        Ok(dispatcher)
    }

    fn build_environment(&mut self) -> Environment {
        let mut environment = Environment::new();
        if let Some(defaults) = self.default_profiles.take() {
            environment.set_default_profiles(defaults);
        }
        for source in self.initial_sources.drain(..) {
            environment.sources_mut().add_last(source);
        }
        if let Some(sentinel) = self.default_properties.take() {
            environment.sources_mut().add_last(sentinel);
        }
        environment
    }

    fn select_contributors(
        &mut self,
        environment: &Environment,
    ) -> Result<Vec<SelectedContributor>> {
        let sources = if self.requesting_sources.is_empty() {
            vec![RequestingSource::new("application")]
        } else {
            std::mem::take(&mut self.requesting_sources)
        };
        let entries = collect_entries(
            &sources,
            &self.registry,
            environment,
            &self.metadata,
            &self.filters,
        )?;
        Ok(flatten_and_sort(&entries, &self.metadata))
    }
}
