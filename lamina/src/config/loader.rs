//! Profile resolution and configuration loading.
//!
//! The [`Loader`] drives one resolution run: it seeds the pending
//! profile queue, drains it while discovering activations and
//! inclusions embedded in loaded documents, runs the catch-all
//! negative pass, and commits the accumulated sources into the
//! destination environment.

use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use log::{debug, trace};

use crate::config::document::{
    Document, DocumentCache, ACTIVE_PROFILES_KEY, INCLUDE_PROFILES_KEY,
};
use crate::config::merger::SourceMerger;
use crate::config::parser::DocumentParser;
use crate::config::profile::Profile;
use crate::env::{Environment, PropertySource};
use crate::error::{Error, Result};
use crate::resource::{Resource, ResourceResolver};

/// Property overriding the default search file base names.
pub const CONFIG_NAME_KEY: &str = "config.name";

/// Property replacing the search locations entirely.
pub const CONFIG_LOCATION_KEY: &str = "config.location";

/// Property adding search locations without replacing the defaults.
pub const CONFIG_ADDITIONAL_LOCATION_KEY: &str = "config.additional-location";

// Note the order is from least to most specific (last one wins).
const DEFAULT_SEARCH_LOCATIONS: [&str; 4] = [
    "classpath:/",
    "classpath:/config/",
    "file:./",
    "file:./config/",
];

const DEFAULT_NAMES: [&str; 1] = ["application"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKind {
    /// Documents tied to the profile currently being processed.
    Positive,
    /// Profile-restricted documents never tied to a queued profile.
    Negative,
}

/// Restricts which documents a load pass accepts.
struct DocumentFilter {
    kind: FilterKind,
    profile: Option<Profile>,
}

impl DocumentFilter {
    fn matches(&self, environment: &Environment, document: &Document) -> bool {
        match self.kind {
            FilterKind::Positive => match &self.profile {
                None => document.profiles().is_empty(),
                Some(profile) => {
                    document.profiles().iter().any(|p| p == profile.name())
                        && environment.accepts_profiles(document.profiles())
                }
            },
            FilterKind::Negative => {
                self.profile.is_none()
                    && !document.profiles().is_empty()
                    && environment.accepts_profiles(document.profiles())
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum AddMode {
    /// Append to the profile bucket.
    Append,
    /// Prepend, skipping sources already present in any bucket.
    PrependChecked,
}

/// Loads candidate property sources and resolves the active profiles.
///
/// A loader is created per resolution run and consumed by [`Loader::load`];
/// its state (pending queue, processed list, activation lock, document
/// cache) is discarded once the merged view is committed.
///
/// # Examples
///
/// ```no_run
/// use lamina::config::{Loader, PropertiesParser, YamlParser, DocumentParser};
/// use lamina::env::Environment;
/// use lamina::resource::FsResourceResolver;
/// use std::path::Path;
///
/// let mut env = Environment::new();
/// let resolver = FsResourceResolver::new(Path::new("resources"), Path::new("."));
/// let parsers: Vec<Box<dyn DocumentParser>> = vec![
///     Box::new(PropertiesParser::new()),
///     Box::new(YamlParser::new()),
/// ];
/// Loader::new(&mut env, &resolver, &parsers).load().unwrap();
/// ```
pub struct Loader<'a> {
    environment: &'a mut Environment,
    resolver: &'a dyn ResourceResolver,
    parsers: &'a [Box<dyn DocumentParser>],
    pending: VecDeque<Option<Profile>>,
    processed: Vec<Option<Profile>>,
    activated: bool,
    loaded: Vec<(Option<Profile>, Vec<PropertySource>)>,
    cache: DocumentCache,
}

impl<'a> Loader<'a> {
    /// Creates a loader for one resolution run.
    pub fn new(
        environment: &'a mut Environment,
        resolver: &'a dyn ResourceResolver,
        parsers: &'a [Box<dyn DocumentParser>],
    ) -> Self {
        Self {
            environment,
            resolver,
            parsers,
            pending: VecDeque::new(),
            processed: Vec::new(),
            activated: false,
            loaded: Vec::new(),
            cache: DocumentCache::new(),
        }
    }

    /// Runs the full resolution and commits the result into the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertySourceLoad`] if any location fails to
    /// resolve or parse. Missing resources and empty parses are
    /// skipped.
    pub fn load(mut self) -> Result<()> {
        self.initialize_profiles();
        while let Some(profile) = self.pending.pop_front() {
            if let Some(p) = &profile {
                if !p.is_default() {
                    self.environment.add_active_profile(p.name());
                }
            }
            self.load_all(profile.as_ref(), FilterKind::Positive, AddMode::Append)?;
            self.processed.push(profile);
        }
        self.reset_environment_profiles();
        self.load_all(None, FilterKind::Negative, AddMode::PrependChecked)?;

        let Loader {
            environment, loaded, ..
        } = self;
        SourceMerger::commit(loaded, environment);
        Ok(())
    }

    /// Seeds the pending queue.
    ///
    /// The base (absent) profile goes first so it is processed first
    /// and ends up with the lowest precedence. Profiles activated via
    /// properties follow, include before active; pre-existing
    /// environment active profiles not captured by the properties are
    /// queued ahead of them. With nothing activated, the environment
    /// default profiles are seeded with the default marker.
    fn initialize_profiles(&mut self) {
        self.pending.push_back(None);
        let activated_via_property = self.profiles_activated_via_property();
        for profile in self.other_active_profiles(&activated_via_property) {
            self.pending.push_back(Some(profile));
        }
        self.add_activated_profiles(&activated_via_property);
        if self.pending.len() == 1 {
            for name in self.environment.default_profiles().to_vec() {
                self.pending.push_back(Some(Profile::default_profile(name)));
            }
        }
    }

    fn profiles_activated_via_property(&self) -> Vec<Profile> {
        if !self.environment.contains_property(ACTIVE_PROFILES_KEY)
            && !self.environment.contains_property(INCLUDE_PROFILES_KEY)
        {
            return Vec::new();
        }
        let mut profiles: Vec<Profile> = Vec::new();
        for name in self
            .environment
            .comma_list(INCLUDE_PROFILES_KEY)
            .into_iter()
            .chain(self.environment.comma_list(ACTIVE_PROFILES_KEY))
        {
            let profile = Profile::new(name);
            if !profiles.contains(&profile) {
                profiles.push(profile);
            }
        }
        profiles
    }

    fn other_active_profiles(&self, activated_via_property: &[Profile]) -> Vec<Profile> {
        self.environment
            .active_profiles()
            .iter()
            .map(|name| Profile::new(name.clone()))
            .filter(|profile| !activated_via_property.contains(profile))
            .collect()
    }

    /// Queues newly activated profiles, locking further activations.
    ///
    /// The first activation source wins: once locked, later activation
    /// sets are recorded in the log and otherwise ignored. Locking
    /// purges any still-unprocessed default profile from the queue.
    fn add_activated_profiles(&mut self, profiles: &[Profile]) {
        if profiles.is_empty() {
            return;
        }
        if self.activated {
            debug!(
                "profiles already activated, '{}' will not be applied",
                join_profiles(profiles)
            );
            return;
        }
        for profile in profiles {
            self.pending.push_back(Some(profile.clone()));
        }
        debug!("activated profiles {}", join_profiles(profiles));
        self.activated = true;
        self.remove_unprocessed_default_profiles();
    }

    fn remove_unprocessed_default_profiles(&mut self) {
        self.pending
            .retain(|profile| !profile.as_ref().is_some_and(Profile::is_default));
    }

    /// Prepends included profiles to the remaining queue.
    ///
    /// Unlike activation this is never locked; already-processed
    /// profiles are not re-queued.
    fn add_included_profiles(&mut self, profiles: &[Profile]) {
        if profiles.is_empty() {
            return;
        }
        let existing = std::mem::take(&mut self.pending);
        for profile in profiles {
            if !self.processed.iter().any(|p| p.as_ref() == Some(profile)) {
                self.pending.push_back(Some(profile.clone()));
            }
        }
        self.pending.extend(existing);
    }

    /// Reconciles the environment active-profile list to the processed
    /// non-default profiles in processing order.
    fn reset_environment_profiles(&mut self) {
        let names = self
            .processed
            .iter()
            .flatten()
            .filter(|profile| !profile.is_default())
            .map(|profile| profile.name().to_string())
            .collect();
        self.environment.set_active_profiles(names);
    }

    fn search_locations(&self) -> Vec<String> {
        if self.environment.contains_property(CONFIG_LOCATION_KEY) {
            return reversed_set(self.environment.comma_list(CONFIG_LOCATION_KEY));
        }
        let mut locations =
            reversed_set(self.environment.comma_list(CONFIG_ADDITIONAL_LOCATION_KEY));
        for location in reversed_set(
            DEFAULT_SEARCH_LOCATIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
        ) {
            if !locations.contains(&location) {
                locations.push(location);
            }
        }
        locations
    }

    fn search_names(&self) -> Vec<String> {
        if self.environment.contains_property(CONFIG_NAME_KEY) {
            return reversed_set(self.environment.comma_list(CONFIG_NAME_KEY));
        }
        DEFAULT_NAMES.iter().map(ToString::to_string).collect()
    }

    fn load_all(
        &mut self,
        profile: Option<&Profile>,
        kind: FilterKind,
        mode: AddMode,
    ) -> Result<()> {
        for location in self.search_locations() {
            if location.ends_with('/') {
                for name in self.search_names() {
                    self.load_with_name(&location, Some(&name), profile, kind, mode)?;
                }
            } else {
                self.load_with_name(&location, None, profile, kind, mode)?;
            }
        }
        Ok(())
    }

    fn load_with_name(
        &mut self,
        location: &str,
        name: Option<&str>,
        profile: Option<&Profile>,
        kind: FilterKind,
        mode: AddMode,
    ) -> Result<()> {
        let parsers = self.parsers;
        match name {
            // Literal location: handled by the first parser claiming
            // its extension.
            None => {
                for (index, parser) in parsers.iter().enumerate() {
                    if claims_extension(parser.as_ref(), location) {
                        let filter = DocumentFilter {
                            kind,
                            profile: profile.cloned(),
                        };
                        self.load_document(index, location, profile, &filter, mode)?;
                        return Ok(());
                    }
                }
                Ok(())
            }
            Some(name) => {
                let mut claimed = HashSet::new();
                for (index, parser) in parsers.iter().enumerate() {
                    for extension in parser.file_extensions() {
                        // An extension is claimed by exactly one parser.
                        if claimed.insert((*extension).to_string()) {
                            self.load_for_extension(
                                index,
                                &format!("{location}{name}"),
                                &format!(".{extension}"),
                                profile,
                                kind,
                                mode,
                            )?;
                        }
                    }
                }
                Ok(())
            }
        }
    }

    fn load_for_extension(
        &mut self,
        parser_index: usize,
        prefix: &str,
        extension: &str,
        profile: Option<&Profile>,
        kind: FilterKind,
        mode: AddMode,
    ) -> Result<()> {
        let profile_filter = DocumentFilter {
            kind,
            profile: profile.cloned(),
        };
        if let Some(profile) = profile {
            // Profile-specific file, under both the default filter and
            // the profile filter.
            let default_filter = DocumentFilter {
                kind,
                profile: None,
            };
            let profile_specific = format!("{prefix}-{}{extension}", profile.name());
            self.load_document(parser_index, &profile_specific, Some(profile), &default_filter, mode)?;
            self.load_document(parser_index, &profile_specific, Some(profile), &profile_filter, mode)?;
            // Files named for already-processed profiles can still
            // carry sections accepted under the current filter.
            let previously_processed: Vec<String> = self
                .processed
                .iter()
                .flatten()
                .map(|p| p.name().to_string())
                .collect();
            for processed_name in previously_processed {
                let previously_loaded = format!("{prefix}-{processed_name}{extension}");
                self.load_document(
                    parser_index,
                    &previously_loaded,
                    Some(profile),
                    &profile_filter,
                    mode,
                )?;
            }
        }
        self.load_document(
            parser_index,
            &format!("{prefix}{extension}"),
            profile,
            &profile_filter,
            mode,
        )
    }

    fn load_document(
        &mut self,
        parser_index: usize,
        location: &str,
        profile: Option<&Profile>,
        filter: &DocumentFilter,
        mode: AddMode,
    ) -> Result<()> {
        let resource = self.resolver.resolve(location);
        if !resource.exists() {
            trace!(
                "skipped missing config {}",
                describe(resource.as_ref(), profile)
            );
            return Ok(());
        }
        if resource.filename_extension().is_none() {
            trace!(
                "skipped empty config extension {}",
                describe(resource.as_ref(), profile)
            );
            return Ok(());
        }

        let name = format!("applicationConfig: [{location}]");
        let documents = self
            .load_documents(parser_index, &name, location, resource.as_ref())
            .map_err(|source| Error::PropertySourceLoad {
                location: location.to_string(),
                source: Box::new(source),
            })?;
        if documents.is_empty() {
            trace!(
                "skipped unloaded config {}",
                describe(resource.as_ref(), profile)
            );
            return Ok(());
        }

        let mut matched = Vec::new();
        for document in documents.iter() {
            if filter.matches(self.environment, document) {
                self.add_activated_profiles(document.active_profiles());
                self.add_included_profiles(document.include_profiles());
                matched.push(document.clone());
            }
        }
        // Later documents in a multi-document resource gain higher
        // precedence after commit.
        matched.reverse();
        if !matched.is_empty() {
            for document in &matched {
                self.consume(profile, document.property_source().clone(), mode);
            }
            debug!("loaded config file {}", describe(resource.as_ref(), profile));
        }
        Ok(())
    }

    fn load_documents(
        &mut self,
        parser_index: usize,
        name: &str,
        location: &str,
        resource: &dyn Resource,
    ) -> Result<Rc<Vec<Document>>> {
        let parsers = self.parsers;
        self.cache.load(
            parser_index,
            parsers[parser_index].as_ref(),
            name,
            location,
            resource,
            self.environment,
        )
    }

    fn consume(&mut self, profile: Option<&Profile>, source: PropertySource, mode: AddMode) {
        match mode {
            AddMode::Append => self.bucket_mut(profile).push(source),
            AddMode::PrependChecked => {
                let exists = self
                    .loaded
                    .iter()
                    .any(|(_, bucket)| bucket.iter().any(|s| s.name() == source.name()));
                if exists {
                    return;
                }
                self.bucket_mut(profile).insert(0, source);
            }
        }
    }

    fn bucket_mut(&mut self, profile: Option<&Profile>) -> &mut Vec<PropertySource> {
        let index = match self.loaded.iter().position(|(p, _)| p.as_ref() == profile) {
            Some(index) => index,
            None => {
                self.loaded.push((profile.cloned(), Vec::new()));
                self.loaded.len() - 1
            }
        };
        &mut self.loaded[index].1
    }
}

fn claims_extension(parser: &dyn DocumentParser, location: &str) -> bool {
    let location = location.to_lowercase();
    parser
        .file_extensions()
        .iter()
        .any(|extension| location.ends_with(&format!(".{extension}")))
}

fn describe(resource: &dyn Resource, profile: Option<&Profile>) -> String {
    match profile {
        Some(profile) => format!("{} for profile {profile}", resource.description()),
        None => resource.description(),
    }
}

fn reversed_set(values: Vec<String>) -> Vec<String> {
    let mut out = Vec::new();
    for value in values.into_iter().rev() {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn join_profiles(profiles: &[Profile]) -> String {
    profiles
        .iter()
        .map(Profile::name)
        .collect::<Vec<_>>()
        .join(",")
}
