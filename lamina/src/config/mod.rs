//! Configuration loading for the bootstrap pipeline.
//!
//! This module resolves which configuration documents apply and merges
//! them into the destination environment:
//!
//! - [`Loader`] drives the profile resolution run: it seeds the
//!   pending-profile queue, drains it while honoring activation and
//!   inclusion declarations embedded in documents, runs a final
//!   catch-all pass, and commits the result.
//! - [`Document`] and [`DocumentCache`] hold parsed content and its
//!   declared profile metadata, memoized per (parser, resource) pair.
//! - [`SourceMerger`] implements the commit with sentinel handling.
//!
//! # Configuration precedence
//!
//! Sources are merged with the following precedence (highest to
//! lowest):
//!
//! 1. Sources for later-processed (more specific) profiles
//! 2. Sources for earlier-processed profiles and the base layer
//! 3. The `defaultProperties` sentinel source, if present
//!
//! Within one profile, later-declared search locations win over
//! earlier-declared ones.

pub mod document;
pub mod loader;
pub mod merger;
pub mod parser;
pub mod profile;

pub use document::{
    Document, DocumentCache, ACTIVE_PROFILES_KEY, INCLUDE_PROFILES_KEY, PROFILES_KEY,
};
pub use loader::{
    Loader, CONFIG_ADDITIONAL_LOCATION_KEY, CONFIG_LOCATION_KEY, CONFIG_NAME_KEY,
};
pub use merger::{SourceMerger, DEFAULT_PROPERTIES};
pub use parser::{DocumentParser, ParsedSource, PropertiesParser, YamlParser};
pub use profile::Profile;
