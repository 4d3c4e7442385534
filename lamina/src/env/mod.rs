//! Environment model: property sources, the source collection, and the
//! destination environment.
//!
//! The environment is the single mutable destination of the
//! configuration pipeline. The [`crate::config`] module fills it; the
//! rest of the system reads from it.

pub mod environment;
pub mod source;

pub use environment::{Environment, DEFAULT_PROFILE};
pub use source::{PropertySource, SourceCollection};
