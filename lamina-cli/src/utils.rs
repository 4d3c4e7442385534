//! Shared helpers for CLI commands.

use std::path::PathBuf;

use lamina::config::{DocumentParser, PropertiesParser, YamlParser};
use lamina::contributor::{collect_entries, flatten_and_sort, RequestingSource};
use lamina::env::{Environment, PropertySource};
use lamina::resource::FsResourceResolver;
use lamina::{ContributorMetadata, FactoryRegistry, Loader, SelectedContributor};

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Directory backing the `classpath:` scheme.
    pub config_dir: PathBuf,

    /// Directory backing the `file:` scheme.
    pub working_dir: PathBuf,

    /// Command-line property overrides (highest precedence).
    pub set: Vec<(String, String)>,

    /// Path to the factory registration file.
    pub registry: Option<PathBuf>,

    /// Path to the contributor metadata file.
    pub metadata: Option<PathBuf>,
}

/// Parses repeated `key=value` override arguments.
pub fn parse_overrides(values: &[String]) -> Result<Vec<(String, String)>, CliError> {
    values
        .iter()
        .map(|value| {
            value
                .split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| {
                    CliError::InvalidArguments(format!("expected key=value, got '{value}'"))
                })
        })
        .collect()
}

/// Runs the configuration load and returns the resolved environment.
pub fn load_environment(global: &GlobalOptions) -> Result<Environment, CliError> {
    let mut environment = Environment::new();
    if !global.set.is_empty() {
        environment
            .sources_mut()
            .add_first(PropertySource::new("commandLine", global.set.clone()));
    }

    let resolver = FsResourceResolver::new(&global.config_dir, &global.working_dir);
    let parsers: Vec<Box<dyn DocumentParser>> = vec![
        Box::new(PropertiesParser::new()),
        Box::new(YamlParser::new()),
    ];
    Loader::new(&mut environment, &resolver, &parsers).load()?;
    Ok(environment)
}

/// Runs contributor selection against the loaded environment.
pub fn select_contributors(
    global: &GlobalOptions,
) -> Result<Vec<SelectedContributor>, CliError> {
    let registry_path = global.registry.as_ref().ok_or_else(|| {
        CliError::InvalidArguments("--registry is required for this command".to_string())
    })?;
    let registry = FactoryRegistry::from_file(registry_path)?;
    let metadata = match &global.metadata {
        Some(path) => ContributorMetadata::from_file(path)?,
        None => ContributorMetadata::new(),
    };

    let environment = load_environment(global)?;
    let sources = [RequestingSource::new("application")];
    let entries = collect_entries(&sources, &registry, &environment, &metadata, &[])?;
    Ok(flatten_and_sort(&entries, &metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let parsed =
            parse_overrides(&["a=1".to_string(), "b = two ".to_string()]).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "two".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_overrides_rejects_missing_separator() {
        assert!(parse_overrides(&["broken".to_string()]).is_err());
    }
}
