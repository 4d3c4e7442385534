//! Document parsers for the supported configuration formats.
//!
//! Each parser claims a set of file extensions and turns one resource
//! into zero or more flat key/value sources. An extension is claimed by
//! exactly one parser: the first registered parser wins and later
//! parsers skip it.

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::Result;

/// One flat key/value mapping produced by a parser, with the name the
/// resulting property source will carry.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    /// The property-source name.
    pub source_name: String,
    /// The flattened entries in document order.
    pub entries: Vec<(String, String)>,
}

/// Parses a configuration resource into an ordered sequence of flat
/// key/value sources.
pub trait DocumentParser {
    /// The file extensions this parser can load.
    fn file_extensions(&self) -> &[&str];

    /// Parses the resource content.
    ///
    /// `name` is the logical source name; parsers producing several
    /// documents from one resource derive unique per-document names
    /// from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is syntactically invalid.
    fn parse(&self, name: &str, content: &str) -> Result<Vec<ParsedSource>>;
}

/// YAML parser supporting multi-document streams.
///
/// Nested mappings are flattened to dotted keys and sequences to
/// `key[index]` entries, so `server: { port: 8080 }` becomes
/// `server.port=8080`.
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a YAML parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn flatten(prefix: &str, value: &Value, entries: &mut Vec<(String, String)>) {
        match value {
            Value::Mapping(mapping) => {
                for (key, nested) in mapping {
                    let key = Self::scalar_to_string(key);
                    let path = if prefix.is_empty() {
                        key
                    } else {
                        format!("{prefix}.{key}")
                    };
                    Self::flatten(&path, nested, entries);
                }
            }
            Value::Sequence(sequence) => {
                for (index, nested) in sequence.iter().enumerate() {
                    Self::flatten(&format!("{prefix}[{index}]"), nested, entries);
                }
            }
            Value::Tagged(tagged) => Self::flatten(prefix, &tagged.value, entries),
            scalar => entries.push((prefix.to_string(), Self::scalar_to_string(scalar))),
        }
    }

    fn scalar_to_string(value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            other => serde_yaml::to_string(other)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        }
    }
}

impl DocumentParser for YamlParser {
    fn file_extensions(&self) -> &[&str] {
        &["yml", "yaml"]
    }

    fn parse(&self, name: &str, content: &str) -> Result<Vec<ParsedSource>> {
        let mut values = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            values.push(Value::deserialize(document)?);
        }

        let multiple = values.len() > 1;
        let mut sources = Vec::new();
        for (index, value) in values.iter().enumerate() {
            let mut entries = Vec::new();
            Self::flatten("", value, &mut entries);
            if entries.is_empty() {
                continue;
            }
            let source_name = if multiple {
                format!("{name} (document #{index})")
            } else {
                name.to_string()
            };
            sources.push(ParsedSource {
                source_name,
                entries,
            });
        }
        Ok(sources)
    }
}

/// Line-oriented `key=value` properties parser.
///
/// Supports `=` and `:` separators, `#` and `!` comment lines, and
/// trailing-backslash line continuations. Always produces at most one
/// source per resource.
#[derive(Debug, Clone, Default)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// Creates a properties parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn split_entry(line: &str) -> (String, String) {
        let separator = line
            .char_indices()
            .find(|(_, c)| *c == '=' || *c == ':')
            .map(|(i, _)| i);
        match separator {
            Some(index) => (
                line[..index].trim().to_string(),
                line[index + 1..].trim().to_string(),
            ),
            None => (line.trim().to_string(), String::new()),
        }
    }
}

impl DocumentParser for PropertiesParser {
    fn file_extensions(&self) -> &[&str] {
        &["properties"]
    }

    fn parse(&self, name: &str, content: &str) -> Result<Vec<ParsedSource>> {
        let mut entries = Vec::new();
        let mut pending = String::new();
        for raw_line in content.lines() {
            let line = raw_line.trim_start();
            if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
                continue;
            }
            if let Some(continued) = line.strip_suffix('\\') {
                pending.push_str(continued);
                continue;
            }
            pending.push_str(line);
            let (key, value) = Self::split_entry(&pending);
            if !key.is_empty() {
                entries.push((key, value));
            }
            pending.clear();
        }
        if !pending.is_empty() {
            let (key, value) = Self::split_entry(&pending);
            if !key.is_empty() {
                entries.push((key, value));
            }
        }

        if entries.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![ParsedSource {
            source_name: name.to_string(),
            entries,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_basic() {
        let parser = PropertiesParser::new();
        let sources = parser
            .parse("test", "a=1\nb: two\n# comment\n! also comment\n\nc=3\n")
            .unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(
            sources[0].entries,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "two".to_string()),
                ("c".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_properties_continuation() {
        let parser = PropertiesParser::new();
        let sources = parser.parse("test", "list=a,\\\n  b,\\\n  c\n").unwrap();
        assert_eq!(
            sources[0].entries,
            vec![("list".to_string(), "a,b,c".to_string())]
        );
    }

    #[test]
    fn test_properties_empty_returns_no_documents() {
        let parser = PropertiesParser::new();
        assert!(parser.parse("test", "# only comments\n").unwrap().is_empty());
    }

    #[test]
    fn test_yaml_flattening() {
        let parser = YamlParser::new();
        let sources = parser
            .parse("test", "server:\n  port: 8080\n  hosts:\n    - a\n    - b\nflag: true\n")
            .unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(
            sources[0].entries,
            vec![
                ("server.port".to_string(), "8080".to_string()),
                ("server.hosts[0]".to_string(), "a".to_string()),
                ("server.hosts[1]".to_string(), "b".to_string()),
                ("flag".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_yaml_multi_document() {
        let parser = YamlParser::new();
        let sources = parser
            .parse("test", "a: 1\n---\nprofiles: prod\na: 2\n")
            .unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].source_name, "test (document #0)");
        assert_eq!(sources[1].source_name, "test (document #1)");
        assert_eq!(sources[1].entries[0], ("profiles".to_string(), "prod".to_string()));
    }

    #[test]
    fn test_yaml_invalid_is_error() {
        let parser = YamlParser::new();
        assert!(parser.parse("test", "a: [unclosed\n").is_err());
    }

    #[test]
    fn test_yaml_empty_document_skipped() {
        let parser = YamlParser::new();
        assert!(parser.parse("test", "---\n").unwrap().is_empty());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(YamlParser::new().file_extensions(), &["yml", "yaml"]);
        assert_eq!(PropertiesParser::new().file_extensions(), &["properties"]);
    }
}
