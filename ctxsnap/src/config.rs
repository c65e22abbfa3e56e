//! Snapshot configuration, loadable from TOML.
//!
//! ```toml
//! [snapshot]
//! skip_unchanged_updates = true
//! ignored_attributes = ["^updated_at$"]
//! entities = ["Article"]
//! ```

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Configuration file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub snapshot: SnapshotSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSettings {
    /// Drop update records whose attributes did not actually change.
    #[serde(default = "default_skip_unchanged_updates")]
    pub skip_unchanged_updates: bool,
    /// Regex patterns of attribute names left out of update diffs.
    #[serde(default)]
    pub ignored_attributes: Vec<String>,
    /// Entity names to record; every entity when absent.
    #[serde(default)]
    pub entities: Option<Vec<String>>,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            skip_unchanged_updates: default_skip_unchanged_updates(),
            ignored_attributes: Vec::new(),
            entities: None,
        }
    }
}

fn default_skip_unchanged_updates() -> bool {
    true
}

impl SnapshotConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Compiles the settings into options a snapshot can apply.
    pub fn options(&self) -> Result<SnapshotOptions, ConfigError> {
        let settings = &self.snapshot;
        let mut options = SnapshotOptions::new().skip_unchanged_updates(settings.skip_unchanged_updates);
        for pattern in &settings.ignored_attributes {
            options = options.ignore_attributes(pattern)?;
        }
        if let Some(entities) = &settings.entities {
            options = options.only_entities(entities.iter().cloned());
        }
        Ok(options)
    }
}

/// Compiled snapshot options.
///
/// The default options record every entity and every differing attribute,
/// and drop updates without differences.
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    skip_unchanged_updates: bool,
    ignored_attributes: Vec<Regex>,
    entities: Option<Vec<String>>,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            skip_unchanged_updates: true,
            ignored_attributes: Vec::new(),
            entities: None,
        }
    }
}

impl SnapshotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_unchanged_updates(mut self, skip: bool) -> Self {
        self.skip_unchanged_updates = skip;
        self
    }

    /// Leaves attributes matching `pattern` out of update diffs.
    pub fn ignore_attributes(mut self, pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.ignored_attributes.push(regex);
        Ok(self)
    }

    pub fn only_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = Some(entities.into_iter().map(Into::into).collect());
        self
    }

    pub fn skips_unchanged_updates(&self) -> bool {
        self.skip_unchanged_updates
    }

    pub fn ignores_attribute(&self, name: &str) -> bool {
        self.ignored_attributes.iter().any(|pattern| pattern.is_match(name))
    }

    pub fn includes_entity(&self, entity_name: &str) -> bool {
        match &self.entities {
            Some(entities) => entities.iter().any(|entity| entity == entity_name),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SnapshotConfig::from_toml_str("").unwrap();
        assert!(config.snapshot.skip_unchanged_updates);
        assert!(config.snapshot.ignored_attributes.is_empty());
        assert!(config.snapshot.entities.is_none());
    }

    #[test]
    fn options_compile_patterns_and_entities() {
        let config = SnapshotConfig::from_toml_str(
            r#"
            [snapshot]
            skip_unchanged_updates = false
            ignored_attributes = ["^updated_at$", "_cache$"]
            entities = ["Article"]
            "#,
        )
        .unwrap();
        let options = config.options().unwrap();

        assert!(!options.skips_unchanged_updates());
        assert!(options.ignores_attribute("updated_at"));
        assert!(options.ignores_attribute("render_cache"));
        assert!(!options.ignores_attribute("title"));
        assert!(options.includes_entity("Article"));
        assert!(!options.includes_entity("Tag"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let config = SnapshotConfig::from_toml_str("[snapshot]\nignored_attributes = [\"(\"]").unwrap();
        let err = config.options().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SnapshotConfig::from_toml_str("[snapshot\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
