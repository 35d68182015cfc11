use crate::env::EnvSnapshot;
use crate::manifest::DependencyManifest;
use crate::map::ConfigMap;
use crate::normalize::lowercase_keys;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Manifest,
    Environment,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Manifest => f.write_str("manifest"),
            ValueSource::Environment => f.write_str("environment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntry {
    pub key: String,
    pub value: String,
    pub source: ValueSource,
}

/// Manifest defaults with environment overrides applied.
///
/// Has exactly the manifest's key set, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfiguration {
    entries: Vec<ResolvedEntry>,
}

impl ResolvedConfiguration {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).map(|e| e.value.as_str())
    }

    pub fn entry(&self, key: &str) -> Option<&ResolvedEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn entries(&self) -> &[ResolvedEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn overridden_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.source == ValueSource::Environment)
            .count()
    }

    pub fn to_map(&self) -> ConfigMap {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }

    /// Treat the resolved values as a fresh manifest.
    pub fn to_manifest(&self) -> DependencyManifest {
        DependencyManifest::from(self.to_map())
    }

    /// Rebuild the configuration with every key lower-cased. Collisions keep the
    /// last-processed entry.
    #[must_use]
    pub fn with_normalized_keys(&self) -> Self {
        let entries = lowercase_keys(
            self.entries
                .iter()
                .map(|e| (e.key.as_str(), (e.value.clone(), e.source))),
        )
        .into_iter()
        .map(|(key, (value, source))| ResolvedEntry { key, value, source })
        .collect();
        Self { entries }
    }
}

/// Overlay same-named environment variables onto manifest defaults.
///
/// Environment variables with no matching manifest key are ignored.
pub fn resolve_with_overrides(
    manifest: &DependencyManifest,
    env: &EnvSnapshot,
) -> ResolvedConfiguration {
    let entries = manifest
        .entries()
        .iter()
        .map(|(key, default)| match env.get(key) {
            Some(over) => ResolvedEntry {
                key: key.to_owned(),
                value: over.to_owned(),
                source: ValueSource::Environment,
            },
            None => ResolvedEntry {
                key: key.to_owned(),
                value: default.to_owned(),
                source: ValueSource::Manifest,
            },
        })
        .collect();
    ResolvedConfiguration { entries }
}
