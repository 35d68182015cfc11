use crate::map::ConfigMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest line {line_no}: '{line}', expected '<key>=<value>'")]
    MissingSeparator { line_no: usize, line: String },
    #[error("malformed manifest line {line_no}: '{line}', key must not be empty")]
    EmptyKey { line_no: usize, line: String },
}

/// Default `key=value` declarations read from a dependency manifest.
///
/// Duplicate keys follow last-write-wins; the entry keeps the position of its
/// first declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyManifest {
    entries: ConfigMap,
}

impl DependencyManifest {
    pub fn entries(&self) -> &ConfigMap {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render back to manifest text, one declaration per line.
    pub fn to_manifest_string(&self) -> String {
        let mut out = String::new();
        for (k, v) in self.entries.iter() {
            out.push_str(k);
            out.push('=');
            out.push_str(v);
            out.push('\n');
        }
        out
    }
}

impl From<ConfigMap> for DependencyManifest {
    fn from(entries: ConfigMap) -> Self {
        Self { entries }
    }
}

pub fn parse_manifest_str(input: &str) -> Result<DependencyManifest, ManifestError> {
    let mut entries = ConfigMap::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let Some((key, value)) = line.split_once('=') else {
            return Err(ManifestError::MissingSeparator {
                line_no,
                line: line.to_owned(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ManifestError::EmptyKey {
                line_no,
                line: line.to_owned(),
            });
        }
        entries.insert(key, value.trim());
    }
    Ok(DependencyManifest { entries })
}

pub fn load_manifest(path: impl AsRef<Path>) -> Result<DependencyManifest, ManifestError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest_str(&content)
}
