use crate::identity::{compute_fingerprint, ResolutionIdentity};
use crate::map::ConfigMap;
use crate::resolve::ResolvedConfiguration;
use crate::types::VersionToken;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("record file parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("record file serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unsupported record_version: {0}, expected {RECORD_VERSION}")]
    UnsupportedVersion(u32),
    #[error("record fingerprint mismatch: record has '{recorded}', recomputed '{computed}'")]
    FingerprintMismatch { recorded: String, computed: String },
    #[error("resolution drift: {0}")]
    Drift(String),
}

/// Pinned outcome of a resolution, written next to the manifest so later runs
/// can prove they build with the same versions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolutionRecord {
    pub record_version: u32,
    pub fingerprint: String,
    #[serde(default)]
    pub version_token: Option<String>,
    pub entries: BTreeMap<String, String>,
}

impl ResolutionRecord {
    pub fn from_resolution(resolved: &ResolvedConfiguration, token: Option<&VersionToken>) -> Self {
        let map = resolved.to_map();
        let identity = compute_fingerprint(&map, token);
        Self {
            record_version: RECORD_VERSION,
            fingerprint: identity.fingerprint.into_inner(),
            version_token: token.map(|t| t.as_str().to_owned()),
            entries: map.to_sorted(),
        }
    }

    pub fn compute_identity(&self) -> ResolutionIdentity {
        let map: ConfigMap = self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let token = self.version_token.as_deref().map(VersionToken::new);
        compute_fingerprint(&map, token.as_ref())
    }

    /// Check the stored fingerprint against the stored entries.
    pub fn verify_integrity(&self) -> Result<ResolutionIdentity, RecordError> {
        if self.record_version != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion(self.record_version));
        }
        let identity = self.compute_identity();
        if self.fingerprint != identity.fingerprint.as_str() {
            return Err(RecordError::FingerprintMismatch {
                recorded: self.fingerprint.clone(),
                computed: identity.fingerprint.into_inner(),
            });
        }
        Ok(identity)
    }

    /// Compare a fresh resolution with this record, naming the first difference.
    pub fn verify_against(
        &self,
        resolved: &ResolvedConfiguration,
        token: Option<&VersionToken>,
    ) -> Result<(), RecordError> {
        let current = resolved.to_map().to_sorted();

        for (key, recorded) in &self.entries {
            match current.get(key) {
                None => {
                    return Err(RecordError::Drift(format!(
                        "key '{key}' is recorded but no longer declared"
                    )))
                }
                Some(value) if value != recorded => {
                    return Err(RecordError::Drift(format!(
                        "'{key}' changed: record has '{recorded}', resolved '{value}'"
                    )))
                }
                Some(_) => {}
            }
        }
        if let Some(key) = current.keys().find(|k| !self.entries.contains_key(*k)) {
            return Err(RecordError::Drift(format!(
                "key '{key}' is declared but not recorded"
            )));
        }

        let token = token.map(VersionToken::as_str);
        if self.version_token.as_deref() != token {
            return Err(RecordError::Drift(format!(
                "version token changed: record has {}, resolved {}",
                describe(self.version_token.as_deref()),
                describe(token)
            )));
        }
        Ok(())
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        std::io::Write::write_all(&mut tmp, content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| RecordError::Io(e.error))?;
        Ok(())
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

fn describe(token: Option<&str>) -> String {
    token.map_or_else(|| "none".to_owned(), |t| format!("'{t}'"))
}
