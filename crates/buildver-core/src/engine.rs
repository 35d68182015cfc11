use crate::config::ResolverConfig;
use crate::CoreError;
use buildver_schema::{
    compute_fingerprint, extract_version_token, load_manifest, resolve_with_overrides,
    EnvSnapshot, ResolutionIdentity, ResolutionRecord, ResolvedConfiguration, VersionToken,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runs one full resolution: manifest, overrides, descriptor token, fingerprint.
///
/// Holds only configuration; every call re-reads its inputs from disk.
pub struct Resolver {
    config: ResolverConfig,
}

/// Outcome of [`Resolver::resolve`].
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub manifest: PathBuf,
    pub build_root: PathBuf,
    pub configuration: ResolvedConfiguration,
    pub version_token: Option<VersionToken>,
    pub identity: ResolutionIdentity,
    #[serde(skip)]
    version_key: Option<String>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolve(&self, env: &EnvSnapshot) -> Result<Resolution, CoreError> {
        info!("resolving versions from {}", self.config.manifest.display());
        let manifest = load_manifest(&self.config.manifest)?;
        debug!("manifest declares {} keys", manifest.len());

        let mut configuration = resolve_with_overrides(&manifest, env);
        debug!(
            "{} of {} keys overridden from environment",
            configuration.overridden_count(),
            configuration.len()
        );
        if self.config.normalize_keys {
            configuration = configuration.with_normalized_keys();
        }

        let version_token = match &self.config.descriptor {
            Some(spec) => {
                let token = extract_version_token(&spec.path, &spec.tag)?;
                info!(
                    "version token '{token}' from {} (tag '{}')",
                    spec.path.display(),
                    spec.tag
                );
                Some(token)
            }
            None => None,
        };

        let version_key = if self.config.normalize_keys {
            self.config.version_key.as_deref().map(str::to_lowercase)
        } else {
            self.config.version_key.clone()
        };

        let identity = compute_fingerprint(&configuration.to_map(), version_token.as_ref());
        debug!("resolution fingerprint {}", identity.fingerprint);

        Ok(Resolution {
            manifest: self.config.manifest.clone(),
            build_root: self.config.build_root.clone(),
            configuration,
            version_token,
            identity,
            version_key,
        })
    }

    pub fn write_record(&self, resolution: &Resolution, path: &Path) -> Result<(), CoreError> {
        let record = resolution.record();
        record.write_to_file(path)?;
        info!("wrote resolution record {}", path.display());
        Ok(())
    }

    /// Load the record at `path`, check it is untampered, and compare it with
    /// `resolution`.
    pub fn verify_record(
        &self,
        resolution: &Resolution,
        path: &Path,
    ) -> Result<ResolutionRecord, CoreError> {
        let record = ResolutionRecord::read_from_file(path)?;
        record.verify_integrity()?;
        record.verify_against(&resolution.configuration, resolution.version_token.as_ref())?;
        debug!("record {} matches resolution", path.display());
        Ok(record)
    }
}

impl Resolution {
    /// Version handed to external collaborators: the descriptor token when one
    /// was extracted, else the resolved value of the configured version key.
    pub fn version(&self) -> Result<&str, CoreError> {
        if let Some(token) = &self.version_token {
            return Ok(token.as_str());
        }
        let Some(key) = &self.version_key else {
            return Err(CoreError::NoVersion(
                "no descriptor configured and no version_key set".to_owned(),
            ));
        };
        self.configuration.get(key).ok_or_else(|| {
            CoreError::NoVersion(format!(
                "version_key '{key}' is not declared in {}",
                self.manifest.display()
            ))
        })
    }

    pub fn record(&self) -> ResolutionRecord {
        ResolutionRecord::from_resolution(&self.configuration, self.version_token.as_ref())
    }
}
