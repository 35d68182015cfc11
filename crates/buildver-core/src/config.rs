use buildver_schema::{DescriptorError, TagPattern};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "buildver.toml";
pub const DEFAULT_MANIFEST: &str = "dependencies";
pub const DEFAULT_RECORD: &str = "buildver.lock";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("descriptor '{}' has no tag (set descriptor.tag or pass --tag)", .0.display())]
    MissingTag(PathBuf),
    #[error("descriptor tag '{0}' given without a descriptor path")]
    MissingDescriptor(String),
    #[error("invalid descriptor tag: {0}")]
    Tag(#[from] DescriptorError),
    #[error("cannot determine current directory: {0}")]
    CurrentDir(std::io::Error),
}

/// On-disk project configuration (`buildver.toml`).
///
/// Relative paths are resolved against the directory holding the file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub manifest: Option<PathBuf>,
    #[serde(default)]
    pub build_root: Option<PathBuf>,
    #[serde(default)]
    pub version_key: Option<String>,
    #[serde(default)]
    pub normalize_keys: bool,
    #[serde(default)]
    pub record: Option<PathBuf>,
    #[serde(default)]
    pub descriptor: Option<DescriptorSection>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DescriptorSection {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub tag: Option<String>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub manifest: Option<PathBuf>,
    pub descriptor: Option<PathBuf>,
    pub tag: Option<String>,
    pub build_root: Option<PathBuf>,
    pub version_key: Option<String>,
    pub normalize_keys: bool,
    pub record: Option<PathBuf>,
}

/// Fully resolved inputs for a [`crate::Resolver`]. All paths are absolute.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub manifest: PathBuf,
    pub descriptor: Option<DescriptorSpec>,
    pub build_root: PathBuf,
    pub version_key: Option<String>,
    pub normalize_keys: bool,
    pub record: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DescriptorSpec {
    pub path: PathBuf,
    pub tag: TagPattern,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: ProjectConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => absolutize(&current_dir()?, p),
            _ => current_dir()?,
        };
        config.rebase(&base);
        Ok(config)
    }

    /// Return `dir/buildver.toml` if it exists.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    }

    fn rebase(&mut self, base: &Path) {
        for p in [&mut self.manifest, &mut self.build_root, &mut self.record] {
            if let Some(path) = p.as_mut() {
                *path = absolutize(base, path);
            }
        }
        if let Some(path) = self.descriptor.as_mut().and_then(|d| d.path.as_mut()) {
            *path = absolutize(base, path);
        }
    }

    /// Layer command-line overrides on top, resolving their paths against `cwd`.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides, cwd: &Path) -> Self {
        let abs = |p: PathBuf| absolutize(cwd, &p);
        if let Some(p) = overrides.manifest {
            self.manifest = Some(abs(p));
        }
        if let Some(p) = overrides.build_root {
            self.build_root = Some(abs(p));
        }
        if let Some(p) = overrides.record {
            self.record = Some(abs(p));
        }
        if let Some(k) = overrides.version_key {
            self.version_key = Some(k);
        }
        if overrides.normalize_keys {
            self.normalize_keys = true;
        }
        if overrides.descriptor.is_some() || overrides.tag.is_some() {
            let section = self.descriptor.get_or_insert_with(DescriptorSection::default);
            if let Some(p) = overrides.descriptor {
                section.path = Some(abs(p));
            }
            if let Some(t) = overrides.tag {
                section.tag = Some(t);
            }
        }
        self
    }

    /// Validate and fill defaults. Paths still relative are resolved against `cwd`.
    pub fn into_resolver_config(self, cwd: &Path) -> Result<ResolverConfig, ConfigError> {
        let descriptor = match self.descriptor {
            None => None,
            Some(DescriptorSection {
                path: None,
                tag: None,
            }) => None,
            Some(DescriptorSection {
                path: Some(path),
                tag: Some(tag),
            }) => Some(DescriptorSpec {
                path: absolutize(cwd, &path),
                tag: TagPattern::new(tag)?,
            }),
            Some(DescriptorSection {
                path: Some(path),
                tag: None,
            }) => return Err(ConfigError::MissingTag(path)),
            Some(DescriptorSection {
                path: None,
                tag: Some(tag),
            }) => return Err(ConfigError::MissingDescriptor(tag)),
        };

        Ok(ResolverConfig {
            manifest: absolutize(
                cwd,
                &self
                    .manifest
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST)),
            ),
            descriptor,
            build_root: absolutize(cwd, &self.build_root.unwrap_or_else(|| PathBuf::from("."))),
            version_key: self.version_key,
            normalize_keys: self.normalize_keys,
            record: absolutize(cwd, &self.record.unwrap_or_else(|| PathBuf::from(DEFAULT_RECORD))),
        })
    }
}

pub fn current_dir() -> Result<PathBuf, ConfigError> {
    std::env::current_dir().map_err(ConfigError::CurrentDir)
}

/// Join `path` onto `base` unless it is already absolute. `.` components are
/// dropped so `base/.` renders as `base`.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    joined
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}
