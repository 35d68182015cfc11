//! Orchestration layer for buildver.
//!
//! This crate ties the schema-level resolver to the outside world: project
//! configuration (`buildver.toml`) with command-line overrides, the `Resolver`
//! that runs a complete resolution against an environment snapshot, resolution
//! records, and the `Handoff` that passes the resolved version and build root
//! to an external build or provisioning command.

pub mod config;
pub mod engine;
pub mod handoff;

pub use config::{
    absolutize, ConfigError, ConfigOverrides, DescriptorSection, DescriptorSpec, ProjectConfig,
    ResolverConfig, DEFAULT_CONFIG_FILE, DEFAULT_MANIFEST, DEFAULT_RECORD,
};
pub use engine::{Resolution, Resolver};
pub use handoff::{Handoff, ENV_BUILD_ROOT, ENV_FINGERPRINT, ENV_VERSION};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] buildver_schema::ManifestError),
    #[error("descriptor error: {0}")]
    Descriptor(#[from] buildver_schema::DescriptorError),
    #[error("record error: {0}")]
    Record(#[from] buildver_schema::RecordError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("no version to hand off: {0}")]
    NoVersion(String),
    #[error("no command given to run")]
    EmptyCommand,
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
