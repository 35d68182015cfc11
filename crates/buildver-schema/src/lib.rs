//! Version resolution for build and provisioning pipelines.
//!
//! This crate is the resolver proper: `key=value` dependency manifest parsing
//! (`DependencyManifest`), environment overrides applied from an explicit
//! snapshot (`resolve_with_overrides`), key normalization, version token
//! extraction from build descriptors (`extract_version_token`), resolution
//! fingerprints, and the record file used to detect drift between runs.

pub mod descriptor;
pub mod env;
pub mod identity;
pub mod manifest;
pub mod map;
pub mod normalize;
pub mod record;
pub mod resolve;
pub mod types;

pub use descriptor::{
    extract_version_token, extract_version_token_str, DescriptorError, TagPattern,
};
pub use env::EnvSnapshot;
pub use identity::{compute_fingerprint, ResolutionIdentity};
pub use manifest::{load_manifest, parse_manifest_str, DependencyManifest, ManifestError};
pub use map::ConfigMap;
pub use normalize::normalize_keys;
pub use record::{RecordError, ResolutionRecord, RECORD_VERSION};
pub use resolve::{resolve_with_overrides, ResolvedConfiguration, ResolvedEntry, ValueSource};
pub use types::{Fingerprint, ShortFingerprint, VersionToken};
