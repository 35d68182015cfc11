use crate::map::ConfigMap;
use crate::types::{Fingerprint, ShortFingerprint, VersionToken};
use serde::Serialize;

/// Deterministic identity of one resolution.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolutionIdentity {
    pub fingerprint: Fingerprint,
    pub short: ShortFingerprint,
}

/// Hash resolved values and the optional descriptor token.
///
/// Entries are hashed in key order, so two manifests declaring the same
/// values in a different line order share a fingerprint.
pub fn compute_fingerprint(
    resolved: &ConfigMap,
    token: Option<&VersionToken>,
) -> ResolutionIdentity {
    let mut hasher = blake3::Hasher::new();

    for (key, value) in resolved.to_sorted() {
        hasher.update(format!("entry:{}:{key}={value}\n", key.len()).as_bytes());
    }
    if let Some(token) = token {
        hasher.update(format!("token:{token}\n").as_bytes());
    }

    let hex = hasher.finalize().to_hex().to_string();
    let short = hex[..12].to_owned();

    ResolutionIdentity {
        fingerprint: Fingerprint::new(hex),
        short: ShortFingerprint::new(short),
    }
}
