use super::{json_pretty, EXIT_SUCCESS};
use buildver_schema::{load_manifest, normalize_keys, DependencyManifest};
use std::path::Path;

/// Print `manifest` with every key lower-cased.
pub fn run(manifest: &Path, json: bool) -> Result<u8, String> {
    let parsed = load_manifest(manifest).map_err(|e| format!("manifest error: {e}"))?;
    let normalized = normalize_keys(parsed.entries());

    if json {
        println!("{}", json_pretty(&normalized)?);
    } else {
        print!("{}", DependencyManifest::from(normalized).to_manifest_string());
    }
    Ok(EXIT_SUCCESS)
}
