use super::{json_pretty, spin_fail, spin_ok, spinner};
use buildver_core::{Handoff, Resolver};
use buildver_schema::EnvSnapshot;

/// Resolve, then hand the version and build root to `command`. Any resolution
/// failure returns before the command is spawned.
pub fn run(resolver: &Resolver, command: &[String], json: bool) -> Result<u8, String> {
    let pb = if json {
        None
    } else {
        Some(spinner("resolving versions..."))
    };

    let prepared = resolver
        .resolve(&EnvSnapshot::capture())
        .map_err(|e| e.to_string())
        .and_then(|resolution| {
            Handoff::from_resolution(&resolution).map_err(|e| e.to_string())
        });

    let handoff = match prepared {
        Ok(h) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, &format!("resolved version {}", h.version));
            }
            h
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "resolution failed");
            }
            return Err(e);
        }
    };

    let code = handoff.run(command).map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "version": handoff.version,
            "build_root": handoff.build_root,
            "fingerprint": handoff.fingerprint,
            "command": command,
            "exit_code": code,
        });
        println!("{}", json_pretty(&payload)?);
    }
    Ok(code)
}
