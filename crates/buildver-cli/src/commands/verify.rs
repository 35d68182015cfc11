use super::{json_pretty, EXIT_SUCCESS};
use buildver_core::Resolver;
use buildver_schema::EnvSnapshot;

pub fn run(resolver: &Resolver, json: bool) -> Result<u8, String> {
    let resolution = resolver
        .resolve(&EnvSnapshot::capture())
        .map_err(|e| e.to_string())?;
    let path = &resolver.config().record;
    let record = resolver
        .verify_record(&resolution, path)
        .map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "status": "ok",
            "record": path,
            "fingerprint": record.fingerprint,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "resolution matches {} ({})",
            path.display(),
            resolution.identity.short
        );
    }
    Ok(EXIT_SUCCESS)
}
