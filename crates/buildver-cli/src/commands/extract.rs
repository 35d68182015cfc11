use super::{json_pretty, EXIT_SUCCESS};
use buildver_core::Resolver;
use buildver_schema::extract_version_token;

pub fn run(resolver: &Resolver, json: bool) -> Result<u8, String> {
    let spec = resolver.config().descriptor.as_ref().ok_or_else(|| {
        "descriptor error: no descriptor configured (pass a file and --tag)".to_owned()
    })?;
    let token =
        extract_version_token(&spec.path, &spec.tag).map_err(|e| format!("descriptor error: {e}"))?;

    if json {
        let payload = serde_json::json!({
            "descriptor": spec.path,
            "tag": spec.tag.as_str(),
            "version_token": token,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("{token}");
    }
    Ok(EXIT_SUCCESS)
}
