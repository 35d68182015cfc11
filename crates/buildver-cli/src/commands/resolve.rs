use super::{colorize_source, json_pretty, EXIT_SUCCESS};
use buildver_core::{Resolution, Resolver};
use buildver_schema::EnvSnapshot;

pub fn run(resolver: &Resolver, write_record: bool, json: bool) -> Result<u8, String> {
    let env = EnvSnapshot::capture();
    let resolution = resolver.resolve(&env).map_err(|e| e.to_string())?;

    let record_path = &resolver.config().record;
    if write_record {
        resolver
            .write_record(&resolution, record_path)
            .map_err(|e| e.to_string())?;
    }

    if json {
        println!("{}", json_pretty(&resolution)?);
    } else {
        print_human(&resolution);
        if write_record {
            println!("record: {}", record_path.display());
        }
    }
    Ok(EXIT_SUCCESS)
}

fn print_human(resolution: &Resolution) {
    let width = resolution
        .configuration
        .entries()
        .iter()
        .map(|e| e.key.len() + e.value.len() + 1)
        .max()
        .unwrap_or(0);
    for e in resolution.configuration.entries() {
        let pair = format!("{}={}", e.key, e.value);
        println!("{pair:<width$}  ({})", colorize_source(e.source));
    }
    if let Some(token) = &resolution.version_token {
        println!("version token: {token}");
    }
    println!("fingerprint: {}", resolution.identity.short);
}
