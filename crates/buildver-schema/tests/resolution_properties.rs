use buildver_schema::{
    extract_version_token, normalize_keys, parse_manifest_str, resolve_with_overrides,
    DescriptorError, EnvSnapshot, TagPattern,
};

fn manifests() -> Vec<&'static str> {
    vec![
        "A=1\nB=2\n",
        "A=1\nB=2\nA=3\n",
        "GO_VERSION=1.7.4\nKUBE_VERSION=v1.5.2\nPROTOKUBE_TAG=1.5.0\n",
        "go_version=1.6\nGO_VERSION=1.7\n",
        "",
    ]
}

fn snapshots() -> Vec<EnvSnapshot> {
    vec![
        EnvSnapshot::empty(),
        [("A", "9")].into_iter().collect(),
        [("GO_VERSION", "1.8"), ("UNRELATED", "x")].into_iter().collect(),
        [("A", ""), ("B", "b"), ("go_version", "lower")]
            .into_iter()
            .collect(),
    ]
}

#[test]
fn resolution_preserves_key_set() {
    for text in manifests() {
        let manifest = parse_manifest_str(text).unwrap();
        for env in snapshots() {
            let resolved = resolve_with_overrides(&manifest, &env);
            let want: Vec<_> = manifest.entries().keys().collect();
            let got: Vec<_> = resolved.keys().collect();
            assert_eq!(want, got, "manifest {text:?}");
        }
    }
}

#[test]
fn environment_wins_and_manifest_falls_through() {
    for text in manifests() {
        let manifest = parse_manifest_str(text).unwrap();
        for env in snapshots() {
            let resolved = resolve_with_overrides(&manifest, &env);
            for (key, default) in manifest.entries().iter() {
                let expected = env.get(key).unwrap_or(default);
                assert_eq!(resolved.get(key), Some(expected), "key {key}");
            }
        }
    }
}

#[test]
fn re_resolving_with_empty_environment_is_identity() {
    for text in manifests() {
        let manifest = parse_manifest_str(text).unwrap();
        for env in snapshots() {
            let once = resolve_with_overrides(&manifest, &env);
            let again = resolve_with_overrides(&once.to_manifest(), &EnvSnapshot::empty());
            assert_eq!(once.to_map(), again.to_map());
        }
    }
}

#[test]
fn normalize_keys_is_idempotent() {
    for text in manifests() {
        let manifest = parse_manifest_str(text).unwrap();
        let once = normalize_keys(manifest.entries());
        assert_eq!(once, normalize_keys(&once));
        assert!(once.keys().all(|k| k == k.to_lowercase()));
    }
}

#[test]
fn override_scenario() {
    let manifest = parse_manifest_str("A=1\nB=2\n").unwrap();
    let env: EnvSnapshot = [("A", "9")].into_iter().collect();
    let resolved = resolve_with_overrides(&manifest, &env);
    let pairs: Vec<_> = resolved.to_map().into_iter().collect();
    assert_eq!(
        pairs,
        vec![
            ("A".to_owned(), "9".to_owned()),
            ("B".to_owned(), "2".to_owned())
        ]
    );
}

#[test]
fn extraction_scenarios_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let tag = TagPattern::new("FROM golang:").unwrap();

    let good = dir.path().join("Dockerfile");
    std::fs::write(
        &good,
        ["FROM ubuntu:16.04", "FROM golang:1.7.4", "RUN apt-get update"].join("\n"),
    )
    .unwrap();
    assert_eq!(extract_version_token(&good, &tag).unwrap(), "1.7.4");

    let bad = dir.path().join("Dockerfile.base");
    std::fs::write(&bad, "FROM ubuntu:16.04\nRUN apt-get update\n").unwrap();
    assert!(matches!(
        extract_version_token(&bad, &tag),
        Err(DescriptorError::NotFound { .. })
    ));
}
