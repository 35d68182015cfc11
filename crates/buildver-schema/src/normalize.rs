use crate::map::ConfigMap;

/// Lower-case every key of `mapping`.
///
/// Keys that collide after lower-casing keep the value of the last entry in
/// iteration order. The result is a fresh map; `mapping` is untouched.
pub fn normalize_keys(mapping: &ConfigMap) -> ConfigMap {
    lowercase_keys(mapping.iter().map(|(k, v)| (k, v.to_owned())))
        .into_iter()
        .collect()
}

/// Key lower-casing shared by every normalized view. A colliding key keeps the
/// position of its first occurrence and the payload of its last.
pub(crate) fn lowercase_keys<K, T>(items: impl IntoIterator<Item = (K, T)>) -> Vec<(String, T)>
where
    K: AsRef<str>,
{
    let mut out: Vec<(String, T)> = Vec::new();
    for (key, payload) in items {
        let key = key.as_ref().to_lowercase();
        match out.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = payload,
            None => out.push((key, payload)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> ConfigMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn lowercases_every_key() {
        let out = normalize_keys(&map(&[("GO_VERSION", "1.7.4"), ("Kube", "v1.5")]));
        let keys: Vec<_> = out.keys().collect();
        assert_eq!(keys, vec!["go_version", "kube"]);
        assert_eq!(out.get("go_version"), Some("1.7.4"));
    }

    #[test]
    fn collision_keeps_last_processed() {
        let out = normalize_keys(&map(&[("A", "upper"), ("a", "lower")]));
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("a"), Some("lower"));
    }

    #[test]
    fn values_are_untouched() {
        let out = normalize_keys(&map(&[("K", "MiXeD")]));
        assert_eq!(out.get("k"), Some("MiXeD"));
    }

    #[test]
    fn idempotent() {
        let input = map(&[("B", "2"), ("a", "1"), ("A", "3")]);
        let once = normalize_keys(&input);
        let twice = normalize_keys(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn collision_keeps_first_position() {
        let out = lowercase_keys([("B", 1), ("a", 2), ("b", 3)]);
        assert_eq!(out, vec![("b".to_owned(), 3), ("a".to_owned(), 2)]);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = map(&[("UPPER", "1")]);
        let _ = normalize_keys(&input);
        assert_eq!(input.get("UPPER"), Some("1"));
    }
}
