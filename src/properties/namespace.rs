//! Ecosystem prefix remapping.
//!
//! Spark forwards Hadoop settings as `spark.hadoop.<hadoop key>`. Connectors
//! expect the bare Hadoop key, so the prefix is stripped and the result is
//! merged into the connector's map.
//!
//! Merge order: every key without the prefix is written first, then every
//! stripped key. When both `spark.hadoop.X` and `X` are present, the
//! prefixed one wins. The resolver applies the same rule (alias keys
//! outrank canonical keys), so a stripped map and the original map resolve
//! to identical values.

use super::ConfigMap;

/// Strip `prefix` from the keys of `source` and merge everything into `dest`.
///
/// Keys not carrying the prefix are copied unchanged. Returns the number of
/// keys that were remapped.
pub fn strip_namespace(source: &ConfigMap, prefix: &str, dest: &mut ConfigMap) -> usize {
    for (key, value) in source.iter() {
        if !key.starts_with(prefix) {
            dest.insert(key, value);
        }
    }

    let mut remapped = 0;
    for (key, value) in source.iter() {
        if let Some(stripped) = key.strip_prefix(prefix) {
            if stripped.is_empty() {
                continue;
            }
            if let Some(previous) = dest.insert(stripped, value) {
                if previous != value {
                    tracing::debug!(
                        prefixed = key,
                        stripped,
                        "prefixed key overrides directly set value"
                    );
                }
            }
            remapped += 1;
        }
    }
    remapped
}

/// Convenience wrapper returning a fresh map.
pub fn with_namespace_stripped(source: &ConfigMap, prefix: &str) -> ConfigMap {
    let mut dest = ConfigMap::new();
    strip_namespace(source, prefix, &mut dest);
    dest
}
