//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use std::path::PathBuf;

use fsconf::config::Config;
use fsconf::properties::{ConfigMap, SourceError, source};

/// Build the configuration map for `resolve`.
///
/// Sources from tool config load first, then each `--conf` file in order,
/// then every `--set` override. Later entries win.
pub fn collect_sources(
    config: &Config,
    conf: &[PathBuf],
    overrides: &[String],
) -> Result<ConfigMap, SourceError> {
    let mut map = ConfigMap::new();
    for path in config.resolve.sources.iter().chain(conf) {
        let loaded = source::load(path)?;
        tracing::debug!(path = %path.display(), keys = loaded.len(), "loaded config source");
        map.merge(loaded);
    }
    for raw in overrides {
        let (key, value) = source::parse_override(raw)?;
        map.insert(key, value);
    }
    Ok(map)
}
