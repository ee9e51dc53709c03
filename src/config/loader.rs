//! Config struct and loading logic for the `fsconf` tool itself.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.fsconf.toml` in the working directory
//! 4. `~/.config/fsconf/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::backends::Backend;
use crate::constants::{CONFIG_DIR, CONFIG_FILENAME, ENV_ALIASES, ENV_BACKEND, ENV_FORMAT, SPARK_HADOOP_PREFIX};
use crate::env::Env;
use crate::output::OutputFormat;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resolve: ResolveConfig,
    pub output: OutputConfig,
}

/// How connector settings are resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Backend used when `--backend` is not given.
    pub backend: Backend,
    /// Ecosystem prefixes recognised in front of connector keys,
    /// highest precedence first.
    pub aliases: Vec<String>,
    /// Config sources loaded before any `--conf` file.
    pub sources: Vec<PathBuf>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            aliases: vec![SPARK_HADOOP_PREFIX.to_string()],
            sources: Vec::new(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_secrets: bool,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, working-directory config, then applies
    /// environment variable overrides.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: working-directory config
        if let Some(dir) = work_dir {
            let local_path = dir.join(CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    ///
    /// Relative `sources` are resolved against the file's directory and
    /// `aliases` are normalised like `FSCONF_ALIASES`.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        if let Some(base) = path.parent() {
            for source in &mut config.resolve.sources {
                if source.is_relative() {
                    *source = base.join(&*source);
                }
            }
        }
        config.resolve.aliases = normalize_aliases(config.resolve.aliases.iter().map(String::as_str));
        Ok(config)
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        let default_resolve = ResolveConfig::default();
        if other.resolve.backend != default_resolve.backend {
            self.resolve.backend = other.resolve.backend;
        }
        if other.resolve.aliases != default_resolve.aliases {
            self.resolve.aliases = other.resolve.aliases;
        }
        // Sources accumulate: global ones load first, local ones after.
        self.resolve.sources.extend(other.resolve.sources);

        if other.output.format != OutputFormat::default() {
            self.output.format = other.output.format;
        }
        if other.output.show_secrets {
            self.output.show_secrets = true;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(ENV_BACKEND) {
            match val.parse::<Backend>() {
                Ok(backend) => self.resolve.backend = backend,
                Err(_) => warn!(
                    "ignoring invalid {ENV_BACKEND} value: {val} (expected one of {})",
                    Backend::variants()
                ),
            }
        }
        if let Ok(val) = env.var(ENV_FORMAT) {
            match val.parse::<OutputFormat>() {
                Ok(format) => self.output.format = format,
                Err(_) => warn!("ignoring invalid {ENV_FORMAT} value: {val}"),
            }
        }
        if let Ok(val) = env.var(ENV_ALIASES) {
            let aliases = normalize_aliases(val.split(','));
            if aliases.is_empty() {
                warn!("ignoring empty {ENV_ALIASES} value");
            } else {
                self.resolve.aliases = aliases;
            }
        }
    }
}

/// Trim alias prefixes, drop empty ones and make each end with `.`.
fn normalize_aliases<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| if s.ends_with('.') { s.to_string() } else { format!("{s}.") })
        .collect()
}
