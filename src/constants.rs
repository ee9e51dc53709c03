//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and key namespaces so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "fsconf";

/// Crate version, as reported by `fsconf --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.fsconf.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".fsconf.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "fsconf";

/// Ecosystem prefix Spark puts in front of Hadoop configuration keys.
pub const SPARK_HADOOP_PREFIX: &str = "spark.hadoop.";

// ── Tool environment variable names ─────────────────────────────────

pub const ENV_BACKEND: &str = "FSCONF_BACKEND";
pub const ENV_FORMAT: &str = "FSCONF_FORMAT";
pub const ENV_ALIASES: &str = "FSCONF_ALIASES";
pub const ENV_LOG: &str = "FSCONF_LOG";

// ── Connector environment variable names ────────────────────────────

pub const AWS_ENDPOINT: &str = "AWS_ENDPOINT";
pub const AWS_MAX_ATTEMPTS: &str = "AWS_MAX_ATTEMPTS";
pub const AWS_RETRY_MODE: &str = "AWS_RETRY_MODE";
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

pub const AZURE_STORAGE_ACCOUNT_KEY: &str = "AZURE_STORAGE_ACCOUNT_KEY";
pub const AZURE_STORAGE_SAS_TOKEN: &str = "AZURE_STORAGE_SAS_TOKEN";
pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
