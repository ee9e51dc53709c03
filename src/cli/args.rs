//! Clap argument types.

use clap::Parser;
use std::path::PathBuf;

use fsconf::backends::Backend;
use fsconf::output::OutputFormat;

/// Resolve Spark/Hadoop filesystem settings for storage connectors.
#[derive(Parser, Debug)]
#[command(name = fsconf::constants::APP_NAME, version = fsconf::constants::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Resolve connector settings from configuration sources.
    Resolve(ResolveArgs),

    /// List the recognised settings of a backend and their keys.
    Keys(KeysArgs),
}

/// Arguments for the `resolve` subcommand.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Storage backend (default from config, else s3).
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Bucket (s3) or storage account (abfs) to resolve for.
    #[arg(long)]
    pub scope: Option<String>,

    /// Configuration source: spark-defaults.conf / properties, or .toml.
    /// May be repeated; later files win.
    #[arg(long = "conf")]
    pub conf: Vec<PathBuf>,

    /// Inline KEY=VALUE override, applied after all files.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Ignore environment variable overrides.
    #[arg(long, default_value_t = false)]
    pub no_env: bool,

    /// Output format.
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Print secret values instead of redacting them.
    #[arg(long, default_value_t = false)]
    pub show_secrets: bool,
}

/// Arguments for the `keys` subcommand.
#[derive(Parser, Debug)]
pub struct KeysArgs {
    /// Storage backend (default from config, else s3).
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Show scoped keys for this bucket / account.
    #[arg(long)]
    pub scope: Option<String>,

    /// Output format.
    #[arg(long)]
    pub format: Option<OutputFormat>,
}
