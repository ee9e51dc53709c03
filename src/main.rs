//! fsconf — resolve Spark/Hadoop filesystem settings for storage connectors.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::args::{Cli, Command, KeysArgs, ResolveArgs};
use fsconf::config::Config;
use fsconf::constants::ENV_LOG;
use fsconf::env::Env;
use fsconf::output::{KeyRow, Report};

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `FSCONF_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let work_dir = std::env::current_dir().context("failed to determine working directory")?;
    let config = Config::load(Some(work_dir.as_path()), &Env::real()).context("failed to load fsconf config")?;

    match cli.command {
        Command::Resolve(args) => run_resolve(args, &config),
        Command::Keys(args) => run_keys(args, &config),
    }
}

/// Resolve a backend's settings and print them.
fn run_resolve(args: ResolveArgs, config: &Config) -> Result<()> {
    let backend = args.backend.unwrap_or(config.resolve.backend);
    let format = args.format.unwrap_or(config.output.format);
    let show_secrets = args.show_secrets || config.output.show_secrets;

    let map = cli::collect_sources(config, &args.conf, &args.set)
        .context("failed to load configuration sources")?;
    let env = if args.no_env { Env::empty() } else { Env::real() };

    let resolver = backend
        .resolver(&map, &env)
        .with_scope(args.scope.as_deref())
        .with_aliases(config.resolve.aliases.iter().cloned());

    backend
        .validate(&resolver)
        .with_context(|| format!("invalid {backend} configuration"))?;

    let report = Report::from_resolver(backend, &resolver, show_secrets)?;
    print!("{}", format.renderer().render(&report));
    Ok(())
}

/// List the settings a backend recognises.
fn run_keys(args: KeysArgs, config: &Config) -> Result<()> {
    let backend = args.backend.unwrap_or(config.resolve.backend);
    let format = args.format.unwrap_or(config.output.format);
    let rows = KeyRow::for_backend(backend, args.scope.as_deref());
    print!("{}", format.renderer().render_keys(backend, &rows));
    Ok(())
}
