//! Configuration loading and layering for the CLI.
//!
//! Handles `.fsconf.toml` loading, environment variable resolution,
//! and CLI flag merging with proper priority ordering.

pub mod loader;

pub use loader::{Config, ConfigError, OutputConfig, ResolveConfig};
