//! Storage connector backends and their setting tables.
//!
//! Each backend contributes a [`KeyLayout`], a constant setting table and a
//! typed, immutable config object built from a [`Resolver`].

pub mod abfs;
pub mod s3;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::env::Env;
use crate::properties::ConfigMap;
use crate::resolve::{KeyLayout, ResolveError, Resolver, SettingSpec};

pub use abfs::{AbfsAuthType, AbfsConfig};
pub use s3::{RetryMode, S3Config};

/// Supported storage connectors.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Backend {
    /// Amazon S3 via Hadoop S3A keys (`fs.s3a.*`).
    #[default]
    S3,
    /// Azure Data Lake Storage Gen2 via Hadoop ABFS keys (`fs.azure.*`).
    Abfs,
}

impl Backend {
    /// How this backend forms canonical and scoped keys.
    pub fn layout(self) -> KeyLayout {
        match self {
            Backend::S3 => s3::LAYOUT,
            Backend::Abfs => abfs::LAYOUT,
        }
    }

    /// The backend's setting table.
    pub fn settings(self) -> &'static [SettingSpec] {
        match self {
            Backend::S3 => s3::SETTINGS,
            Backend::Abfs => abfs::SETTINGS,
        }
    }

    /// What the scope identifies for this backend.
    pub fn scope_label(self) -> &'static str {
        match self {
            Backend::S3 => "bucket",
            Backend::Abfs => "account",
        }
    }

    /// Build a resolver for this backend.
    pub fn resolver<'a>(self, config: &'a ConfigMap, env: &'a Env) -> Resolver<'a> {
        Resolver::new(config, self.layout(), self.settings(), env)
    }

    /// Fully resolve the typed config, surfacing any malformed value.
    pub fn validate(self, resolver: &Resolver<'_>) -> Result<(), ResolveError> {
        match self {
            Backend::S3 => S3Config::from_resolver(resolver).map(|_| ()),
            Backend::Abfs => AbfsConfig::from_resolver(resolver).map(|_| ()),
        }
    }

    /// Comma-separated list of supported names, for messages.
    pub fn variants() -> String {
        Backend::iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A typed connector config built from resolved settings.
pub trait ConnectorConfig: Sized {
    /// Backend whose table and layout this config reads.
    const BACKEND: Backend;

    /// Build the config from an already scoped resolver.
    fn from_resolver(resolver: &Resolver<'_>) -> Result<Self, ResolveError>;

    /// Resolve `config` for `scope` with the default alias prefixes.
    fn resolve(config: &ConfigMap, scope: Option<&str>, env: &Env) -> Result<Self, ResolveError> {
        let resolver = Self::BACKEND.resolver(config, env).with_scope(scope);
        Self::from_resolver(&resolver)
    }
}
