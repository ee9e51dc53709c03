//! Setting resolution with scope and environment precedence.
//!
//! For every logical setting the resolver walks, highest precedence first:
//!
//! 1. The whitelisted environment variable, if the setting has one
//! 2. Scoped key under each ecosystem alias (e.g. `spark.hadoop.fs.s3a.bucket.foo.endpoint`)
//! 3. Scoped canonical key (`fs.s3a.bucket.foo.endpoint`)
//! 4. Unscoped key under each ecosystem alias (`spark.hadoop.fs.s3a.endpoint`)
//! 5. Unscoped canonical key (`fs.s3a.endpoint`)
//! 6. The built-in default from the setting table

pub mod error;
pub mod value;

use std::env::VarError;

use serde::Serialize;
use tracing::debug;

use crate::constants::SPARK_HADOOP_PREFIX;
use crate::env::Env;
use crate::properties::ConfigMap;

pub use error::ResolveError;
pub use value::{ConfigDuration, FromConfigValue};

/// One row of a backend's setting table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingSpec {
    /// Logical name, e.g. `"access key"`.
    pub name: &'static str,
    /// Key suffix below the backend namespace, e.g. `"access.key"`.
    pub suffix: &'static str,
    /// Textual default, parsed with the setting's grammar.
    pub default: Option<&'static str>,
    /// Environment variable that overrides configuration.
    pub env: Option<&'static str>,
    /// Redact the value in output.
    pub secret: bool,
}

/// How a backend forms canonical and scoped keys from a suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLayout {
    /// Scope inserted after the namespace: `fs.s3a.bucket.<scope>.<suffix>`.
    Infix {
        prefix: &'static str,
        segment: &'static str,
    },
    /// Scope appended after the suffix:
    /// `fs.azure.<suffix>.<scope>.dfs.core.windows.net`.
    Suffix {
        prefix: &'static str,
        host_suffix: &'static str,
    },
}

impl KeyLayout {
    /// The unscoped canonical key for `suffix`.
    pub fn key(&self, suffix: &str) -> String {
        match self {
            Self::Infix { prefix, .. } | Self::Suffix { prefix, .. } => format!("{prefix}{suffix}"),
        }
    }

    /// The canonical key for `suffix` narrowed to `scope`.
    pub fn scoped_key(&self, suffix: &str, scope: &str) -> String {
        match self {
            Self::Infix { prefix, segment } => format!("{prefix}{segment}.{scope}.{suffix}"),
            Self::Suffix {
                prefix,
                host_suffix,
            } => format!("{prefix}{suffix}.{scope}{host_suffix}"),
        }
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ValueSource {
    Environment(String),
    ScopedAlias(String),
    Scoped(String),
    Alias(String),
    Canonical(String),
    Default,
}

impl ValueSource {
    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Environment(_) => "env",
            Self::ScopedAlias(_) => "scoped alias",
            Self::Scoped(_) => "scoped",
            Self::Alias(_) => "alias",
            Self::Canonical(_) => "canonical",
            Self::Default => "default",
        }
    }

    /// The key or variable name the value was read from.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Environment(n)
            | Self::ScopedAlias(n)
            | Self::Scoped(n)
            | Self::Alias(n)
            | Self::Canonical(n) => Some(n),
            Self::Default => None,
        }
    }
}

/// A raw value together with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub value: String,
    pub source: ValueSource,
}

/// Resolves settings of one backend for one scope.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    config: &'a ConfigMap,
    layout: KeyLayout,
    settings: &'a [SettingSpec],
    env: &'a Env,
    scope: Option<String>,
    aliases: Vec<String>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over `config` with the `spark.hadoop.` alias and
    /// no scope.
    pub fn new(
        config: &'a ConfigMap,
        layout: KeyLayout,
        settings: &'a [SettingSpec],
        env: &'a Env,
    ) -> Self {
        Self {
            config,
            layout,
            settings,
            env,
            scope: None,
            aliases: vec![SPARK_HADOOP_PREFIX.to_string()],
        }
    }

    /// Narrow resolution to `scope`. An empty scope means global only.
    pub fn with_scope(mut self, scope: Option<&str>) -> Self {
        self.scope = scope.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    /// Replace the ecosystem alias prefixes, highest precedence first.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn layout(&self) -> KeyLayout {
        self.layout
    }

    pub fn settings(&self) -> &'a [SettingSpec] {
        self.settings
    }

    /// Config-map keys consulted for `spec`, in precedence order.
    pub fn candidates(&self, spec: &SettingSpec) -> Vec<(String, ValueSource)> {
        let mut out = Vec::with_capacity(2 * (self.aliases.len() + 1));
        if let Some(scope) = &self.scope {
            let scoped = self.layout.scoped_key(spec.suffix, scope);
            for alias in &self.aliases {
                let key = format!("{alias}{scoped}");
                out.push((key.clone(), ValueSource::ScopedAlias(key)));
            }
            out.push((scoped.clone(), ValueSource::Scoped(scoped)));
        }
        let canonical = self.layout.key(spec.suffix);
        for alias in &self.aliases {
            let key = format!("{alias}{canonical}");
            out.push((key.clone(), ValueSource::Alias(key)));
        }
        out.push((canonical.clone(), ValueSource::Canonical(canonical)));
        out
    }

    /// Find the raw value for `spec` without parsing it.
    ///
    /// Errors only when the setting's environment variable is present but
    /// not valid UTF-8.
    pub fn lookup(&self, spec: &SettingSpec) -> Result<Option<Resolved>, ResolveError> {
        let resolved = self.lookup_inner(spec)?;
        match &resolved {
            Some(r) => debug!(
                setting = spec.name,
                source = r.source.label(),
                from = r.source.name().unwrap_or("-"),
                "resolved setting"
            ),
            None => debug!(setting = spec.name, "setting not set"),
        }
        Ok(resolved)
    }

    fn lookup_inner(&self, spec: &SettingSpec) -> Result<Option<Resolved>, ResolveError> {
        if let Some(var) = spec.env {
            match self.env.var(var) {
                Ok(value) => {
                    return Ok(Some(Resolved {
                        value: value.trim().to_string(),
                        source: ValueSource::Environment(var.to_string()),
                    }));
                }
                Err(VarError::NotUnicode(raw)) => {
                    return Err(ResolveError::parse(var, raw.to_string_lossy(), "UTF-8 string"));
                }
                Err(VarError::NotPresent) => {}
            }
        }

        for (key, source) in self.candidates(spec) {
            if let Some(value) = self.config.get(&key) {
                return Ok(Some(Resolved {
                    value: value.trim().to_string(),
                    source,
                }));
            }
        }

        Ok(spec.default.map(|value| Resolved {
            value: value.to_string(),
            source: ValueSource::Default,
        }))
    }

    /// Resolve and parse `spec`. `Ok(None)` means unset with no default.
    pub fn get<T: FromConfigValue>(&self, spec: &SettingSpec) -> Result<Option<T>, ResolveError> {
        let Some(resolved) = self.lookup(spec)? else {
            return Ok(None);
        };
        let key = match resolved.source.name() {
            Some(name) => name.to_string(),
            None => self.layout.key(spec.suffix),
        };
        T::from_config_value(&key, &resolved.value).map(Some)
    }

    /// Resolve and parse a setting that must have a value.
    pub fn require<T: FromConfigValue>(&self, spec: &SettingSpec) -> Result<T, ResolveError> {
        self.get(spec)?
            .ok_or_else(|| ResolveError::missing(self.display_key(spec)))
    }

    /// Raw resolution of every setting in the table, in table order.
    pub fn resolve_all(&self) -> Result<Vec<(SettingSpec, Option<Resolved>)>, ResolveError> {
        self.settings
            .iter()
            .map(|spec| Ok((*spec, self.lookup(spec)?)))
            .collect()
    }

    /// The most specific canonical key for `spec` under the current scope.
    pub fn display_key(&self, spec: &SettingSpec) -> String {
        match &self.scope {
            Some(scope) => self.layout.scoped_key(spec.suffix, scope),
            None => self.layout.key(spec.suffix),
        }
    }
}
