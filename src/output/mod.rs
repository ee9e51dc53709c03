//! Output renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::backends::Backend;
use crate::resolve::{ResolveError, Resolver, ValueSource};

/// Placeholder shown instead of secret values.
pub const REDACTED: &str = "[REDACTED]";

/// Output format.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    /// Coloured text for humans.
    #[default]
    Terminal,
    /// Machine-readable JSON.
    Json,
}

impl OutputFormat {
    pub fn renderer(self) -> Box<dyn OutputRenderer> {
        match self {
            OutputFormat::Terminal => Box::new(terminal::TerminalRenderer),
            OutputFormat::Json => Box::new(json::JsonRenderer),
        }
    }
}

/// One resolved setting, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub setting: &'static str,
    /// Most specific canonical key for the current scope.
    pub key: String,
    pub value: Option<String>,
    pub source: Option<ValueSource>,
    pub secret: bool,
}

/// Every setting of a backend resolved for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub backend: Backend,
    pub scope: Option<String>,
    pub settings: Vec<ReportEntry>,
}

impl Report {
    /// Build a report, redacting secret values unless `show_secrets`.
    pub fn from_resolver(
        backend: Backend,
        resolver: &Resolver<'_>,
        show_secrets: bool,
    ) -> Result<Self, ResolveError> {
        let settings = resolver
            .resolve_all()?
            .into_iter()
            .map(|(spec, resolved)| {
                let (value, source) = match resolved {
                    Some(r) => (Some(r.value), Some(r.source)),
                    None => (None, None),
                };
                let value = match value {
                    Some(_) if spec.secret && !show_secrets => Some(REDACTED.to_string()),
                    other => other,
                };
                ReportEntry {
                    setting: spec.name,
                    key: resolver.display_key(&spec),
                    value,
                    source,
                    secret: spec.secret,
                }
            })
            .collect();

        Ok(Self {
            backend,
            scope: resolver.scope().map(str::to_string),
            settings,
        })
    }
}

/// One recognised setting and the keys that feed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRow {
    pub setting: &'static str,
    pub key: String,
    pub scoped_key: String,
    pub default: Option<&'static str>,
    pub env: Option<&'static str>,
}

impl KeyRow {
    /// Rows for every setting of `backend`, showing scoped keys for
    /// `scope` (or a `<bucket>` / `<account>` placeholder).
    pub fn for_backend(backend: Backend, scope: Option<&str>) -> Vec<Self> {
        let layout = backend.layout();
        let placeholder = format!("<{}>", backend.scope_label());
        let scope = scope.filter(|s| !s.is_empty()).unwrap_or(&placeholder);
        backend
            .settings()
            .iter()
            .map(|spec| KeyRow {
                setting: spec.name,
                key: layout.key(spec.suffix),
                scoped_key: layout.scoped_key(spec.suffix, scope),
                default: spec.default,
                env: spec.env,
            })
            .collect()
    }
}

/// Trait for rendering resolution results to an output format.
pub trait OutputRenderer {
    /// Render a resolved report to a string.
    fn render(&self, report: &Report) -> String;

    /// Render the table of recognised keys.
    fn render_keys(&self, backend: Backend, rows: &[KeyRow]) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;
    use crate::properties::ConfigMap;

    #[test]
    fn report_redacts_secrets_by_default() {
        let config: ConfigMap = [
            ("spark.hadoop.fs.s3a.access.key", "AKIAEXAMPLE"),
            ("spark.hadoop.fs.s3a.endpoint", "http://minio:9000"),
        ]
        .into_iter()
        .collect();
        let env = Env::empty();
        let resolver = Backend::S3.resolver(&config, &env);

        let report = Report::from_resolver(Backend::S3, &resolver, false).unwrap();
        let access = report.settings.iter().find(|e| e.setting == "access key").unwrap();
        assert_eq!(access.value.as_deref(), Some(REDACTED));
        assert!(access.secret);
        let endpoint = report.settings.iter().find(|e| e.setting == "endpoint").unwrap();
        assert_eq!(endpoint.value.as_deref(), Some("http://minio:9000"));

        let shown = Report::from_resolver(Backend::S3, &resolver, true).unwrap();
        let access = shown.settings.iter().find(|e| e.setting == "access key").unwrap();
        assert_eq!(access.value.as_deref(), Some("AKIAEXAMPLE"));
    }

    #[test]
    fn report_keys_follow_scope() {
        let config = ConfigMap::new();
        let env = Env::empty();
        let resolver = Backend::S3.resolver(&config, &env).with_scope(Some("foo"));
        let report = Report::from_resolver(Backend::S3, &resolver, false).unwrap();
        assert_eq!(report.scope.as_deref(), Some("foo"));
        assert_eq!(report.settings[0].key, "fs.s3a.bucket.foo.access.key");
        assert_eq!(report.settings[0].value, None);
    }

    #[test]
    fn key_rows_use_placeholder_without_scope() {
        let rows = KeyRow::for_backend(Backend::Abfs, None);
        let key = rows.iter().find(|r| r.setting == "account key").unwrap();
        assert_eq!(key.key, "fs.azure.account.key");
        assert_eq!(key.scoped_key, "fs.azure.account.key.<account>.dfs.core.windows.net");
        assert_eq!(key.env, Some("AZURE_STORAGE_ACCOUNT_KEY"));
    }

    #[test]
    fn output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::Terminal.to_string(), "terminal");
    }
}
