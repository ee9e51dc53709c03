//! Errors raised while resolving connector settings.

use thiserror::Error;

/// Errors during setting resolution and at the point of use.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A value is present but does not match the setting's grammar.
    ///
    /// `key` is the configuration key or environment variable the value
    /// was read from.
    #[error("invalid value for {key}: '{value}' is not a valid {expected}")]
    Parse {
        key: String,
        value: String,
        expected: &'static str,
    },

    /// A setting with no default resolved to nothing where the caller
    /// needs it.
    #[error("missing required setting {key}")]
    Missing { key: String },
}

impl ResolveError {
    pub(crate) fn parse(key: impl Into<String>, value: impl Into<String>, expected: &'static str) -> Self {
        Self::Parse {
            key: key.into(),
            value: value.into(),
            expected,
        }
    }

    pub(crate) fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    /// The key (or environment variable) the error is about.
    pub fn key(&self) -> &str {
        match self {
            Self::Parse { key, .. } | Self::Missing { key } => key,
        }
    }
}
