//! Typed parsing of raw configuration strings.
//!
//! Every setting type implements [`FromConfigValue`]. Parsing is explicit
//! and returns a [`ResolveError::Parse`] naming the key on failure, so
//! malformed input never silently turns into a default.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use super::error::ResolveError;

static DURATION_RE: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    regex::Regex::new(r"^(\d+(?:\.\d+)?)\s*(ns|us|ms|s|m|h|d)$").unwrap()
});

/// A type that can be parsed from a raw configuration value.
pub trait FromConfigValue: Sized {
    /// Human readable name of the grammar, used in error messages.
    const EXPECTED: &'static str;

    /// Parse `raw` (already trimmed) read from `key`.
    fn from_config_value(key: &str, raw: &str) -> Result<Self, ResolveError>;
}

impl FromConfigValue for String {
    const EXPECTED: &'static str = "string";

    fn from_config_value(_key: &str, raw: &str) -> Result<Self, ResolveError> {
        Ok(raw.to_string())
    }
}

impl FromConfigValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_config_value(key: &str, raw: &str) -> Result<Self, ResolveError> {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ResolveError::parse(key, raw, Self::EXPECTED)),
        }
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl FromConfigValue for $ty {
                const EXPECTED: &'static str = "integer";

                fn from_config_value(key: &str, raw: &str) -> Result<Self, ResolveError> {
                    raw.parse::<$ty>()
                        .map_err(|_| ResolveError::parse(key, raw, Self::EXPECTED))
                }
            }
        )*
    };
}

impl_integer!(i32, i64, u32, u64, usize);

/// A duration that remembers how it was written.
///
/// Connectors hand the original text (e.g. `"200s"`) to their client
/// libraries, so equality and display use the raw form while
/// [`ConfigDuration::as_duration`] exposes the parsed value.
#[derive(Clone, PartialEq, Eq)]
pub struct ConfigDuration {
    raw: String,
    duration: Duration,
}

impl ConfigDuration {
    /// The text as it appeared in configuration.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed duration.
    pub fn as_duration(&self) -> Duration {
        self.duration
    }
}

impl FromConfigValue for ConfigDuration {
    const EXPECTED: &'static str = "duration (e.g. 200s, 1500ms, 2m)";

    fn from_config_value(key: &str, raw: &str) -> Result<Self, ResolveError> {
        let err = || ResolveError::parse(key, raw, Self::EXPECTED);
        let caps = DURATION_RE.captures(raw).ok_or_else(err)?;
        let amount: f64 = caps[1].parse().map_err(|_| err())?;
        let unit_secs = match &caps[2] {
            "ns" => 1e-9,
            "us" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3_600.0,
            "d" => 86_400.0,
            _ => return Err(err()),
        };
        let duration = Duration::try_from_secs_f64(amount * unit_secs).map_err(|_| err())?;
        Ok(Self {
            raw: raw.to_string(),
            duration,
        })
    }
}

impl fmt::Display for ConfigDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for ConfigDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({:?})", self.raw, self.duration)
    }
}

impl PartialEq<&str> for ConfigDuration {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl Serialize for ConfigDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
