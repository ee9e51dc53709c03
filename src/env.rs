//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests and the `--no-env` flag use [`Env::from_vars()`] backed by a
//! `HashMap`, so resolution never needs `unsafe` calls to
//! [`std::env::set_var`] / [`std::env::remove_var`].
//!
//! Reads happen at resolution time. Mutating the process environment while
//! another thread resolves a connector config is the caller's problem.

use std::collections::HashMap;
use std::env::VarError;
use std::ffi::OsString;

/// Environment variable reader.
///
/// Wraps lookups so that production code hits `std::env` while tests
/// can supply a controlled set of values.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, OsString>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn from_vars(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<OsString>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// An environment with no variables set.
    pub fn empty() -> Self {
        Self {
            overrides: Some(HashMap::new()),
        }
    }

    /// Look up an environment variable by name.
    ///
    /// Mirrors [`std::env::var`]: a present value that is not valid UTF-8
    /// yields [`VarError::NotUnicode`], never `NotPresent`.
    pub fn var(&self, name: &str) -> Result<String, VarError> {
        match &self.overrides {
            Some(map) => map
                .get(name)
                .cloned()
                .ok_or(VarError::NotPresent)?
                .into_string()
                .map_err(VarError::NotUnicode),
            None => std::env::var(name),
        }
    }

    /// Returns `true` if the variable is present.
    pub fn is_set(&self, name: &str) -> bool {
        !matches!(self.var(name), Err(VarError::NotPresent))
    }

    /// Return a copy of this environment with `name` set to `value`.
    ///
    /// Only meaningful for map-backed environments; a real environment is
    /// snapshotted into a map first so the process environment is untouched.
    pub fn with_var(&self, name: impl Into<String>, value: impl Into<OsString>) -> Self {
        let mut map = match &self.overrides {
            Some(map) => map.clone(),
            None => snapshot(),
        };
        map.insert(name.into(), value.into());
        Self {
            overrides: Some(map),
        }
    }

    /// Return a copy of this environment with `name` removed.
    pub fn without_var(&self, name: &str) -> Self {
        let mut map = match &self.overrides {
            Some(map) => map.clone(),
            None => snapshot(),
        };
        map.remove(name);
        Self {
            overrides: Some(map),
        }
    }
}

/// Copy of the process environment. Variables whose names are not UTF-8
/// cannot be looked up by `&str` and are skipped.
fn snapshot() -> HashMap<String, OsString> {
    std::env::vars_os()
        .filter_map(|(name, value)| name.into_string().ok().map(|name| (name, value)))
        .collect()
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}
