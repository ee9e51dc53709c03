//! Loading a [`ConfigMap`] from files and command-line overrides.
//!
//! Two formats are understood:
//!
//! - `spark-defaults.conf` / Java properties: `key=value`, `key: value`
//!   or `key value`, `#` and `!` start comments, a trailing `\\` continues
//!   the entry on the next line.
//! - TOML: nested tables are flattened with `.` so
//!   `[spark.hadoop.fs.s3a] endpoint = "x"` becomes
//!   `spark.hadoop.fs.s3a.endpoint = x`.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::ConfigMap;

/// Errors while loading configuration sources.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read config source {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML config source {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{path}:{line}: malformed property line: {content}")]
    Malformed {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("{path}: unsupported {kind} value for key {key}")]
    Unsupported {
        path: PathBuf,
        key: String,
        kind: &'static str,
    },

    #[error("invalid override '{input}', expected KEY=VALUE")]
    BadOverride { input: String },
}

/// Load a source, picking the format from the file extension.
pub fn load(path: &Path) -> Result<ConfigMap, SourceError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => load_toml(path),
        _ => load_properties(path),
    }
}

/// Load a `spark-defaults.conf` / properties file.
pub fn load_properties(path: &Path) -> Result<ConfigMap, SourceError> {
    let content = read(path)?;
    parse_properties(&content, path)
}

/// Load a TOML file and flatten its tables.
pub fn load_toml(path: &Path) -> Result<ConfigMap, SourceError> {
    let content = read(path)?;
    parse_toml(&content, path)
}

fn read(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|e| SourceError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parse properties text. `path` is only used in error messages.
///
/// Follows `java.util.Properties`: a line ending in an odd number of
/// backslashes continues on the next line (whose leading whitespace is
/// dropped), and `\=`, `\:`, `\ `, `\t`, `\n`, `\r`, `\f` and `\uXXXX`
/// escapes are decoded in keys and values.
pub fn parse_properties(content: &str, path: &Path) -> Result<ConfigMap, SourceError> {
    let mut map = ConfigMap::new();
    for (line_no, line) in logical_lines(content) {
        let malformed = || SourceError::Malformed {
            path: path.to_path_buf(),
            line: line_no,
            content: line.clone(),
        };

        let split = key_end(&line);
        let key = unescape(&line[..split]).ok_or_else(malformed)?;
        if key.is_empty() {
            return Err(malformed());
        }

        let rest = line[split..].trim_start();
        let rest = rest
            .strip_prefix('=')
            .or_else(|| rest.strip_prefix(':'))
            .unwrap_or(rest)
            .trim_start();
        let value = unescape(rest).ok_or_else(malformed)?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Join continued lines, skipping blanks and comments. Yields the
/// 1-based number of each logical line's first physical line.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim_start();
        if pending.is_none() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
        let (body, continues) = if trailing % 2 == 1 {
            (&line[..line.len() - 1], true)
        } else {
            (line, false)
        };

        let (_, buf) = pending.get_or_insert_with(|| (idx + 1, String::new()));
        buf.push_str(body);
        if !continues {
            lines.extend(pending.take());
        }
    }
    lines.extend(pending);
    lines
}

/// Byte offset of the first unescaped `=`, `:` or whitespace.
fn key_end(line: &str) -> usize {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            return i;
        }
    }
    line.len()
}

/// Decode backslash escapes. `None` on a malformed `\uXXXX`.
fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Some(out)
}

/// Parse TOML text into a flat map. `path` is only used in error messages.
pub fn parse_toml(content: &str, path: &Path) -> Result<ConfigMap, SourceError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| SourceError::ParseToml {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut map = ConfigMap::new();
    flatten(&table, "", path, &mut map)?;
    Ok(map)
}

fn flatten(table: &toml::Table, prefix: &str, path: &Path, out: &mut ConfigMap) -> Result<(), SourceError> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            toml::Value::Table(inner) => flatten(inner, &key, path, out)?,
            toml::Value::String(s) => {
                out.insert(key, s.as_str());
            }
            toml::Value::Integer(i) => {
                out.insert(key, i.to_string());
            }
            toml::Value::Float(f) => {
                out.insert(key, f.to_string());
            }
            toml::Value::Boolean(b) => {
                out.insert(key, b.to_string());
            }
            toml::Value::Datetime(d) => {
                out.insert(key, d.to_string());
            }
            toml::Value::Array(_) => {
                return Err(SourceError::Unsupported {
                    path: path.to_path_buf(),
                    key,
                    kind: "array",
                });
            }
        }
    }
    Ok(())
}

/// Parse a `KEY=VALUE` command-line override.
pub fn parse_override(input: &str) -> Result<(String, String), SourceError> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(SourceError::BadOverride {
            input: input.to_string(),
        }),
    }
}
