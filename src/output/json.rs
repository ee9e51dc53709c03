//! JSON output renderer.
//!
//! Outputs `{"backend": ..., "scope": ..., "settings": [...]}` format.

use crate::backends::Backend;
use crate::output::{KeyRow, OutputRenderer, Report};

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, report: &Report) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn render_keys(&self, backend: Backend, rows: &[KeyRow]) -> String {
        let output = serde_json::json!({
            "backend": backend,
            "keys": rows,
        });
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
