//! Terminal renderer: one `setting = value` line per setting, with its origin.

use colored::Colorize;

use crate::backends::Backend;
use crate::output::{KeyRow, OutputRenderer, Report};

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, report: &Report) -> String {
        let mut output = String::new();
        let scope = match &report.scope {
            Some(scope) => format!("{} {}", report.backend.scope_label(), scope.bold()),
            None => "global".to_string(),
        };
        output.push_str(&format!(" {} ({})\n\n", report.backend.to_string().bold(), scope));

        let width = report
            .settings
            .iter()
            .map(|e| e.setting.len())
            .max()
            .unwrap_or(0);

        for entry in &report.settings {
            let value = match &entry.value {
                Some(v) if v.is_empty() => "\"\"".dimmed().to_string(),
                Some(v) => v.green().to_string(),
                None => "unset".dimmed().to_string(),
            };
            let origin = match &entry.source {
                Some(source) => match source.name() {
                    Some(name) => format!("{} {}", source.label(), name),
                    None => source.label().to_string(),
                },
                None => entry.key.clone(),
            };
            output.push_str(&format!(
                "   {:width$}  {}  {}\n",
                entry.setting,
                value,
                format!("({origin})").dimmed(),
            ));
        }

        output
    }

    fn render_keys(&self, backend: Backend, rows: &[KeyRow]) -> String {
        let mut output = format!(" {}\n\n", backend.to_string().bold());
        for row in rows {
            output.push_str(&format!("   {}\n", row.setting.bold()));
            output.push_str(&format!("     {}  {}\n", "key:".cyan(), row.key));
            output.push_str(&format!("     {}  {}\n", "scoped:".cyan(), row.scoped_key));
            if let Some(default) = row.default {
                output.push_str(&format!("     {}  {:?}\n", "default:".cyan(), default));
            }
            if let Some(env) = row.env {
                output.push_str(&format!("     {}  {}\n", "env:".cyan(), env));
            }
        }
        output
    }
}
