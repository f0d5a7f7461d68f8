//! Output formatting for rendered panels.

use crate::cli::OutputFormat;
use crate::render::Rendered;
use serde_json::json;
use std::fmt::Write;

/// Formatter for command output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the template names.
    pub fn print_list(&self, names: &[String]) {
        print!("{}", self.format_list(names));
    }

    /// Print a rendered panel.
    pub fn print_panel(&self, rendered: &Rendered) {
        print!("{}", self.format_panel(rendered));
    }

    pub fn format_list(&self, names: &[String]) -> String {
        match self.format {
            OutputFormat::Human => names.iter().map(|name| format!("{}\n", name)).collect(),
            OutputFormat::Json => format!("{}\n", json!({ "templates": names })),
        }
    }

    pub fn format_panel(&self, rendered: &Rendered) -> String {
        match self.format {
            OutputFormat::Human => format_human(rendered),
            OutputFormat::Json => format!("{}\n", format_json(rendered)),
        }
    }
}

// Human format

fn format_human(rendered: &Rendered) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rendered.html);
    if rendered.fields.is_empty() {
        return out;
    }

    let name_width = rendered
        .fields
        .iter()
        .map(|field| field.name.len())
        .max()
        .unwrap_or_default();
    let kind_width = rendered
        .fields
        .iter()
        .map(|field| field.kind.len())
        .max()
        .unwrap_or_default();

    out.push('\n');
    for field in &rendered.fields {
        let value = field.value.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{:name_width$}  {:kind_width$}  {}",
            field.name, field.kind, value
        );
    }
    out
}

// JSON format

fn format_json(rendered: &Rendered) -> serde_json::Value {
    let fields: Vec<_> = rendered
        .fields
        .iter()
        .map(|field| {
            json!({
                "name": field.name,
                "kind": field.kind,
                "value": field.value,
            })
        })
        .collect();
    json!({
        "template": rendered.template,
        "html": rendered.html,
        "fields": fields,
    })
}
