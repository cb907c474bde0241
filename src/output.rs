//! Report rendering
//!
//! Renders dependency reports as YAML, JSON or an aligned text table.

use std::str::FromStr;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table, presets::NOTHING};
use serde::{Deserialize, Serialize};

use crate::models::WorkloadReport;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            "table" | "wide" => Ok(OutputFormat::Table),
            _ => Err(format!(
                "Unknown output format: {} (expected yaml, json or table)",
                s
            )),
        }
    }
}

/// Render reports in the requested format
pub fn render(reports: &[WorkloadReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(reports).context("Failed to render YAML"),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(reports).context("Failed to render JSON")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Table => Ok(render_table(reports)),
    }
}

const TABLE_HEADERS: [&str; 4] = ["WORKLOAD", "KIND", "NAMESPACE", "NAME"];

/// Space between columns of a plain table
const COLUMN_GAP: u16 = 3;

/// Build a borderless, kubectl-style table
///
/// Columns are left aligned and separated by a fixed gap; trailing
/// whitespace is trimmed from every line.
pub fn plain_table<R, C>(header: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = Vec<C>>,
    C: Into<Cell>,
{
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(header.to_vec());
    for row in rows {
        table.add_row(row);
    }

    let last = header.len().saturating_sub(1);
    for (idx, column) in table.column_iter_mut().enumerate() {
        let right = if idx == last { 0 } else { COLUMN_GAP };
        column.set_padding((0, right));
    }

    let mut out = String::new();
    for line in table.lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn render_table(reports: &[WorkloadReport]) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    for report in reports {
        let workload = report.workload.to_string();
        if let Some(error) = &report.error {
            rows.push(vec![workload, "<error>".to_string(), String::new(), error.clone()]);
            continue;
        }
        if report.dependencies.is_empty() {
            rows.push(vec![workload, "<none>".to_string(), String::new(), String::new()]);
            continue;
        }
        for dep in &report.dependencies {
            rows.push(vec![
                workload.clone(),
                dep.kind.clone(),
                dep.namespace.clone(),
                dep.name.clone(),
            ]);
        }
    }

    plain_table(&TABLE_HEADERS, rows)
}
