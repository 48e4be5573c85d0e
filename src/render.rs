//! Rendering of [`CommandOutput`] as text or JSON.

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::db::ResultTable;
use serde_json::{json, Value as JsonValue};

/// Renders an output in the requested format.
pub fn render(output: &CommandOutput, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(output),
        OutputFormat::Json => render_json(output).to_string(),
    }
}

/// Renders an output as plain text.
pub fn render_text(output: &CommandOutput) -> String {
    match output {
        CommandOutput::Info(msg) => msg.clone(),
        CommandOutput::Warning(msg) => format!("Warning: {msg}"),
        CommandOutput::Error(msg) => msg.clone(),
        CommandOutput::Table { headers, rows } => format_table(headers, rows),
        CommandOutput::QueryResult {
            status,
            table,
            total_rows,
            ..
        } => {
            let mut parts = Vec::new();
            if let Some(table) = table {
                parts.push(format_result_table(table));
                if *total_rows > table.row_count() {
                    parts.push(format!(
                        "Only showing {} of {} rows (max_rows)",
                        table.row_count(),
                        total_rows
                    ));
                }
            }
            parts.push(status.clone());
            parts.join("\n")
        }
        CommandOutput::Multiple(outputs) => outputs
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Renders an output as a JSON value.
pub fn render_json(output: &CommandOutput) -> JsonValue {
    match output {
        CommandOutput::Info(msg) => json!({ "type": "info", "message": msg }),
        CommandOutput::Warning(msg) => json!({ "type": "warning", "message": msg }),
        CommandOutput::Error(msg) => json!({ "type": "error", "message": msg }),
        CommandOutput::Table { headers, rows } => {
            json!({ "type": "table", "headers": headers, "rows": rows })
        }
        CommandOutput::QueryResult {
            instance,
            status,
            table,
            total_rows,
            duration,
        } => {
            let (columns, rows) = match table {
                Some(t) => (json!(t.column_names()), json!(t.rows)),
                None => (JsonValue::Null, JsonValue::Null),
            };
            let shown = table.as_ref().map_or(0, ResultTable::row_count);
            json!({
                "type": "query_result",
                "instance": instance,
                "status": status,
                "columns": columns,
                "rows": rows,
                "total_rows": total_rows,
                "truncated": *total_rows > shown,
                "duration_ms": duration.as_millis() as u64,
            })
        }
        CommandOutput::Multiple(outputs) => {
            JsonValue::Array(outputs.iter().map(render_json).collect())
        }
    }
}

fn format_result_table(table: &ResultTable) -> String {
    let headers: Vec<String> = table.column_names().into_iter().map(String::from).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_display_string()).collect())
        .collect();
    format_table(&headers, &rows)
}

/// Formats a table as aligned columns.
fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    output.push_str(&header_line.join(" │ "));
    output.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    output.push_str(&separator.join("─┼─"));
    output.push('\n');

    for row in rows {
        let row_line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = width)
            })
            .collect();
        output.push_str(row_line.join(" │ ").trim_end());
        output.push('\n');
    }

    output.trim_end().to_string()
}
