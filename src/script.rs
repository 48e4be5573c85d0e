//! Notebook-style scripts.
//!
//! A script is a sequence of blocks:
//!
//! ```text
//! %odbc connect prod
//! %%odbc prod
//! select * from mydatabase.mytable limit 10
//! ```
//!
//! `%odbc <line>` runs a line command. `%%odbc [instance]` starts a cell whose
//! body runs until the next line beginning with `%`. Outside cells, blank
//! lines and `#` comments are ignored.

use crate::commands::CommandOutput;
use crate::error::{OdbcCellError, Result};
use crate::session::Session;
use std::io::Read;
use tracing::debug;

const LINE_MAGIC: &str = "%odbc";
const CELL_MAGIC: &str = "%%odbc";

/// One executable block of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// A line command.
    Line(String),
    /// A cell: instance argument plus SQL body.
    Cell { line: String, body: String },
}

/// Reads a script from a file, or from stdin when `path` is `-`.
pub fn read_script(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| OdbcCellError::internal(format!("Failed to read stdin: {e}")))?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| OdbcCellError::config(format!("Failed to read script file: {e}")))
    }
}

/// Splits script text into steps.
pub fn parse_script(input: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    let mut cell: Option<(String, Vec<&str>)> = None;

    for (idx, raw) in input.lines().enumerate() {
        let trimmed = raw.trim();

        if trimmed.starts_with('%') {
            if let Some((line, body)) = cell.take() {
                steps.push(finish_cell(line, &body));
            }

            if let Some(rest) = magic_argument(trimmed, CELL_MAGIC) {
                cell = Some((rest.to_string(), Vec::new()));
            } else if let Some(rest) = magic_argument(trimmed, LINE_MAGIC) {
                steps.push(ScriptStep::Line(rest.to_string()));
            } else {
                return Err(OdbcCellError::config(format!(
                    "Line {}: unknown magic '{}'. Expected {} or {}",
                    idx + 1,
                    trimmed.split_whitespace().next().unwrap_or(trimmed),
                    LINE_MAGIC,
                    CELL_MAGIC
                )));
            }
            continue;
        }

        match cell.as_mut() {
            Some((_, body)) => body.push(raw),
            None if trimmed.is_empty() || trimmed.starts_with('#') => {}
            None => {
                return Err(OdbcCellError::config(format!(
                    "Line {}: text outside a {} cell",
                    idx + 1,
                    CELL_MAGIC
                )))
            }
        }
    }

    if let Some((line, body)) = cell.take() {
        steps.push(finish_cell(line, &body));
    }

    debug!("Parsed {} script step(s)", steps.len());
    Ok(steps)
}

/// Returns the argument after `magic` if `text` starts with that exact word.
fn magic_argument<'a>(text: &'a str, magic: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(magic)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn finish_cell(line: String, body: &[&str]) -> ScriptStep {
    ScriptStep::Cell {
        line,
        body: body.join("\n").trim().to_string(),
    }
}

/// Runs every step on the session, collecting outputs in order.
///
/// Failed steps do not stop the script.
pub fn run_script(session: &mut Session, steps: &[ScriptStep]) -> Vec<CommandOutput> {
    steps
        .iter()
        .map(|step| match step {
            ScriptStep::Line(line) => session.handle_line(line),
            ScriptStep::Cell { line, body } => session.handle_cell(body, line),
        })
        .collect()
}
