//! Presentation-agnostic command output.
//!
//! Line commands and cells produce these values; the render layer turns them
//! into text or JSON.

use std::time::Duration;

use crate::db::ResultTable;

/// Output from a line command or cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Informational message.
    Info(String),

    /// Non-fatal advisory, such as a query lint.
    Warning(String),

    /// Error message.
    Error(String),

    /// Generic tabular listing (instances, options).
    Table {
        /// Column headers.
        headers: Vec<String>,
        /// Row data.
        rows: Vec<Vec<String>>,
    },

    /// Outcome of a cell query.
    QueryResult {
        /// Instance the query ran on.
        instance: String,
        /// Status line, e.g. `Success - No Results`.
        status: String,
        /// Result rows, already limited to the display maximum.
        table: Option<ResultTable>,
        /// Row count before truncation.
        total_rows: usize,
        /// Wall-clock execution time.
        duration: Duration,
    },

    /// Several outputs in order.
    Multiple(Vec<CommandOutput>),
}

impl CommandOutput {
    /// Creates an info message.
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    /// Creates a warning.
    pub fn warning(msg: impl Into<String>) -> Self {
        Self::Warning(msg.into())
    }

    /// Creates an error message.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// Creates a table output.
    pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::Table { headers, rows }
    }

    /// Creates a multiple output, flattening a single element.
    pub fn multiple(mut outputs: Vec<CommandOutput>) -> Self {
        if outputs.len() == 1 {
            outputs.remove(0)
        } else {
            Self::Multiple(outputs)
        }
    }

    /// Returns true if this output, or any nested one, is an error or a failed query.
    pub fn has_error(&self) -> bool {
        match self {
            Self::Error(_) => true,
            Self::QueryResult { status, .. } => status.starts_with("Failure"),
            Self::Multiple(outputs) => outputs.iter().any(Self::has_error),
            _ => false,
        }
    }
}
