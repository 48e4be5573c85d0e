//! Advisory query validation with rerun detection.

use crate::instance::InstanceState;
use std::fmt;

/// A non-blocking warning about the shape of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryWarning {
    /// The text contains a `;`, which most ODBC drivers reject.
    Semicolon,
    /// The text has no `limit ` clause.
    MissingLimit,
}

impl QueryWarning {
    /// Message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Semicolon => {
                "WARNING - Do not type a trailing semicolon on queries, the driver will likely reject the statement"
            }
            Self::MissingLimit => {
                "WARNING - Queries should have a limit so the result stays small enough to display"
            }
        }
    }
}

impl fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of validating a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Whether the query may run. Warnings never clear this.
    pub allowed: bool,
    /// The text is identical to the previous query on this instance.
    pub rerun: bool,
    /// Advisory warnings, in detection order.
    pub warnings: Vec<QueryWarning>,
}

/// Validates `query` against the instance's history and records it.
///
/// `last_query` is always overwritten so the next call can detect a repeat.
/// Text starting with `use ` (case-sensitive, untrimmed) is also stored as
/// `last_use`.
pub fn validate_query(state: &mut InstanceState, query: &str) -> Validation {
    let rerun = state.last_query == query;

    state.last_query = query.to_string();
    if query.starts_with("use ") {
        state.last_use = query.to_string();
    }

    let mut warnings = Vec::new();
    if query.contains(';') {
        warnings.push(QueryWarning::Semicolon);
    }
    if !query.to_lowercase().contains("limit ") {
        warnings.push(QueryWarning::MissingLimit);
    }

    Validation {
        allowed: true,
        rerun,
        warnings,
    }
}
