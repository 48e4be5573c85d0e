//! Query execution against an instance's open session.
//!
//! Execution errors never escape: they become [`QueryOutcome::Error`] so an
//! interactive session keeps going after a bad query.

use std::fmt;
use std::time::{Duration, Instant};

use crate::db::ResultTable;
use crate::instance::InstanceState;
use tracing::debug;

use super::format::format_result;

/// Outcome of running one query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The statement produced a result set.
    Rows(ResultTable),
    /// The statement succeeded without a result set.
    Empty,
    /// The statement failed; holds the driver message.
    Error(String),
}

impl QueryOutcome {
    /// Status line for the outcome.
    pub fn status(&self) -> String {
        match self {
            Self::Rows(_) => "Success".to_string(),
            Self::Empty => "Success - No Results".to_string(),
            Self::Error(msg) => format!("Failure - query_error: {msg}"),
        }
    }

    /// The result table, if any.
    pub fn table(&self) -> Option<&ResultTable> {
        match self {
            Self::Rows(table) => Some(table),
            _ => None,
        }
    }

    /// Returns true for `Rows` and `Empty`.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Error(_))
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status())
    }
}

/// A query outcome with its wall-clock execution time.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// What happened.
    pub outcome: QueryOutcome,
    /// Time spent executing and fetching.
    pub execution_time: Duration,
}

/// Runs queries on a single instance.
pub struct QueryExecutor<'a> {
    instance: &'a str,
    state: &'a mut InstanceState,
    debug: bool,
}

impl<'a> QueryExecutor<'a> {
    /// Creates an executor for the named instance's state.
    pub fn new(instance: &'a str, state: &'a mut InstanceState, debug: bool) -> Self {
        Self {
            instance,
            state,
            debug,
        }
    }

    /// Executes `sql` and formats its result.
    pub fn execute(&mut self, sql: &str) -> ExecutionResult {
        let start = Instant::now();
        let outcome = self.run(sql);
        let execution_time = start.elapsed();

        debug!(
            "Query on {} finished in {:?}: {}",
            self.instance,
            execution_time,
            outcome.status()
        );

        ExecutionResult {
            outcome,
            execution_time,
        }
    }

    fn run(&mut self, sql: &str) -> QueryOutcome {
        if self.debug {
            debug!(
                "Instance: {} connected={}",
                self.instance,
                self.state.is_connected()
            );
        }

        let Some(session) = self.state.session_mut() else {
            return QueryOutcome::Error(format!("instance {} is not connected", self.instance));
        };

        match session.execute(sql) {
            Ok(()) => match format_result(session) {
                Some(table) => QueryOutcome::Rows(table),
                None => QueryOutcome::Empty,
            },
            Err(e) => {
                if self.debug {
                    debug!("Error: {}", e);
                }
                QueryOutcome::Error(e.detail())
            }
        }
    }
}
