//! Connection management for odbc-cell.
//!
//! Builds connection strings from profiles, opens and closes native
//! connections, and reports the outcome of each connect attempt.

pub mod connect_string;
pub mod manager;

pub use connect_string::{build_connection_string, redact_connection_string, KeywordSet};
pub use manager::ConnectionManager;

use std::fmt;

/// Outcome of a connect attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectResult {
    /// Connection and session are open and stored on the instance.
    Ok,
    /// No instance with that name is registered.
    NotFound,
    /// The driver (or password resolution) refused the connection.
    DriverError(String),
}

impl ConnectResult {
    /// Numeric status code: 0 success, -2 driver error, -3 not found.
    pub fn code(&self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::DriverError(_) => -2,
            Self::NotFound => -3,
        }
    }

    /// Returns true on success.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ConnectResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "Connected"),
            Self::NotFound => write!(f, "Instance not found"),
            Self::DriverError(msg) => write!(f, "Unable to connect Error:\n{msg}"),
        }
    }
}
