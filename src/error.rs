//! Error types for odbc-cell.
//!
//! Defines the main error enum used by the plumbing layers (config, secrets,
//! drivers). User-facing connect and query outcomes are reported through
//! `ConnectResult` and `QueryOutcome` instead.

use thiserror::Error;

/// Main error type for odbc-cell operations.
#[derive(Error, Debug)]
pub enum OdbcCellError {
    /// Driver connection errors (DSN missing, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution or fetch errors reported by the driver.
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, bad URL, unknown option, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Password decoding, keyring or prompt failures.
    #[error("Secret error: {0}")]
    Secret(String),

    /// Internal errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OdbcCellError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a secret error with the given message.
    pub fn secret(msg: impl Into<String>) -> Self {
        Self::Secret(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Secret(_) => "Secret Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the bare driver/detail message without the category prefix.
    ///
    /// Query failures are surfaced to the user as `Failure - query_error: <detail>`,
    /// so the prefix added by `Display` must not leak into that string.
    pub fn detail(&self) -> String {
        match self {
            Self::Connection(m)
            | Self::Query(m)
            | Self::Config(m)
            | Self::Secret(m)
            | Self::Internal(m) => m.clone(),
        }
    }
}

/// Result type alias using OdbcCellError.
pub type Result<T> = std::result::Result<T, OdbcCellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_connection() {
        let err = OdbcCellError::connection("[unixODBC][Driver Manager]Data source name not found");
        assert_eq!(
            err.to_string(),
            "Connection error: [unixODBC][Driver Manager]Data source name not found"
        );
        assert_eq!(err.category(), "Connection Error");
    }

    #[test]
    fn test_error_display_query() {
        let err = OdbcCellError::query("Table 'sales.ordrs' does not exist");
        assert_eq!(err.to_string(), "Query error: Table 'sales.ordrs' does not exist");
        assert_eq!(err.category(), "Query Error");
    }


    #[test]
    fn test_error_display_secret() {
        let err = OdbcCellError::secret("invalid base64");
        assert_eq!(err.to_string(), "Secret error: invalid base64");
        assert_eq!(err.category(), "Secret Error");
    }

    #[test]
    fn test_detail_strips_category() {
        let err = OdbcCellError::query("syntax error near 'form'");
        assert_eq!(err.detail(), "syntax error near 'form'");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OdbcCellError>();
    }
}
