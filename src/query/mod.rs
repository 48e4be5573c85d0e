//! Query validation, execution and result formatting.

pub mod executor;
pub mod format;
pub mod validator;

pub use executor::{ExecutionResult, QueryExecutor, QueryOutcome};
pub use format::format_result;
pub use validator::{validate_query, QueryWarning, Validation};
