//! Query validation, execution and formatting through a session.

use super::mock_session;
use odbc_cell::db::{ColumnInfo, MockDriver, MockResponse, ResultTable, Value};
use odbc_cell::query::{QueryOutcome, QueryWarning};
use pretty_assertions::assert_eq;

fn two_column_table(rows: i64) -> ResultTable {
    ResultTable::with_data(
        vec![ColumnInfo::new("c1", "INTEGER"), ColumnInfo::new("c2", "INTEGER")],
        (0..rows).map(|i| vec![Value::Int(i), Value::Int(i * 10)]).collect(),
    )
}

#[test]
fn test_rerun_detection() {
    let driver = MockDriver::new();
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);

    let first = session.validate_query("default", "select 1 limit 1").unwrap();
    let second = session.validate_query("default", "select 1 limit 1").unwrap();
    let third = session.validate_query("default", "select 2 limit 1").unwrap();

    assert!(!first.rerun);
    assert!(second.rerun);
    assert!(!third.rerun);
    assert!(session.validate_query("ghost", "select 1").is_none());
}

#[test]
fn test_warnings_do_not_block() {
    let driver = MockDriver::new();
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);

    let validation = session.validate_query("default", "select * from t;").unwrap();
    assert!(validation.allowed);
    assert_eq!(
        validation.warnings,
        vec![QueryWarning::Semicolon, QueryWarning::MissingLimit]
    );

    let validation = session
        .validate_query("default", "SELECT * FROM t LIMIT 10")
        .unwrap();
    assert!(validation.warnings.is_empty());
}

#[test]
fn test_select_rows_in_fetch_order() {
    let driver = MockDriver::new();
    driver.respond("select c1, c2 from t limit 3", MockResponse::Rows(two_column_table(3)));
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);
    assert!(session.connect("default").is_ok());

    let outcome = session.run_query("default", "select c1, c2 from t limit 3");

    assert_eq!(outcome.status(), "Success");
    let table = outcome.table().unwrap();
    assert_eq!(table.column_names(), vec!["c1", "c2"]);
    assert_eq!(table.row_count(), 3);
    let firsts: Vec<&Value> = table.rows.iter().map(|r| &r[0]).collect();
    assert_eq!(firsts, vec![&Value::Int(0), &Value::Int(1), &Value::Int(2)]);
    assert_eq!(table.get(2, "c2"), Some(&Value::Int(20)));
}

#[test]
fn test_statement_without_result_set() {
    let driver = MockDriver::new();
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);
    assert!(session.connect("default").is_ok());

    let outcome = session.run_query("default", "insert into t values (1)");
    assert_eq!(outcome, QueryOutcome::Empty);
    assert_eq!(outcome.status(), "Success - No Results");
}

#[test]
fn test_driver_error_is_reported_not_raised() {
    let driver = MockDriver::new();
    driver.respond(
        "select * from nope limit 1",
        MockResponse::Error("Object 'nope' does not exist.".into()),
    );
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);
    assert!(session.connect("default").is_ok());

    let outcome = session.run_query("default", "select * from nope limit 1");
    assert!(outcome.table().is_none());
    assert!(outcome
        .status()
        .starts_with("Failure - query_error: "));
    assert!(outcome.status().ends_with("Object 'nope' does not exist."));

    // The session survives and the next query runs
    assert!(session.is_connected("default"));
    assert!(session.run_query("default", "select 1 limit 1").is_success());
}

#[test]
fn test_query_on_disconnected_instance() {
    let driver = MockDriver::new();
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);

    let outcome = session.run_query("default", "select 1 limit 1");
    assert_eq!(
        outcome,
        QueryOutcome::Error("instance default is not connected".into())
    );
}

#[test]
fn test_fetch_failure_reports_no_results() {
    let driver = MockDriver::new();
    driver.respond(
        "select doc from t limit 1",
        MockResponse::FetchError {
            columns: vec![ColumnInfo::new("doc", "CLOB")],
            message: "String data, right truncated".into(),
        },
    );
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);
    assert!(session.connect("default").is_ok());

    let outcome = session.run_query("default", "select doc from t limit 1");
    assert_eq!(outcome.status(), "Success - No Results");
}
