//! Tests against a real ODBC data source.
//!
//! These need the `odbc` feature and `ODBC_TEST_CONNECTION` set to an
//! `odbc://` URL for a reachable data source.

#![cfg(feature = "odbc")]

use odbc_cell::config::Config;
use odbc_cell::db::{driver_for, DriverBackend};
use odbc_cell::instance::ConnectionProfile;
use odbc_cell::secrets::NoPrompt;
use odbc_cell::Session;

/// Helper to create a session for the test data source.
fn get_test_session() -> Option<Session> {
    let url = std::env::var("ODBC_TEST_CONNECTION").ok()?;
    let mut config = Config::default();
    config
        .instances
        .insert("default".into(), ConnectionProfile::from_url(&url).ok()?);
    let driver = driver_for(DriverBackend::Odbc).ok()?;
    Some(Session::new(config, driver, Box::new(NoPrompt)))
}

#[test]
fn test_select_literal() {
    let Some(mut session) = get_test_session() else {
        eprintln!("Skipping test: ODBC_TEST_CONNECTION not set");
        return;
    };

    assert!(session.connect("default").is_ok());
    let outcome = session.run_query("default", "SELECT 1 AS num");
    let table = outcome.table().expect("result set");
    assert_eq!(table.column_names(), vec!["num"]);
    assert_eq!(table.row_count(), 1);

    session.disconnect("default");
    session.disconnect("default");
    assert!(!session.is_connected("default"));
}

#[test]
fn test_bad_query_is_contained() {
    let Some(mut session) = get_test_session() else {
        eprintln!("Skipping test: ODBC_TEST_CONNECTION not set");
        return;
    };

    assert!(session.connect("default").is_ok());
    let outcome = session.run_query("default", "SELECT * FROM odbc_cell_no_such_table");
    assert!(outcome.status().starts_with("Failure - query_error: "));
}
