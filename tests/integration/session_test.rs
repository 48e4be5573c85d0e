//! End-to-end line command and cell behaviour.

use super::mock_session;
use odbc_cell::cli::OutputFormat;
use odbc_cell::commands::CommandOutput;
use odbc_cell::config::Config;
use odbc_cell::db::{ColumnInfo, MockDriver, MockResponse, ResultTable, Value};
use odbc_cell::render::{render, render_json};
use odbc_cell::secrets::NoPrompt;
use odbc_cell::Session;
use pretty_assertions::assert_eq;

#[test]
fn test_env_instances_are_usable() {
    let mut config = Config::default();
    config
        .apply_env([
            ("JUPYTER_ODBC_CONN_DEFAULT", "prod"),
            (
                "JUPYTER_ODBC_CONN_URL_PROD",
                "odbc://analyst:pw@td.example.com:1025/?dsn=TDPROD",
            ),
        ])
        .unwrap();
    let driver = MockDriver::new();
    let mut session = Session::new(config, Box::new(driver.clone()), Box::new(NoPrompt));

    assert_eq!(session.default_instance(), "prod");
    let output = session.handle_cell("select 1 limit 1", "");
    assert!(!output.has_error());
    assert!(driver.connection_strings()[0].starts_with("DSN=TDPROD; Host=td.example.com"));
}

#[test]
fn test_cell_text_output() {
    let driver = MockDriver::new();
    driver.respond(
        "select region, total from sales limit 2",
        MockResponse::Rows(ResultTable::with_data(
            vec![
                ColumnInfo::new("region", "VARCHAR"),
                ColumnInfo::new("total", "DECIMAL"),
            ],
            vec![
                vec![Value::from("north"), Value::Float(12.5)],
                vec![Value::from("south"), Value::Null],
            ],
        )),
    );
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);

    let output = session.handle_cell("select region, total from sales limit 2", "");
    let text = render(&output, OutputFormat::Text);

    assert_eq!(
        text,
        "region │ total\n───────┼──────\nnorth  │ 12.5\nsouth  │ NULL\nSuccess"
    );
}

#[test]
fn test_cell_json_output_with_warning() {
    let driver = MockDriver::new();
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);

    let output = session.handle_cell("create table t (id int)", "");
    let json = render_json(&output);

    assert_eq!(json[0]["type"], "warning");
    assert_eq!(json[1]["type"], "query_result");
    assert_eq!(json[1]["status"], "Success - No Results");
    assert!(json[1]["rows"].is_null());
}

#[test]
fn test_line_commands_round_trip() {
    let driver = MockDriver::new();
    let mut session = mock_session(&driver, &[]);

    assert!(!session
        .handle_line("add lake odbc://lake.example.com/?dsn=Impala&use_integrated_security=1")
        .has_error());
    assert!(!session.handle_line("set conn_default lake").has_error());
    assert!(!session.handle_line("set lake.port 21050").has_error());

    let CommandOutput::Table { rows, .. } = session.handle_line("instances") else {
        panic!("expected instance table");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "lake*");
    assert!(rows[0][2].contains("lake.example.com:21050"));

    let CommandOutput::Table { rows, .. } = session.handle_line("options") else {
        panic!("expected options table");
    };
    assert!(rows.contains(&vec!["conn_default".to_string(), "lake".to_string()]));

    assert_eq!(
        session.handle_line("connect"),
        CommandOutput::Info("Connected to lake".into())
    );
}

#[test]
fn test_line_errors_are_outputs() {
    let driver = MockDriver::new();
    let mut session = mock_session(&driver, &[]);

    assert!(session.handle_line("frobnicate").has_error());
    assert!(session.handle_line("add bad http://nope").has_error());
    assert!(session.handle_line("set max_rows lots").has_error());
    assert!(session.handle_line("connect ghost").has_error());
    assert!(session.handle_line("disconnect ghost").has_error());
    assert!(session.handle_line("set x \"unterminated").has_error());
}

#[test]
fn test_help_for_empty_line_and_cell() {
    let driver = MockDriver::new();
    let mut session = mock_session(&driver, &[]);

    let CommandOutput::Info(text) = session.handle_line("") else {
        panic!("expected help");
    };
    assert!(text.contains("Line commands"));
    assert!(matches!(session.handle_cell("   ", ""), CommandOutput::Info(_)));
}
