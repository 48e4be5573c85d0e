//! Script runner tests.

use super::mock_session;
use odbc_cell::commands::CommandOutput;
use odbc_cell::db::{MockDriver, MockResponse};
use odbc_cell::script::{parse_script, run_script};

#[test]
fn test_script_runs_in_order_and_survives_failures() {
    let driver = MockDriver::new();
    driver.respond(
        "select * from missing limit 1",
        MockResponse::Error("Object 'missing' does not exist.".into()),
    );
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);

    let script = "\
%odbc add prod odbc://u:p@td-prod/?dsn=TDPROD
%%odbc prod
select * from missing limit 1
%%odbc prod
select 1 limit 1
%odbc disconnect prod
";
    let steps = parse_script(script).unwrap();
    let outputs = run_script(&mut session, &steps);

    assert_eq!(outputs.len(), 4);
    assert!(matches!(outputs[0], CommandOutput::Info(_)));
    assert!(outputs[1].has_error());
    assert!(!outputs[2].has_error());
    assert!(!session.is_connected("prod"));
    assert_eq!(
        driver.executed(),
        vec![
            "select * from missing limit 1".to_string(),
            "select 1 limit 1".to_string()
        ]
    );
}

#[test]
fn test_script_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.odbc");
    std::fs::write(&path, "%odbc instances\n%%odbc\nselect 1 limit 1\n").unwrap();

    let text = odbc_cell::script::read_script(path.to_str().unwrap()).unwrap();
    let steps = parse_script(&text).unwrap();
    assert_eq!(steps.len(), 2);

    let driver = MockDriver::new();
    let mut session = mock_session(&driver, &[("default", "odbc://u:p@td/?dsn=TD")]);
    let outputs = run_script(&mut session, &steps);
    assert!(outputs.iter().all(|o| !o.has_error()));
}
