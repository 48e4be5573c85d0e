//! Integration tests for odbc-cell.

pub mod connect_test;
pub mod odbc_test;
pub mod query_test;
pub mod script_test;
pub mod session_test;

use odbc_cell::config::Config;
use odbc_cell::db::MockDriver;
use odbc_cell::instance::ConnectionProfile;
use odbc_cell::secrets::NoPrompt;
use odbc_cell::Session;

/// Builds a session over `driver` with instances given as `odbc://` URLs.
pub fn mock_session(driver: &MockDriver, instances: &[(&str, &str)]) -> Session {
    let mut config = Config::default();
    for (name, url) in instances {
        config.instances.insert(
            name.to_string(),
            ConnectionProfile::from_url(url).expect("valid test URL"),
        );
    }
    Session::new(config, Box::new(driver.clone()), Box::new(NoPrompt))
}
