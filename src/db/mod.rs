//! Driver abstraction layer for odbc-cell.
//!
//! Mirrors the shape of a native ODBC binding: a driver opens connections from a
//! connection string, a connection hands out a cursor, and a cursor executes
//! statements and exposes result metadata and rows. Everything is synchronous;
//! a session owns its handles and drives them from a single caller.

mod mock;
#[cfg(feature = "odbc")]
mod odbc;
mod types;

pub use mock::{MockDriver, MockResponse};
#[cfg(feature = "odbc")]
pub use odbc::OdbcDriver;
pub use types::{ColumnInfo, ResultTable, Row, Value};

use crate::error::Result;

/// Supported driver backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverBackend {
    /// The system ODBC driver manager.
    #[default]
    Odbc,
    /// In-memory driver with scripted results.
    Mock,
}

/// Creates the driver for the given backend.
pub fn driver_for(backend: DriverBackend) -> Result<Box<dyn Driver>> {
    match backend {
        #[cfg(feature = "odbc")]
        DriverBackend::Odbc => Ok(Box::new(OdbcDriver::new()?)),
        #[cfg(not(feature = "odbc"))]
        DriverBackend::Odbc => Err(crate::error::OdbcCellError::config(
            "odbc-cell was built without the `odbc` feature; rebuild with --features odbc or use --mock-db",
        )),
        DriverBackend::Mock => Ok(Box::new(MockDriver::new())),
    }
}

/// Opens native connections.
pub trait Driver {
    /// Opens a connection from an ODBC connection string.
    fn connect(&self, connection_string: &str, autocommit: bool) -> Result<Box<dyn DriverConnection>>;
}

/// An open native connection.
pub trait DriverConnection {
    /// Derives a cursor bound to this connection.
    fn cursor(&mut self) -> Result<Box<dyn Cursor>>;

    /// Closes the connection. Cursors derived from it stop working afterwards.
    fn close(&mut self) -> Result<()>;
}

/// Executes statements and exposes the most recent result set.
pub trait Cursor {
    /// Executes a statement, replacing any pending result set.
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// Column metadata of the pending result set, or `None` if the last
    /// statement produced no result set.
    fn description(&self) -> Option<Vec<ColumnInfo>>;

    /// Drains the pending result set.
    fn fetch_all(&mut self) -> Result<Vec<Row>>;
}
