//! Mock driver for testing.
//!
//! Provides an in-memory driver with scripted responses. Clones share state, so a
//! test can keep a handle after moving the driver into a session and inspect the
//! connection strings and statements it saw.

use super::{ColumnInfo, Cursor, Driver, DriverConnection, ResultTable, Row, Value};
use crate::error::{OdbcCellError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// A scripted response for one statement text.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Statement produces a result set.
    Rows(ResultTable),
    /// Statement succeeds without a result set (DDL/DML).
    NoResults,
    /// Statement execution fails with the given driver message.
    Error(String),
    /// Execution succeeds and metadata is present, but fetching rows fails.
    FetchError {
        columns: Vec<ColumnInfo>,
        message: String,
    },
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, MockResponse>,
    connect_error: Option<String>,
    cursor_error: Option<String>,
    close_error: Option<String>,
    connection_strings: Vec<String>,
    executed: Vec<String>,
    autocommit: Vec<bool>,
    open_connections: usize,
}

/// In-memory driver returning scripted results.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Rc<RefCell<MockState>>,
}

impl MockDriver {
    /// Creates a mock driver with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock driver whose connects always fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let driver = Self::new();
        driver.state.borrow_mut().connect_error = Some(message.into());
        driver
    }

    /// Scripts the response for an exact statement text.
    pub fn respond(&self, sql: impl Into<String>, response: MockResponse) -> &Self {
        self.state.borrow_mut().responses.insert(sql.into(), response);
        self
    }

    /// Makes every subsequent `cursor` call fail with `message`.
    pub fn fail_cursor(&self, message: impl Into<String>) {
        self.state.borrow_mut().cursor_error = Some(message.into());
    }

    /// Makes every subsequent `close` report an error.
    pub fn fail_close(&self, message: impl Into<String>) {
        self.state.borrow_mut().close_error = Some(message.into());
    }

    /// Connection strings passed to `connect`, in call order.
    pub fn connection_strings(&self) -> Vec<String> {
        self.state.borrow().connection_strings.clone()
    }

    /// Autocommit flags passed to `connect`, in call order.
    pub fn autocommit_flags(&self) -> Vec<bool> {
        self.state.borrow().autocommit.clone()
    }

    /// Statements executed on any cursor, in call order.
    pub fn executed(&self) -> Vec<String> {
        self.state.borrow().executed.clone()
    }

    /// Number of connections currently open.
    pub fn open_connections(&self) -> usize {
        self.state.borrow().open_connections
    }

    fn response_for(&self, sql: &str) -> MockResponse {
        if let Some(response) = self.state.borrow().responses.get(sql) {
            return response.clone();
        }

        // Unscripted SELECTs return a single descriptive row
        if sql.trim_start().to_uppercase().starts_with("SELECT") {
            MockResponse::Rows(ResultTable::with_data(
                vec![ColumnInfo::new("result", "VARCHAR")],
                vec![vec![Value::String(format!("Mock result for: {}", sql))]],
            ))
        } else {
            MockResponse::NoResults
        }
    }
}

impl Driver for MockDriver {
    fn connect(&self, connection_string: &str, autocommit: bool) -> Result<Box<dyn DriverConnection>> {
        let mut state = self.state.borrow_mut();
        state.connection_strings.push(connection_string.to_string());
        state.autocommit.push(autocommit);

        if let Some(message) = &state.connect_error {
            return Err(OdbcCellError::connection(message.clone()));
        }

        state.open_connections += 1;
        Ok(Box::new(MockConnection {
            driver: self.clone(),
            closed: Rc::new(Cell::new(false)),
        }))
    }
}

struct MockConnection {
    driver: MockDriver,
    closed: Rc<Cell<bool>>,
}

impl DriverConnection for MockConnection {
    fn cursor(&mut self) -> Result<Box<dyn Cursor>> {
        if self.closed.get() {
            return Err(OdbcCellError::connection("Attempt to use a closed connection."));
        }
        if let Some(message) = &self.driver.state.borrow().cursor_error {
            return Err(OdbcCellError::connection(message.clone()));
        }
        Ok(Box::new(MockCursor {
            driver: self.driver.clone(),
            closed: Rc::clone(&self.closed),
            pending: None,
        }))
    }

    fn close(&mut self) -> Result<()> {
        if self.closed.replace(true) {
            return Err(OdbcCellError::connection("Attempt to use a closed connection."));
        }
        let mut state = self.driver.state.borrow_mut();
        state.open_connections = state.open_connections.saturating_sub(1);
        match &state.close_error {
            Some(message) => Err(OdbcCellError::connection(message.clone())),
            None => Ok(()),
        }
    }
}

enum Pending {
    Rows(ResultTable),
    FetchError(Vec<ColumnInfo>, String),
}

struct MockCursor {
    driver: MockDriver,
    closed: Rc<Cell<bool>>,
    pending: Option<Pending>,
}

impl Cursor for MockCursor {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.pending = None;
        if self.closed.get() {
            return Err(OdbcCellError::query("Attempt to use a closed connection."));
        }
        self.driver.state.borrow_mut().executed.push(sql.to_string());

        match self.driver.response_for(sql) {
            MockResponse::Rows(table) => self.pending = Some(Pending::Rows(table)),
            MockResponse::NoResults => {}
            MockResponse::Error(message) => return Err(OdbcCellError::query(message)),
            MockResponse::FetchError { columns, message } => {
                self.pending = Some(Pending::FetchError(columns, message))
            }
        }
        Ok(())
    }

    fn description(&self) -> Option<Vec<ColumnInfo>> {
        match &self.pending {
            Some(Pending::Rows(table)) => Some(table.columns.clone()),
            Some(Pending::FetchError(columns, _)) => Some(columns.clone()),
            None => None,
        }
    }

    fn fetch_all(&mut self) -> Result<Vec<Row>> {
        match self.pending.take() {
            Some(Pending::Rows(table)) => Ok(table.rows),
            Some(Pending::FetchError(_, message)) => Err(OdbcCellError::query(message)),
            None => Err(OdbcCellError::query("No results.  Previous SQL was not a query.")),
        }
    }
}
