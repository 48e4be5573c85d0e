//! Native ODBC driver backed by `odbc-api`.
//!
//! Result sets are fetched as text through bound row-set buffers as soon as a
//! statement executes, so the pending result outlives the statement handle and
//! the cursor can answer metadata and fetch calls afterwards.

use super::{ColumnInfo, Cursor, Driver, DriverConnection, Row, Value};
use crate::error::{OdbcCellError, Result};
use odbc_api::buffers::TextRowSet;
use odbc_api::{Connection, ConnectionOptions, Cursor as OdbcCursor, Environment, ResultSetMetadata};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::OnceLock;
use tracing::debug;

/// Rows fetched per round trip.
const BATCH_SIZE: usize = 500;

/// Upper bound for a single text cell, in bytes.
const MAX_STR_LEN: usize = 4096;

/// Returns the process-wide ODBC environment.
fn environment() -> Result<&'static Environment> {
    static ENV: OnceLock<Environment> = OnceLock::new();
    if let Some(env) = ENV.get() {
        return Ok(env);
    }
    let env = Environment::new()
        .map_err(|e| OdbcCellError::connection(format!("Failed to allocate ODBC environment: {e}")))?;
    Ok(ENV.get_or_init(|| env))
}

/// Driver that opens connections through the system ODBC driver manager.
#[derive(Clone, Copy)]
pub struct OdbcDriver {
    env: &'static Environment,
}

impl OdbcDriver {
    /// Creates the driver, allocating the ODBC environment on first use.
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: environment()?,
        })
    }
}

impl Driver for OdbcDriver {
    fn connect(&self, connection_string: &str, autocommit: bool) -> Result<Box<dyn DriverConnection>> {
        let conn = self
            .env
            .connect_with_connection_string(connection_string, ConnectionOptions::default())
            .map_err(|e| OdbcCellError::connection(e.to_string()))?;
        conn.set_autocommit(autocommit)
            .map_err(|e| OdbcCellError::connection(e.to_string()))?;

        Ok(Box::new(OdbcConnection {
            conn: Rc::new(RefCell::new(Some(conn))),
        }))
    }
}

type SharedConnection = Rc<RefCell<Option<Connection<'static>>>>;

struct OdbcConnection {
    conn: SharedConnection,
}

impl DriverConnection for OdbcConnection {
    fn cursor(&mut self) -> Result<Box<dyn Cursor>> {
        if self.conn.borrow().is_none() {
            return Err(OdbcCellError::connection("Attempt to use a closed connection."));
        }
        Ok(Box::new(OdbcStatementCursor {
            conn: Rc::clone(&self.conn),
            pending: None,
        }))
    }

    fn close(&mut self) -> Result<()> {
        let Some(conn) = self.conn.borrow_mut().take() else {
            return Err(OdbcCellError::connection("Attempt to use a closed connection."));
        };
        // odbc-api disconnects on drop and panics if the driver reports an error.
        panic::catch_unwind(AssertUnwindSafe(move || drop(conn)))
            .map_err(|_| OdbcCellError::connection("Driver reported an error while disconnecting"))
    }
}

struct PendingResult {
    columns: Vec<ColumnInfo>,
    rows: Result<Vec<Row>>,
}

struct OdbcStatementCursor {
    conn: SharedConnection,
    pending: Option<PendingResult>,
}

impl Cursor for OdbcStatementCursor {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.pending = None;
        let guard = self.conn.borrow();
        let conn = guard
            .as_ref()
            .ok_or_else(|| OdbcCellError::query("Attempt to use a closed connection."))?;

        let cursor = conn
            .execute(sql, (), None)
            .map_err(|e| OdbcCellError::query(e.to_string()))?;

        if let Some(cursor) = cursor {
            self.pending = read_result_set(cursor);
        }
        Ok(())
    }

    fn description(&self) -> Option<Vec<ColumnInfo>> {
        self.pending.as_ref().map(|p| p.columns.clone())
    }

    fn fetch_all(&mut self) -> Result<Vec<Row>> {
        match self.pending.take() {
            Some(pending) => pending.rows,
            None => Err(OdbcCellError::query("No results.  Previous SQL was not a query.")),
        }
    }
}

/// Reads metadata and every row of an open result set.
///
/// Returns `None` when the driver reports a cursor without columns.
fn read_result_set(mut cursor: impl OdbcCursor) -> Option<PendingResult> {
    let columns = match describe(&mut cursor) {
        Ok(columns) if columns.is_empty() => return None,
        Ok(columns) => columns,
        Err(e) => {
            debug!("Failed to read result metadata: {}", e);
            return None;
        }
    };
    let rows = fetch_text_rows(cursor);
    Some(PendingResult { columns, rows })
}

fn describe(cursor: &mut impl ResultSetMetadata) -> Result<Vec<ColumnInfo>> {
    let count = cursor
        .num_result_cols()
        .map_err(|e| OdbcCellError::query(e.to_string()))?;

    let mut columns = Vec::with_capacity(count.max(0) as usize);
    for index in 1..=count.max(0) as u16 {
        let name = cursor
            .col_name(index)
            .map_err(|e| OdbcCellError::query(e.to_string()))?;
        let data_type = cursor
            .col_data_type(index)
            .map(|dt| format!("{dt:?}"))
            .unwrap_or_else(|_| "UNKNOWN".to_string());
        columns.push(ColumnInfo::new(name, data_type));
    }
    Ok(columns)
}

fn fetch_text_rows(mut cursor: impl OdbcCursor) -> Result<Vec<Row>> {
    let buffer = TextRowSet::for_cursor(BATCH_SIZE, &mut cursor, Some(MAX_STR_LEN))
        .map_err(|e| OdbcCellError::query(e.to_string()))?;
    let mut row_set = cursor
        .bind_buffer(buffer)
        .map_err(|e| OdbcCellError::query(e.to_string()))?;

    let mut rows = Vec::new();
    while let Some(batch) = row_set
        .fetch()
        .map_err(|e| OdbcCellError::query(e.to_string()))?
    {
        for row_index in 0..batch.num_rows() {
            let row = (0..batch.num_cols())
                .map(|col_index| match batch.at(col_index, row_index) {
                    Some(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
                    None => Value::Null,
                })
                .collect();
            rows.push(row);
        }
    }
    Ok(rows)
}
