//! Converts an executed cursor into a [`ResultTable`].

use crate::db::{Cursor, ResultTable, Row, Value};
use tracing::warn;

/// Builds a table from the cursor's pending result set.
///
/// Returns `None` both when the statement produced no result set and when
/// fetching fails; fetch failures are logged so the two cases can be told
/// apart in the logs.
pub fn format_result(cursor: &mut dyn Cursor) -> Option<ResultTable> {
    let columns = cursor.description()?;

    match cursor.fetch_all() {
        Ok(rows) => {
            let width = columns.len();
            let rows = rows.into_iter().map(|row| fit_row(row, width)).collect();
            Some(ResultTable::with_data(columns, rows))
        }
        Err(e) => {
            warn!("Result set could not be fetched: {}", e);
            None
        }
    }
}

/// Pads short rows with NULL and drops values beyond the described columns.
fn fit_row(mut row: Row, width: usize) -> Row {
    row.resize(width, Value::Null);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnInfo, Driver, MockDriver, MockResponse};

    fn cursor_for(driver: &MockDriver, sql: &str) -> Box<dyn Cursor> {
        let mut conn = driver.connect("DSN=test", true).unwrap();
        let mut cursor = conn.cursor().unwrap();
        cursor.execute(sql).unwrap();
        cursor
    }

    #[test]
    fn test_rows_keep_fetch_order() {
        let driver = MockDriver::new();
        driver.respond(
            "select c1, c2 from t",
            MockResponse::Rows(ResultTable::with_data(
                vec![ColumnInfo::new("c1", "INTEGER"), ColumnInfo::new("c2", "VARCHAR")],
                vec![
                    vec![Value::Int(3), Value::from("c")],
                    vec![Value::Int(1), Value::from("a")],
                    vec![Value::Int(2), Value::from("b")],
                ],
            )),
        );
        let mut cursor = cursor_for(&driver, "select c1, c2 from t");

        let table = format_result(cursor.as_mut()).unwrap();

        assert_eq!(table.column_names(), vec!["c1", "c2"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.get(0, "c1"), Some(&Value::Int(3)));
        assert_eq!(table.get(2, "c2"), Some(&Value::from("b")));
    }

    #[test]
    fn test_no_result_set() {
        let driver = MockDriver::new();
        let mut cursor = cursor_for(&driver, "create table t (id int)");
        assert!(format_result(cursor.as_mut()).is_none());
    }

    #[test]
    fn test_fetch_error_is_none() {
        let driver = MockDriver::new();
        driver.respond(
            "select broken",
            MockResponse::FetchError {
                columns: vec![ColumnInfo::new("x", "VARCHAR")],
                message: "conversion failed".into(),
            },
        );
        let mut cursor = cursor_for(&driver, "select broken");
        assert!(format_result(cursor.as_mut()).is_none());
    }

    #[test]
    fn test_empty_result_set_is_a_table() {
        let driver = MockDriver::new();
        driver.respond(
            "select id from t where 1 = 0",
            MockResponse::Rows(ResultTable::with_data(
                vec![ColumnInfo::new("id", "INTEGER")],
                vec![],
            )),
        );
        let mut cursor = cursor_for(&driver, "select id from t where 1 = 0");
        let table = format_result(cursor.as_mut()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_names(), vec!["id"]);
    }

    #[test]
    fn test_ragged_rows_are_fitted() {
        assert_eq!(fit_row(vec![Value::Int(1)], 2), vec![Value::Int(1), Value::Null]);
        assert_eq!(
            fit_row(vec![Value::Int(1), Value::Int(2), Value::Int(3)], 2),
            vec![Value::Int(1), Value::Int(2)]
        );
    }
}
