//! Help text for odbc-cell.

/// Help text shown for an empty line or `help`.
pub const HELP_TEXT: &str = r#"Line commands (%odbc <command>):
  help                          - Show this help message
  instances, list               - List registered instances
  add <instance> <odbc://url>   - Register or replace an instance
  connect [instance]            - Connect an instance (default instance if omitted)
  disconnect [instance]         - Close an instance's connection
  options                       - Show session options
  set <option> <value>          - Change an option (conn_default, max_rows, keywords, debug)
  set <instance>.<field> <value>
                                - Change an instance field (dsn, host, port, user,
                                  password, default_db, authmech, ...)

Cell usage (%%odbc [instance]):
  %%odbc
  select * from mydatabase.mytable limit 10

  %%odbc prod
  select * from mydatabase.mytable limit 10

Instances come from the config file and from environment variables:
  JUPYTER_ODBC_CONN_DEFAULT=<instance>
  JUPYTER_ODBC_CONN_URL_<NAME>=odbc://user@host:port/database?dsn=<DSN>"#;
