//! Command-line argument parsing for odbc-cell.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text tables.
    #[default]
    Text,
    /// One JSON document per output.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// Run SQL over ODBC the way a notebook cell does.
#[derive(Parser, Debug)]
#[command(name = "odbc-cell")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", env = "ODBC_CELL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging and query diagnostics
    #[arg(long)]
    pub debug: bool,

    /// Write logs to the state directory instead of stderr
    #[arg(long)]
    pub log_file: bool,

    /// Output format (text or json)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,

    /// Use the in-memory mock driver instead of ODBC
    #[arg(long)]
    pub mock_db: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to run.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run SQL as a cell
    Query {
        /// Instance to run against (default instance if omitted)
        #[arg(short, long, value_name = "NAME")]
        instance: Option<String>,

        /// SQL text; "-" or omitted reads stdin
        #[arg(value_name = "SQL")]
        sql: Option<String>,
    },

    /// Run one line command (e.g. "instances", "connect prod")
    Line {
        /// The line command and its arguments
        #[arg(value_name = "LINE", trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },

    /// Run a notebook-style script of %odbc and %%odbc blocks
    Run {
        /// Script path; "-" reads stdin
        #[arg(value_name = "SCRIPT")]
        script: String,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }
}
