//! odbc-cell - run SQL over ODBC the way a notebook cell does.

use std::io::{IsTerminal, Read};

use anyhow::Context;
use odbc_cell::cli::{Cli, Command};
use odbc_cell::commands::CommandOutput;
use odbc_cell::config::Config;
use odbc_cell::db::{driver_for, DriverBackend};
use odbc_cell::error::OdbcCellError;
use odbc_cell::secrets::{NoPrompt, PasswordPrompt, TerminalPrompt};
use odbc_cell::{logging, render, script, Session};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();

    if cli.log_file {
        logging::init_file_logging(cli.debug);
    } else {
        logging::init_stderr_logging(cli.debug);
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            match e.downcast_ref::<OdbcCellError>() {
                Some(inner) => error!("{}: {}", inner.category(), inner),
                None => error!("{:#}", e),
            }
            std::process::exit(1);
        }
    }
}

/// Runs the selected command. Returns false if any output reported an error.
fn run(cli: Cli) -> anyhow::Result<bool> {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from {}", path.display());
    }

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.apply_process_env()?;
    if cli.debug {
        config.options.debug = true;
    }

    let backend = if cli.mock_db {
        DriverBackend::Mock
    } else {
        DriverBackend::Odbc
    };
    let driver = driver_for(backend)?;
    let prompt: Box<dyn PasswordPrompt> = if std::io::stdin().is_terminal() {
        Box::new(TerminalPrompt)
    } else {
        Box::new(NoPrompt)
    };
    let mut session = Session::new(config, driver, prompt);

    let outputs = match &cli.command {
        Command::Query { instance, sql } => {
            let sql = match sql.as_deref() {
                Some(text) if text != "-" => text.to_string(),
                _ => read_stdin()?,
            };
            vec![session.handle_cell(&sql, instance.as_deref().unwrap_or(""))]
        }
        Command::Line { line } => vec![session.handle_line(&line.join(" "))],
        Command::Run { script: path } => {
            let text = script::read_script(path)?;
            let steps = script::parse_script(&text)?;
            script::run_script(&mut session, &steps)
        }
    };

    for output in &outputs {
        print_output(output, &cli);
    }
    Ok(!outputs.iter().any(CommandOutput::has_error))
}

fn print_output(output: &CommandOutput, cli: &Cli) {
    let rendered = render::render(output, cli.format);
    if !rendered.is_empty() {
        println!("{rendered}");
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read SQL from stdin")?;
    Ok(buffer)
}
