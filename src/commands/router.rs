//! Line-command parsing.
//!
//! Parses the argument of a line invocation into a structured command that the
//! session can dispatch.

use super::tokenizer::{tokenize, ParseError};

/// A parsed line command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    /// Show usage.
    Help,
    /// List registered instances.
    ListInstances,
    /// Register (or replace) an instance from an `odbc://` URL.
    Add { name: String, url: String },
    /// Connect an instance; `None` means the default instance.
    Connect { name: Option<String> },
    /// Disconnect an instance; `None` means the default instance.
    Disconnect { name: Option<String> },
    /// Show session options.
    ShowOptions,
    /// Change a session option.
    SetOption { name: String, value: String },
    /// Change a profile field on an instance.
    SetField {
        instance: String,
        field: String,
        value: String,
    },
}

/// Error describing why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// Quoting problem.
    Tokenize(ParseError),
    /// The command word is not recognised.
    Unknown(String),
    /// The command is missing arguments; holds the usage string.
    Usage(&'static str),
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tokenize(e) => write!(f, "{e}"),
            Self::Unknown(word) => write!(f, "Unknown command '{word}'. Try 'help'."),
            Self::Usage(usage) => write!(f, "Usage: {usage}"),
        }
    }
}

/// Parses a line argument.
pub fn parse_line(line: &str) -> Result<LineCommand, LineError> {
    let tokens = tokenize(line).map_err(LineError::Tokenize)?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(LineCommand::Help);
    };

    match head.to_lowercase().as_str() {
        "help" | "?" => Ok(LineCommand::Help),
        "instances" | "list" => Ok(LineCommand::ListInstances),
        "options" | "settings" => Ok(LineCommand::ShowOptions),
        "add" => match args {
            [name, url] => Ok(LineCommand::Add {
                name: name.clone(),
                url: url.clone(),
            }),
            _ => Err(LineError::Usage("add <instance> <odbc://url>")),
        },
        "connect" => match args {
            [] => Ok(LineCommand::Connect { name: None }),
            [name] => Ok(LineCommand::Connect {
                name: Some(name.clone()),
            }),
            _ => Err(LineError::Usage("connect [instance]")),
        },
        "disconnect" => match args {
            [] => Ok(LineCommand::Disconnect { name: None }),
            [name] => Ok(LineCommand::Disconnect {
                name: Some(name.clone()),
            }),
            _ => Err(LineError::Usage("disconnect [instance]")),
        },
        "set" => match args {
            [key, rest @ ..] if !rest.is_empty() => {
                let value = rest.join(" ");
                match key.split_once('.') {
                    Some((instance, field)) if !instance.is_empty() && !field.is_empty() => {
                        Ok(LineCommand::SetField {
                            instance: instance.to_string(),
                            field: field.to_string(),
                            value,
                        })
                    }
                    _ => Ok(LineCommand::SetOption {
                        name: key.clone(),
                        value,
                    }),
                }
            }
            _ => Err(LineError::Usage("set <option|instance.field> <value>")),
        },
        other => Err(LineError::Unknown(other.to_string())),
    }
}
