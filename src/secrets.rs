//! Password resolution.
//!
//! Turns a profile's [`PasswordSource`] into the plaintext handed to the driver.
//! Encoded passwords are base64; keyring passwords are looked up in the OS
//! keyring under the `odbc-cell` service. Interactive prompting goes through the
//! [`PasswordPrompt`] trait so sessions can run unattended in tests.

use crate::error::{OdbcCellError, Result};
use crate::instance::PasswordSource;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use keyring::Entry;
use std::io::{self, Write};
use tracing::debug;

const SERVICE_NAME: &str = "odbc-cell";

/// Resolves a password source to plaintext.
pub fn resolve_password(source: &PasswordSource) -> Result<String> {
    match source {
        PasswordSource::Plain(password) => Ok(password.clone()),
        PasswordSource::Encoded { encoded } => decode_password(encoded),
        PasswordSource::Keyring { keyring } => keyring_password(keyring),
    }
}

/// Decodes a base64-encoded password.
pub fn decode_password(encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| OdbcCellError::secret(format!("Invalid encoded password: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|_| OdbcCellError::secret("Encoded password is not valid UTF-8"))
}

/// Reads a password from the OS keyring.
pub fn keyring_password(entry_name: &str) -> Result<String> {
    let entry = Entry::new(SERVICE_NAME, entry_name)
        .map_err(|e| OdbcCellError::secret(format!("Failed to access keyring: {e}")))?;

    match entry.get_password() {
        Ok(secret) => Ok(secret),
        Err(keyring::Error::NoEntry) => Err(OdbcCellError::secret(format!(
            "No keyring entry '{entry_name}' for service '{SERVICE_NAME}'"
        ))),
        Err(e) => Err(OdbcCellError::secret(format!("Failed to retrieve secret: {e}"))),
    }
}

/// Masks a secret for display, showing only the last 4 characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        "*".repeat(chars.len())
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", "*".repeat(4), tail)
    }
}

/// Source of interactively typed passwords.
pub trait PasswordPrompt {
    /// Asks for the password of `instance`. `Ok(None)` means no password was given.
    fn prompt(&mut self, instance: &str) -> Result<Option<String>>;
}

/// Prompts on the controlling terminal without echo.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn prompt(&mut self, instance: &str) -> Result<Option<String>> {
        print!("Please enter the password for instance {instance}: ");
        io::stdout()
            .flush()
            .map_err(|e| OdbcCellError::secret(format!("Failed to flush stdout: {e}")))?;
        let password = rpassword::read_password()
            .map_err(|e| OdbcCellError::secret(format!("Failed to read password: {e}")))?;
        if password.is_empty() {
            debug!("Empty password entered for {}", instance);
            return Ok(None);
        }
        Ok(Some(password))
    }
}

/// Prompt that never asks; used for non-interactive runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl PasswordPrompt for NoPrompt {
    fn prompt(&mut self, _instance: &str) -> Result<Option<String>> {
        Ok(None)
    }
}
