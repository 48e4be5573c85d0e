//! Line-command parsing and command output.
//!
//! Parsing is kept apart from execution so commands can be tested without a
//! session or database.

pub mod help;
pub mod output;
pub mod router;
pub mod tokenizer;

pub use help::HELP_TEXT;
pub use output::CommandOutput;
pub use router::{parse_line, LineCommand, LineError};
pub use tokenizer::{tokenize, ParseError};
