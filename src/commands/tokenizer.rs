//! Tokenizer for line-command arguments.
//!
//! Splits on whitespace, honouring single and double quotes so URLs and
//! passwords containing spaces survive intact:
//! - `connect prod` → `["connect", "prod"]`
//! - `set prod.password "my secret"` → `["set", "prod.password", "my secret"]`
//! - `"say \"hi\""` → `say "hi"`

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Error returned for malformed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A quote was opened but never closed.
    UnterminatedQuote(char),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedQuote(q) => write!(f, "Unterminated {q} quote"),
        }
    }
}

/// Tokenizes a command line into words.
pub fn tokenize(input: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        tokens.push(collect_word(&mut chars)?);
    }

    Ok(tokens)
}

/// Collects one word, splicing in any quoted sections.
fn collect_word(chars: &mut Peekable<Chars<'_>>) -> Result<String, ParseError> {
    let mut word = String::new();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            break;
        }
        chars.next();
        if c == '"' || c == '\'' {
            word.push_str(&collect_quoted(chars, c)?);
        } else {
            word.push(c);
        }
    }

    Ok(word)
}

/// Collects characters up to the closing quote, handling escapes.
fn collect_quoted(chars: &mut Peekable<Chars<'_>>, quote: char) -> Result<String, ParseError> {
    let mut result = String::new();
    let mut escaped = false;

    for c in chars.by_ref() {
        if escaped {
            match c {
                'n' => result.push('\n'),
                't' => result.push('\t'),
                other => result.push(other),
            }
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok(result);
        } else {
            result.push(c);
        }
    }

    Err(ParseError::UnterminatedQuote(quote))
}
