//! Error types for INI parsing, lookup, coercion and rendering.
//!
//! ## Error Categories
//!
//! - **Syntax errors**: malformed lines, unterminated quotes, invalid escapes,
//!   always with line and column
//! - **Policy errors**: duplicate keys or sections when the policy is `Reject`
//! - **Lookup errors**: missing sections or keys
//! - **Coercion errors**: a raw value does not match the requested type's grammar
//! - **I/O errors**: failures of a caller-supplied reader or writer
//!
//! In lenient mode the parser does not return errors; each one is wrapped in a
//! [`Diagnostic`] instead.
//!
//! ## Examples
//!
//! ```rust
//! use inidoc::{parse, Error};
//!
//! let err = parse("k = \"unterminated").unwrap_err();
//! assert!(matches!(err, Error::Syntax { line: 1, col: 5, .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Every failure the engine can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error in a caller-supplied reader or writer
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed line
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// A key was repeated under the `Reject` policy, or inserted twice
    #[error("Duplicate key '{key}' in section '{section}'{}", at_line(.line))]
    DuplicateKey {
        section: String,
        key: String,
        line: Option<usize>,
    },

    /// A section header was repeated under the `Reject` policy
    #[error("Duplicate section '{name}'{}", at_line(.line))]
    DuplicateSection { name: String, line: Option<usize> },

    #[error("Section not found: '{section}'")]
    SectionNotFound { section: String },

    #[error("Key '{key}' not found in section '{section}'")]
    KeyNotFound { section: String, key: String },

    /// A raw value does not match the grammar of the requested type
    #[error("Cannot convert '{value}' to {expected}: {reason}")]
    TypeCoercion {
        value: String,
        expected: String,
        reason: String,
    },

    /// Custom error, mostly raised through serde
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inidoc::Error;
    ///
    /// let err = Error::syntax(10, 5, "missing delimiter");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a duplicate-key error; `line` is `None` for API insertions.
    pub fn duplicate_key(section: &str, key: &str, line: Option<usize>) -> Self {
        Error::DuplicateKey {
            section: section.to_string(),
            key: key.to_string(),
            line,
        }
    }

    pub fn duplicate_section(name: &str, line: Option<usize>) -> Self {
        Error::DuplicateSection {
            name: name.to_string(),
            line,
        }
    }

    pub fn section_not_found(section: &str) -> Self {
        Error::SectionNotFound {
            section: section.to_string(),
        }
    }

    pub fn key_not_found(section: &str, key: &str) -> Self {
        Error::KeyNotFound {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    /// Creates a coercion error for a raw value that failed to convert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inidoc::Error;
    ///
    /// let err = Error::type_coercion("abc", "integer", "invalid digit");
    /// assert!(err.to_string().contains("to integer"));
    /// ```
    pub fn type_coercion(value: &str, expected: &str, reason: &str) -> Self {
        Error::TypeCoercion {
            value: value.to_string(),
            expected: expected.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the 1-based line this error refers to, if it came from parsing.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. } => Some(*line),
            Error::DuplicateKey { line, .. } | Error::DuplicateSection { line, .. } => *line,
            _ => None,
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A problem found in lenient mode: the offending line was skipped.
///
/// # Examples
///
/// ```rust
/// use inidoc::{parse_with_options, ParseOptions};
///
/// let parsed = parse_with_options("a = 1\nbroken\nb = 2\n", &ParseOptions::lenient()).unwrap();
/// assert_eq!(parsed.diagnostics.len(), 1);
/// assert_eq!(parsed.diagnostics[0].line, 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub error: Error,
}

impl Diagnostic {
    pub fn new(line: usize, column: usize, error: Error) -> Self {
        Diagnostic {
            line,
            column,
            error,
        }
    }
}

/// Uses the error's own position; errors without one land on line 0.
impl From<Error> for Diagnostic {
    fn from(error: Error) -> Self {
        let column = match &error {
            Error::Syntax { col, .. } => *col,
            _ => 1,
        };
        Diagnostic::new(error.line().unwrap_or(0), column, error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}
