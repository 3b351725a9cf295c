//! Line-oriented INI tokenizer.
//!
//! [`Tokenizer`] turns text into a lazy stream of [`Token`]s, one per line:
//!
//! ```text
//! ; comment               -> Comment
//!                         -> BlankLine
//! [server]   ; primary    -> SectionHeader { name: "server", comment: Some(..) }
//! host = "  example  "    -> KeyValue { key: "host", value: "  example  ", .. }
//! oops                    -> Error { reason: "missing delimiter '='" }
//! ```
//!
//! Rules, given the active [`ParseOptions`]:
//!
//! - A line whose first non-blank character is a comment marker is a comment.
//! - A line starting with `[` is a section header; the name is trimmed, must be
//!   non-empty, and only blanks or a comment may follow the closing `]`.
//! - Any other non-blank line must contain the delimiter. The key is trimmed and
//!   must be non-empty. The value is trimmed unless it is quoted.
//! - A value starting with `"` or `'` runs to the matching quote. Inside quotes
//!   `\"`, `\'`, `\\`, `\n`, `\r` and `\t` are decoded; other escapes are errors.
//!   Only blanks or a comment may follow the closing quote.
//! - In an unquoted value the first comment marker starts an inline comment.
//!
//! Errors never stop the stream: the bad line yields an [`TokenKind::Error`]
//! and scanning resumes on the next line. Both `\n` and `\r\n` terminate lines,
//! and a leading UTF-8 byte order mark is skipped.
//!
//! ## Examples
//!
//! ```rust
//! use inidoc::tokenizer::{TokenKind, Tokenizer};
//! use inidoc::ParseOptions;
//!
//! let options = ParseOptions::default();
//! let kinds: Vec<_> = Tokenizer::new("[a]\nk = v\n", &options)
//!     .map(|token| token.kind)
//!     .collect();
//!
//! assert!(matches!(kinds[0], TokenKind::SectionHeader { .. }));
//! assert!(matches!(kinds[1], TokenKind::KeyValue { .. }));
//! ```

use crate::document::Comment;
use crate::ParseOptions;

pub(crate) const BOM: char = '\u{feff}';

/// One lexical line of INI text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column (in characters) of the first significant character, or of
    /// the error position for [`TokenKind::Error`].
    pub column: usize,
    /// The line exactly as written, without its terminator.
    pub raw: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    SectionHeader {
        name: String,
        comment: Option<Comment>,
    },
    KeyValue {
        key: String,
        value: String,
        comment: Option<Comment>,
    },
    Comment(Comment),
    BlankLine,
    Error {
        reason: String,
    },
}

/// Lazy, forward-only token stream over INI text.
pub struct Tokenizer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    options: &'a ParseOptions,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str, options: &'a ParseOptions) -> Self {
        let input = input.strip_prefix(BOM).unwrap_or(input);
        Tokenizer {
            input,
            position: 0,
            line: 0,
            options,
        }
    }

    /// Reads the next physical line, without its `\n` or `\r\n`.
    fn next_line(&mut self) -> Option<&'a str> {
        if self.position >= self.input.len() {
            return None;
        }
        let rest = &self.input[self.position..];
        let (line, consumed) = match rest.find('\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.position += consumed;
        self.line += 1;
        Some(line.strip_suffix('\r').unwrap_or(line))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.next_line()?;
        let (kind, column) = match scan_line(raw, self.options) {
            Ok(scanned) => scanned,
            Err(LineError { column, reason }) => (TokenKind::Error { reason }, column),
        };
        Some(Token {
            kind,
            line: self.line,
            column,
            raw,
        })
    }
}

struct LineError {
    column: usize,
    reason: String,
}

impl LineError {
    fn at(line: &str, offset: usize, reason: impl Into<String>) -> Self {
        LineError {
            column: column_of(line, offset),
            reason: reason.into(),
        }
    }
}

/// 1-based character column of byte `offset` within `line`.
fn column_of(line: &str, offset: usize) -> usize {
    line[..offset].chars().count() + 1
}

fn scan_line(line: &str, options: &ParseOptions) -> Result<(TokenKind, usize), LineError> {
    let start = line.len() - line.trim_start().len();
    let column = column_of(line, start);
    let first = match line[start..].chars().next() {
        Some(c) => c,
        None => return Ok((TokenKind::BlankLine, 1)),
    };

    if options.is_comment_marker(first) {
        let comment = Comment::new(first, &line[start + first.len_utf8()..]);
        return Ok((TokenKind::Comment(comment), column));
    }

    if first == '[' {
        return scan_section_header(line, start, options).map(|kind| (kind, column));
    }

    scan_key_value(line, start, options).map(|kind| (kind, column))
}

fn scan_section_header(
    line: &str,
    start: usize,
    options: &ParseOptions,
) -> Result<TokenKind, LineError> {
    let body_start = start + 1;
    let close = match line[body_start..].find(']') {
        Some(i) => body_start + i,
        None => return Err(LineError::at(line, start, "unterminated section header")),
    };

    let name = line[body_start..close].trim();
    if name.is_empty() {
        return Err(LineError::at(line, start, "empty section name"));
    }

    let comment = scan_trailing(line, close + 1, options, "section header")?;
    Ok(TokenKind::SectionHeader {
        name: name.to_string(),
        comment,
    })
}

fn scan_key_value(
    line: &str,
    start: usize,
    options: &ParseOptions,
) -> Result<TokenKind, LineError> {
    let delimiter = options.delimiter.as_char();
    let split = match line[start..].find(delimiter) {
        Some(i) => start + i,
        None => {
            return Err(LineError::at(
                line,
                start,
                format!("missing delimiter '{delimiter}'"),
            ))
        }
    };

    let key = line[start..split].trim();
    if key.is_empty() {
        return Err(LineError::at(line, start, "empty key"));
    }

    let after = split + delimiter.len_utf8();
    let value_start = after + (line[after..].len() - line[after..].trim_start().len());

    let (value, comment) = match line[value_start..].chars().next() {
        Some(quote @ ('"' | '\'')) => scan_quoted(line, value_start, quote, options)?,
        _ => scan_unquoted(line, value_start, options),
    };

    Ok(TokenKind::KeyValue {
        key: key.to_string(),
        value,
        comment,
    })
}

fn scan_unquoted(line: &str, start: usize, options: &ParseOptions) -> (String, Option<Comment>) {
    let rest = &line[start..];
    match rest.char_indices().find(|(_, c)| options.is_comment_marker(*c)) {
        Some((i, marker)) => {
            let value = rest[..i].trim_end().to_string();
            let comment = Comment::new(marker, &rest[i + marker.len_utf8()..]);
            (value, Some(comment))
        }
        None => (rest.trim_end().to_string(), None),
    }
}

fn scan_quoted(
    line: &str,
    open: usize,
    quote: char,
    options: &ParseOptions,
) -> Result<(String, Option<Comment>), LineError> {
    let body = open + quote.len_utf8();
    let mut value = String::new();
    let mut chars = line[body..].char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let decoded = match chars.next() {
                    Some((_, '"')) => '"',
                    Some((_, '\'')) => '\'',
                    Some((_, '\\')) => '\\',
                    Some((_, 'n')) => '\n',
                    Some((_, 'r')) => '\r',
                    Some((_, 't')) => '\t',
                    Some((_, other)) => {
                        return Err(LineError::at(
                            line,
                            body + i,
                            format!("invalid escape sequence '\\{other}'"),
                        ))
                    }
                    None => return Err(LineError::at(line, open, "unterminated quoted value")),
                };
                value.push(decoded);
            }
            c if c == quote => {
                let end = body + i + quote.len_utf8();
                let comment = scan_trailing(line, end, options, "quoted value")?;
                return Ok((value, comment));
            }
            c => value.push(c),
        }
    }

    Err(LineError::at(line, open, "unterminated quoted value"))
}

/// Accepts only blanks or an inline comment from byte `from` to end of line.
fn scan_trailing(
    line: &str,
    from: usize,
    options: &ParseOptions,
    what: &str,
) -> Result<Option<Comment>, LineError> {
    let rest = &line[from..];
    let offset = from + (rest.len() - rest.trim_start().len());
    match line[offset..].chars().next() {
        None => Ok(None),
        Some(marker) if options.is_comment_marker(marker) => Ok(Some(Comment::new(
            marker,
            &line[offset + marker.len_utf8()..],
        ))),
        Some(_) => Err(LineError::at(
            line,
            offset,
            format!("unexpected characters after {what}"),
        )),
    }
}
