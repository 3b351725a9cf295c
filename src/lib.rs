//! # inidoc
//!
//! A format-preserving INI engine: parse configuration text into an ordered
//! document, query and edit it with typed accessors, and write it back either
//! exactly as it was (apart from what you changed) or in a normalised form.
//!
//! ## Key Features
//!
//! - **Round-trip fidelity**: comments, blank lines, spacing and quoting of
//!   untouched lines survive a parse/render cycle byte for byte
//! - **Ordered model**: sections and keys keep their declaration order
//! - **Configurable dialect**: comment markers, `=` or `:` delimiter, duplicate
//!   key and section policies, case folding, boolean vocabularies
//! - **Strict or lenient**: stop at the first error, or skip bad lines and
//!   collect positioned [`Diagnostic`]s
//! - **Serde Compatible**: read and write config structs with
//!   `#[derive(Serialize, Deserialize)]`
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! inidoc = "0.1"
//! ```
//!
//! ### Editing a document
//!
//! ```rust
//! use inidoc::parse;
//!
//! let text = "\
//! ; service settings
//! [server]
//! host = localhost
//! port = 8080   ; default
//! ";
//!
//! let mut doc = parse(text).unwrap();
//! assert_eq!(doc.get_as::<u16>("server", "port").unwrap(), 8080);
//!
//! doc.set("server", "host", "example.org");
//! assert_eq!(
//!     doc.to_string(),
//!     "; service settings\n[server]\nhost = example.org\nport = 8080   ; default\n"
//! );
//! ```
//!
//! ### Typed configuration
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use inidoc::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Database {
//!     url: String,
//!     pool: u32,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Config {
//!     debug: bool,
//!     database: Database,
//! }
//!
//! let config = Config {
//!     debug: false,
//!     database: Database { url: "postgres://db".to_string(), pool: 4 },
//! };
//!
//! let text = to_string(&config).unwrap();
//! assert_eq!(text, "debug = false\n\n[database]\nurl = postgres://db\npool = 4\n");
//!
//! let back: Config = from_str(&text).unwrap();
//! assert_eq!(config, back);
//! ```
//!
//! ### Lenient parsing
//!
//! ```rust
//! use inidoc::{validate, ParseOptions};
//!
//! let problems = validate("[a]\nok = 1\nnot a pair\n[]\n", &ParseOptions::default());
//! let lines: Vec<_> = problems.iter().map(|d| d.line).collect();
//! assert_eq!(lines, vec![3, 4]);
//! ```
//!
//! ## Building documents in code
//!
//! ```rust
//! use inidoc::ini;
//!
//! let doc = ini!({
//!     "name": "demo",
//!     "server": {
//!         "host": "localhost",
//!         "port": 8080
//!     }
//! });
//! assert_eq!(doc.get("server", "port").unwrap(), "8080");
//! ```
//!
//! ## Logging
//!
//! The parser emits [`tracing`](https://docs.rs/tracing) events: `debug` for
//! merged sections and resolved duplicate keys, `warn` for every line skipped
//! in lenient mode. No subscriber is installed by the library.

pub mod de;
pub mod document;
pub mod error;
mod layout;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod tokenizer;
pub mod value;

pub use de::{Deserializer, Parsed};
pub use document::{Comment, Document, Entry, Section};
pub use error::{Diagnostic, Error, Result};
pub use options::{
    Delimiter, DuplicateKeyPolicy, DuplicateSectionPolicy, LineEnding, Mode, ParseOptions,
    SerializeOptions, Style,
};
pub use ser::{serialize, to_document, Renderer};
pub use value::{BoolLiterals, FromValue, Value};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io;

/// Parses `text` with default options (strict mode).
///
/// # Examples
///
/// ```rust
/// use inidoc::parse;
///
/// let doc = parse("[a]\nk = v\n").unwrap();
/// assert_eq!(doc.get("a", "k").unwrap(), "v");
/// ```
///
/// # Errors
///
/// Returns the first syntax or duplicate-policy error, with its line.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str) -> Result<Document> {
    parse_with_options(text, &ParseOptions::default()).map(|parsed| parsed.document)
}

/// Parses `text` with explicit options.
///
/// In [`Mode::Lenient`] this only fails on problems outside the text itself;
/// every malformed line is skipped and reported in [`Parsed::diagnostics`].
///
/// # Examples
///
/// ```rust
/// use inidoc::{parse_with_options, Delimiter, ParseOptions};
///
/// let options = ParseOptions::new().with_delimiter(Delimiter::Colon);
/// let parsed = parse_with_options("[net]\nurl: http://x\n", &options).unwrap();
/// assert_eq!(parsed.document.get("net", "url").unwrap(), "http://x");
/// assert!(parsed.diagnostics.is_empty());
/// ```
///
/// # Errors
///
/// In strict mode, returns the first syntax or duplicate-policy error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Parsed> {
    de::Parser::new(options).parse(text)
}

/// Parses UTF-8 bytes.
///
/// # Errors
///
/// Returns [`Error::Io`] if the bytes are not valid UTF-8, otherwise as
/// [`parse_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(bytes: &[u8], options: &ParseOptions) -> Result<Parsed> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::io(&format!("Utf8: {e}")))?;
    parse_with_options(text, options)
}

/// Reads all of `reader` and parses it.
///
/// # Examples
///
/// ```rust
/// use inidoc::{parse_reader, ParseOptions};
/// use std::io::Cursor;
///
/// let parsed = parse_reader(Cursor::new(b"k = v\n"), &ParseOptions::default()).unwrap();
/// assert_eq!(parsed.document.get("", "k").unwrap(), "v");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails or the input is not UTF-8, otherwise
/// as [`parse_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader<R>(mut reader: R, options: &ParseOptions) -> Result<Parsed>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    parse_slice(&bytes, options)
}

/// Checks `text` without keeping the document: every problem a lenient parse
/// with `options` would skip, in line order. An empty result means the text
/// parses cleanly in strict mode too.
#[must_use]
pub fn validate(text: &str, options: &ParseOptions) -> Vec<Diagnostic> {
    let lenient = options.clone().with_mode(Mode::Lenient);
    match parse_with_options(text, &lenient) {
        Ok(parsed) => parsed.diagnostics,
        Err(error) => vec![Diagnostic::from(error)],
    }
}

/// Renders `document` into `writer`.
///
/// # Examples
///
/// ```rust
/// use inidoc::{parse, to_writer, SerializeOptions};
///
/// let doc = parse("[a]\nk=v\n").unwrap();
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &doc, &SerializeOptions::default()).unwrap();
/// assert_eq!(buffer, b"[a]\nk=v\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, document: &Document, options: &SerializeOptions) -> Result<()>
where
    W: io::Write,
{
    let text = serialize(document, options);
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Serializes any config-shaped `T: Serialize` to canonical INI text.
///
/// # Errors
///
/// Returns an error if `T` is not a struct or map, or nests tables below
/// sections.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let document = to_document(value)?;
    Ok(serialize(&document, &SerializeOptions::canonical()))
}

/// Deserializes an instance of `T` from INI text parsed with default options.
///
/// # Errors
///
/// Returns a parse error, or an error if the document does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let document = parse(text)?;
    from_document(&document)
}

/// Deserializes an instance of `T` from a parsed document; string fields may
/// borrow from it.
///
/// # Examples
///
/// ```rust
/// use inidoc::{from_document, parse};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Paths<'a> { root: &'a str }
///
/// #[derive(Deserialize)]
/// struct Config<'a> {
///     #[serde(borrow)]
///     paths: Paths<'a>,
/// }
///
/// let doc = parse("[paths]\nroot = /srv\n").unwrap();
/// let config: Config = from_document(&doc).unwrap();
/// assert_eq!(config.paths.root, "/srv");
/// ```
///
/// # Errors
///
/// Returns an error if a value does not coerce to the requested type or a
/// required key is missing.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_document<'a, T>(document: &'a Document) -> Result<T>
where
    T: Deserialize<'a>,
{
    T::deserialize(Deserializer::new(document))
}
