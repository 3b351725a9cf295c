//! Configuration options for parsing and rendering INI text.
//!
//! This module provides the knobs that control both directions of the engine:
//!
//! - [`ParseOptions`]: comment markers, delimiter, duplicate policies, strict or
//!   lenient mode, case sensitivity and boolean literal sets
//! - [`SerializeOptions`]: round-trip or canonical style, line endings
//!
//! ## Examples
//!
//! ```rust
//! use inidoc::{Delimiter, DuplicateKeyPolicy, Mode, ParseOptions, SerializeOptions, Style};
//!
//! let options = ParseOptions::new()
//!     .with_delimiter(Delimiter::Colon)
//!     .with_duplicate_keys(DuplicateKeyPolicy::Reject)
//!     .with_mode(Mode::Lenient);
//! assert_eq!(options.delimiter.as_char(), ':');
//!
//! let output = SerializeOptions::canonical();
//! assert_eq!(output.style, Style::Canonical);
//! ```

use crate::value::BoolLiterals;

/// Character separating a key from its value.
///
/// # Examples
///
/// ```rust
/// use inidoc::Delimiter;
///
/// assert_eq!(Delimiter::Equals.as_char(), '=');
/// assert_eq!(Delimiter::Colon.as_char(), ':');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Equals,
    Colon,
}

impl Delimiter {
    /// Returns the character this delimiter matches.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Equals => '=',
            Delimiter::Colon => ':',
        }
    }
}

/// What happens when a key appears twice in one section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DuplicateKeyPolicy {
    /// The last value wins; the entry keeps the position of its first occurrence.
    #[default]
    Overwrite,
    /// The second occurrence is an error.
    Reject,
    /// Every occurrence is kept as an ordered list of values.
    Append,
}

/// What happens when a section header names an already-declared section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DuplicateSectionPolicy {
    /// Following entries are added to the existing section.
    #[default]
    Merge,
    /// The repeated header is an error.
    Reject,
}

/// Error handling mode of the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Stop at the first error.
    #[default]
    Strict,
    /// Skip malformed lines and collect diagnostics.
    Lenient,
}

/// Options controlling how INI text is tokenized and assembled into a
/// [`Document`](crate::Document).
///
/// A document remembers the options it was parsed with, so later lookups fold
/// names and coerce booleans the same way parsing did.
///
/// # Examples
///
/// ```rust
/// use inidoc::{Mode, ParseOptions};
///
/// let options = ParseOptions::new()
///     .with_comment_markers([';'])
///     .with_case_sensitive_keys(false)
///     .with_mode(Mode::Lenient);
///
/// assert!(options.is_comment_marker(';'));
/// assert!(!options.is_comment_marker('#'));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ParseOptions {
    pub comment_markers: Vec<char>,
    pub delimiter: Delimiter,
    pub duplicate_keys: DuplicateKeyPolicy,
    pub duplicate_sections: DuplicateSectionPolicy,
    pub mode: Mode,
    pub case_sensitive_keys: bool,
    pub case_sensitive_sections: bool,
    pub bool_literals: BoolLiterals,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            comment_markers: vec![';', '#'],
            delimiter: Delimiter::default(),
            duplicate_keys: DuplicateKeyPolicy::default(),
            duplicate_sections: DuplicateSectionPolicy::default(),
            mode: Mode::default(),
            case_sensitive_keys: true,
            case_sensitive_sections: true,
            bool_literals: BoolLiterals::default(),
        }
    }
}

impl ParseOptions {
    /// Creates default options: `;` and `#` comments, `=` delimiter, overwrite
    /// duplicate keys, merge duplicate sections, strict mode, case-sensitive names.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inidoc::{Delimiter, Mode, ParseOptions};
    ///
    /// let options = ParseOptions::new();
    /// assert_eq!(options.delimiter, Delimiter::Equals);
    /// assert_eq!(options.mode, Mode::Strict);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for default options in [`Mode::Lenient`].
    #[must_use]
    pub fn lenient() -> Self {
        ParseOptions {
            mode: Mode::Lenient,
            ..Default::default()
        }
    }

    /// Replaces the set of characters that start a comment.
    #[must_use]
    pub fn with_comment_markers<I>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        self.comment_markers = markers.into_iter().collect();
        self
    }

    /// Sets the key/value delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the duplicate-key policy.
    #[must_use]
    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    /// Sets the duplicate-section policy.
    #[must_use]
    pub fn with_duplicate_sections(mut self, policy: DuplicateSectionPolicy) -> Self {
        self.duplicate_sections = policy;
        self
    }

    /// Sets strict or lenient error handling.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Controls whether `Key` and `key` name different entries.
    #[must_use]
    pub fn with_case_sensitive_keys(mut self, sensitive: bool) -> Self {
        self.case_sensitive_keys = sensitive;
        self
    }

    /// Controls whether `[Server]` and `[server]` name different sections.
    #[must_use]
    pub fn with_case_sensitive_sections(mut self, sensitive: bool) -> Self {
        self.case_sensitive_sections = sensitive;
        self
    }

    /// Replaces the literal sets used for boolean coercion.
    #[must_use]
    pub fn with_bool_literals(mut self, literals: BoolLiterals) -> Self {
        self.bool_literals = literals;
        self
    }

    /// Returns `true` if `c` starts a comment under these options.
    #[must_use]
    pub fn is_comment_marker(&self, c: char) -> bool {
        self.comment_markers.contains(&c)
    }
}

/// Rendering style of the serializer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Style {
    /// Unmodified lines are reproduced exactly as parsed.
    ///
    /// Line terminators are not captured: every line ends with the configured
    /// [`LineEnding`], so CRLF input only renders byte for byte with
    /// [`LineEnding::CrLf`].
    ///
    /// ```rust
    /// use inidoc::{parse, serialize, LineEnding, SerializeOptions};
    ///
    /// let doc = parse("[a]\r\nk = v\r\n").unwrap();
    /// assert_eq!(doc.to_string(), "[a]\nk = v\n");
    ///
    /// let crlf = SerializeOptions::round_trip().with_line_ending(LineEnding::CrLf);
    /// assert_eq!(serialize(&doc, &crlf), "[a]\r\nk = v\r\n");
    /// ```
    #[default]
    RoundTrip,
    /// Every line is normalized to `key = value` with one blank line between sections.
    Canonical,
}

/// Line terminator written after every output line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Returns the terminator text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inidoc::LineEnding;
    ///
    /// assert_eq!(LineEnding::Lf.as_str(), "\n");
    /// assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Options controlling how a [`Document`](crate::Document) is rendered to text.
///
/// # Examples
///
/// ```rust
/// use inidoc::{LineEnding, SerializeOptions, Style};
///
/// let options = SerializeOptions::new().with_line_ending(LineEnding::CrLf);
/// assert_eq!(options.style, Style::RoundTrip);
///
/// let canonical = SerializeOptions::canonical();
/// assert_eq!(canonical.line_ending, LineEnding::Lf);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SerializeOptions {
    pub style: Style,
    pub line_ending: LineEnding,
}

impl SerializeOptions {
    /// Creates default options (round-trip style, `\n` line endings).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Round-trip style with `\n` line endings.
    #[must_use]
    pub fn round_trip() -> Self {
        Self::default()
    }

    /// Canonical style with `\n` line endings.
    #[must_use]
    pub fn canonical() -> Self {
        SerializeOptions {
            style: Style::Canonical,
            ..Default::default()
        }
    }

    /// Sets the rendering style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Sets the line terminator.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }
}
