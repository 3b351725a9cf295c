//! INI rendering and serialization.
//!
//! This module holds both halves of the write path:
//!
//! - the [`Renderer`], which turns a [`Document`] back into text in one of two
//!   [`Style`]s;
//! - the **serde bridge**, which turns any `T: Serialize` shaped like a config
//!   (scalar fields and one level of struct or map fields) into a [`Document`].
//!
//! ## Styles
//!
//! **Round-trip** re-emits every line captured at parse time whose value is
//! unchanged, together with the comments and blank lines around it, so an
//! unmodified document reproduces its input. Changed or new entries are
//! rendered canonically in place.
//!
//! **Canonical** normalises spacing: `[name]` headers, `key = value` entries,
//! standalone comments kept, blank lines dropped except one before each
//! section. Rendering canonical output again yields the same text.
//!
//! ## Examples
//!
//! ```rust
//! use inidoc::{parse, serialize, SerializeOptions};
//!
//! let text = "; settings\n[server]\nhost=localhost   ; primary\nport=80\n";
//! let mut doc = parse(text).unwrap();
//! assert_eq!(doc.to_string(), text);
//!
//! doc.set("server", "port", "8080");
//! assert_eq!(
//!     doc.to_string(),
//!     "; settings\n[server]\nhost=localhost   ; primary\nport = 8080\n"
//! );
//!
//! let canonical = serialize(&doc, &SerializeOptions::canonical());
//! assert_eq!(
//!     canonical,
//!     "; settings\n[server]\nhost = localhost ; primary\nport = 8080\n"
//! );
//! ```

use crate::document::{Entry, Section};
use crate::layout::{is_blank, LineFormat};
use crate::tokenizer::BOM;
use crate::value::render_float;
use crate::{Comment, Document, Error, ParseOptions, Result, SerializeOptions, Style};
use serde::{ser, Serialize};
use std::borrow::Cow;

/// Renders documents into a string buffer.
///
/// # Examples
///
/// ```rust
/// use inidoc::ser::Renderer;
/// use inidoc::{Document, LineEnding, SerializeOptions};
///
/// let mut doc = Document::new();
/// doc.set("a", "k", "v");
///
/// let mut renderer = Renderer::new(SerializeOptions::canonical().with_line_ending(LineEnding::CrLf));
/// renderer.render(&doc);
/// assert_eq!(renderer.into_inner(), "[a]\r\nk = v\r\n");
/// ```
pub struct Renderer {
    output: String,
    options: SerializeOptions,
}

impl Renderer {
    pub fn new(options: SerializeOptions) -> Self {
        Renderer {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends the rendering of `document` to the buffer.
    pub fn render(&mut self, document: &Document) {
        match self.options.style {
            Style::RoundTrip => self.round_trip(document),
            Style::Canonical => self.canonical(document),
        }
    }

    fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push_str(self.options.line_ending.as_str());
    }

    fn round_trip(&mut self, document: &Document) {
        let layout = &document.layout;
        if layout.bom {
            self.output.push(BOM);
        }
        let body = self.output.len();

        for entry in document.global().entries() {
            self.round_trip_entry(document, entry);
        }

        for section in document.sections() {
            match layout.section(section.id()) {
                Some(format) => {
                    for trivia in &format.leading {
                        self.line(trivia);
                    }
                    self.line(&format.raw);
                }
                None => {
                    if self.output.len() > body {
                        self.line("");
                    }
                    self.header(section.name(), None);
                }
            }
            for entry in section.entries() {
                self.round_trip_entry(document, entry);
            }
        }

        for trivia in &layout.trailing {
            self.line(trivia);
        }

        if !layout.final_newline {
            let ending = self.options.line_ending.as_str();
            if self.output.len() > body && self.output.ends_with(ending) {
                self.output.truncate(self.output.len() - ending.len());
            }
        }
    }

    fn round_trip_entry(&mut self, document: &Document, entry: &Entry) {
        let captured: &[LineFormat] = document
            .layout
            .entry(entry.id())
            .map_or(&[][..], |format| format.lines.as_slice());
        let last = entry.values().len().saturating_sub(1);

        for (i, value) in entry.values().iter().enumerate() {
            let Some(line) = captured.get(i) else {
                let comment = if i == last { entry.comment() } else { None };
                self.entry_line(document.options(), entry.key(), value, comment);
                continue;
            };

            for trivia in &line.leading {
                self.line(trivia);
            }
            let comment = if i == last {
                entry.comment()
            } else {
                line.comment.as_ref()
            };
            if line.value == *value && line.comment.as_ref() == comment {
                self.line(&line.raw);
            } else {
                self.entry_line(document.options(), entry.key(), value, comment);
            }
        }
    }

    fn canonical(&mut self, document: &Document) {
        let layout = &document.layout;
        let body = self.output.len();

        self.canonical_entries(document, document.global());

        for section in document.sections() {
            if self.output.len() > body {
                self.line("");
            }
            let format = layout.section(section.id());
            if let Some(format) = format {
                self.comments(&format.leading);
            }
            self.header(
                section.name(),
                format.and_then(|format| format.comment.as_ref()),
            );
            self.canonical_entries(document, section);
        }

        self.comments(&layout.trailing);
    }

    fn canonical_entries(&mut self, document: &Document, section: &Section) {
        for entry in section.entries() {
            let captured: &[LineFormat] = document
                .layout
                .entry(entry.id())
                .map_or(&[][..], |format| format.lines.as_slice());
            let last = entry.values().len().saturating_sub(1);

            for (i, value) in entry.values().iter().enumerate() {
                let line = captured.get(i);
                if let Some(line) = line {
                    self.comments(&line.leading);
                }
                let comment = if i == last {
                    entry.comment()
                } else {
                    line.and_then(|line| line.comment.as_ref())
                };
                self.entry_line(document.options(), entry.key(), value, comment);
            }
        }
    }

    /// Emits standalone comments, dropping blank lines.
    fn comments(&mut self, trivia: &[String]) {
        for raw in trivia.iter().filter(|raw| !is_blank(raw)) {
            self.line(raw.trim());
        }
    }

    fn header(&mut self, name: &str, comment: Option<&Comment>) {
        let text = match comment {
            Some(comment) => format!("[{name}] {comment}"),
            None => format!("[{name}]"),
        };
        self.line(&text);
    }

    fn entry_line(
        &mut self,
        options: &ParseOptions,
        key: &str,
        value: &str,
        comment: Option<&Comment>,
    ) {
        let mut text = format!("{key} {}", options.delimiter.as_char());
        if !value.is_empty() {
            text.push(' ');
            text.push_str(&quote_if_needed(value, options));
        }
        if let Some(comment) = comment {
            text.push(' ');
            text.push_str(&comment.to_string());
        }
        self.line(&text);
    }
}

/// Renders `document` with `options`.
///
/// # Examples
///
/// ```rust
/// use inidoc::{parse, serialize, SerializeOptions};
///
/// let doc = parse("[a]\n\n\nk=v\n").unwrap();
/// assert_eq!(serialize(&doc, &SerializeOptions::canonical()), "[a]\nk = v\n");
/// ```
#[must_use]
pub fn serialize(document: &Document, options: &SerializeOptions) -> String {
    let mut renderer = Renderer::new(*options);
    renderer.render(document);
    renderer.into_inner()
}

/// Returns `raw` as it must appear after the delimiter so that parsing it with
/// `options` yields `raw` again.
///
/// Values are double-quoted when they have leading or trailing whitespace,
/// start with a quote, or contain the delimiter, a comment marker or a control
/// character. Quotes and backslashes elsewhere are read literally and stay
/// bare. Inside quotes `\`, `"`, newline, carriage return and tab are escaped.
///
/// # Examples
///
/// ```rust
/// use inidoc::ser::quote_if_needed;
/// use inidoc::ParseOptions;
///
/// let options = ParseOptions::default();
/// assert_eq!(quote_if_needed("plain", &options), "plain");
/// assert_eq!(quote_if_needed("  padded", &options), "\"  padded\"");
/// assert_eq!(quote_if_needed("a;b", &options), "\"a;b\"");
/// assert_eq!(quote_if_needed("line\nbreak", &options), "\"line\\nbreak\"");
/// assert_eq!(quote_if_needed(r"C:\dir", &options), r"C:\dir");
/// assert_eq!(quote_if_needed("'quoted'", &options), "\"'quoted'\"");
/// ```
pub fn quote_if_needed<'a>(raw: &'a str, options: &ParseOptions) -> Cow<'a, str> {
    let delimiter = options.delimiter.as_char();
    let needs_quotes = raw.trim() != raw
        || raw.starts_with(['"', '\''])
        || raw
            .chars()
            .any(|c| c == delimiter || options.is_comment_marker(c) || c.is_control());
    if !needs_quotes {
        return Cow::Borrowed(raw);
    }

    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Builds a [`Document`] from any `T: Serialize` shaped like a config.
///
/// Scalar fields become global keys, sequences of scalars become multi-valued
/// entries, struct or map fields become sections, and `None` fields are
/// skipped. Anything nested deeper fails with [`Error::Custom`].
///
/// # Examples
///
/// ```rust
/// use inidoc::to_document;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Server { host: String, port: u16 }
///
/// #[derive(Serialize)]
/// struct Config { name: String, server: Server }
///
/// let config = Config {
///     name: "demo".into(),
///     server: Server { host: "localhost".into(), port: 8080 },
/// };
/// let doc = to_document(&config).unwrap();
/// assert_eq!(doc.get("", "name").unwrap(), "demo");
/// assert_eq!(doc.get("server", "port").unwrap(), "8080");
/// ```
///
/// # Errors
///
/// Returns an error if the value is not a struct or map, nests tables below
/// sections, or uses enum variants carrying data.
pub fn to_document<T>(value: &T) -> Result<Document>
where
    T: ?Sized + Serialize,
{
    let fields = match value.serialize(NodeSerializer::new(Level::Root))? {
        Node::Table(fields) => fields,
        _ => return Err(Error::custom("top-level value must serialize as a struct or map")),
    };

    let mut document = Document::new();
    for (key, node) in fields {
        match node {
            Node::Skip => {}
            Node::Scalar(raw) => {
                document.set("", &key, raw);
            }
            Node::List(values) => {
                let global = document.global_mut();
                for raw in values {
                    global.append(&key, raw);
                }
            }
            Node::Table(entries) => {
                let section = document.section_or_insert(&key);
                for (key, node) in entries {
                    match node {
                        Node::Skip => {}
                        Node::Scalar(raw) => {
                            section.set(&key, raw);
                        }
                        Node::List(values) => {
                            for raw in values {
                                section.append(&key, raw);
                            }
                        }
                        Node::Table(_) => return Err(too_deep()),
                    }
                }
            }
        }
    }
    Ok(document)
}

fn too_deep() -> Error {
    Error::custom("INI supports one level of sections; nested tables are not representable")
}

/// Intermediate shape of a serialized value.
#[derive(Debug, PartialEq)]
enum Node {
    Skip,
    Scalar(String),
    List(Vec<String>),
    Table(Vec<(String, Node)>),
}

/// Where in the document a serialized value will land.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    /// The whole document: must be a struct or map.
    Root,
    /// A field of the document: global key or section.
    Field,
    /// A key inside a section.
    Entry,
    /// One value of a multi-valued entry, or a map key.
    Item,
}

#[derive(Clone, Copy)]
struct NodeSerializer {
    level: Level,
}

impl NodeSerializer {
    fn new(level: Level) -> Self {
        NodeSerializer { level }
    }

    fn scalar(self, raw: String) -> Result<Node> {
        if self.level == Level::Root {
            return Err(Error::custom("top-level value must serialize as a struct or map"));
        }
        Ok(Node::Scalar(raw))
    }
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = Error;

    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = ser::Impossible<Node, Error>;
    type SerializeMap = SerializeTable;
    type SerializeStruct = SerializeTable;
    type SerializeStructVariant = ser::Impossible<Node, Error>;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        self.scalar(render_float(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        self.scalar(render_float(v))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        self.scalar(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Node> {
        Err(Error::custom("byte arrays have no INI representation"))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::Skip)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        self.scalar(String::new())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        self.scalar(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::custom(format!(
            "enum variant '{variant}' carries data and has no INI representation"
        )))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList> {
        match self.level {
            Level::Field | Level::Entry => Ok(SerializeList::new(len)),
            Level::Root => Err(Error::custom(
                "top-level value must serialize as a struct or map",
            )),
            Level::Item => Err(Error::custom(
                "multi-valued entries can only hold scalars",
            )),
        }
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeList> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeList> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::custom(format!(
            "enum variant '{variant}' carries data and has no INI representation"
        )))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeTable> {
        match self.level {
            Level::Root => Ok(SerializeTable::new(Level::Field)),
            Level::Field => Ok(SerializeTable::new(Level::Entry)),
            Level::Entry | Level::Item => Err(too_deep()),
        }
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeTable> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::custom(format!(
            "enum variant '{variant}' carries data and has no INI representation"
        )))
    }
}

struct SerializeList {
    values: Vec<String>,
}

impl SerializeList {
    fn new(len: Option<usize>) -> Self {
        SerializeList {
            values: Vec::with_capacity(len.unwrap_or(0)),
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match value.serialize(NodeSerializer::new(Level::Item))? {
            Node::Scalar(raw) => self.values.push(raw),
            Node::Skip => {}
            Node::List(_) | Node::Table(_) => {
                return Err(Error::custom("multi-valued entries can only hold scalars"))
            }
        }
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeList {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::List(self.values))
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::List(self.values))
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::List(self.values))
    }
}

struct SerializeTable {
    children: Level,
    entries: Vec<(String, Node)>,
    current_key: Option<String>,
}

impl SerializeTable {
    fn new(children: Level) -> Self {
        SerializeTable {
            children,
            entries: Vec::new(),
            current_key: None,
        }
    }

    fn insert<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let node = value.serialize(NodeSerializer::new(self.children))?;
        self.entries.push((key, node));
        Ok(())
    }
}

impl ser::SerializeMap for SerializeTable {
    type Ok = Node;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(NodeSerializer::new(Level::Item))? {
            Node::Scalar(name) if !name.is_empty() => {
                self.current_key = Some(name);
                Ok(())
            }
            _ => Err(Error::custom("map keys must be non-empty scalars")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Table(self.entries))
    }
}

impl ser::SerializeStruct for SerializeTable {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Table(self.entries))
    }
}
