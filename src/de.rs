//! INI parsing and deserialization.
//!
//! This module holds both halves of the read path:
//!
//! - the **parser**, which drives the [`Tokenizer`] over the input and builds a
//!   [`Document`], applying the duplicate policies and the strict or lenient
//!   error mode of the active [`ParseOptions`];
//! - the **serde bridge**, which presents a parsed [`Document`] to any
//!   `T: Deserialize` as a map of global keys followed by one nested map per
//!   section.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use inidoc::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Server { host: String, port: u16 }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config { name: String, server: Server }
//!
//! let text = "name = demo\n\n[server]\nhost = localhost\nport = 8080\n";
//! let config: Config = from_str(text).unwrap();
//! assert_eq!(config.server.port, 8080);
//! ```
//!
//! ## Coercion
//!
//! Scalars requested by the target type are coerced with the document's
//! [`BoolLiterals`] and the [`FromValue`] rules, so `enabled = yes` reads as a
//! `bool` and `port = 0x1F90` as a `u16`. Sequences read every value of a
//! multi-valued entry. Optional fields are `Some` whenever the key exists.

use crate::document::{Entry, Section};
use crate::error::Diagnostic;
use crate::layout::{LineFormat, SectionFormat};
use crate::tokenizer::{Token, TokenKind, Tokenizer, BOM};
use crate::value::{BoolLiterals, FromValue};
use crate::{
    Comment, Document, DuplicateKeyPolicy, DuplicateSectionPolicy, Error, Mode, ParseOptions,
    Result, Value,
};
use serde::de::value::BorrowedStrDeserializer;
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};
use std::mem;

/// Outcome of a successful parse: the document plus, in lenient mode, every
/// problem that caused a line to be skipped.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

/// Where key/value lines currently go.
enum Target {
    /// A section by name; `""` is the global section.
    Section(String),
    /// Lines after a rejected duplicate header, up to the next accepted one.
    Discard,
}

/// Builds a [`Document`] from a token stream.
pub(crate) struct Parser<'a> {
    options: &'a ParseOptions,
    document: Document,
    diagnostics: Vec<Diagnostic>,
    target: Target,
    /// Blank and comment lines waiting for the next header or entry.
    pending: Vec<String>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(options: &'a ParseOptions) -> Self {
        Parser {
            options,
            document: Document::with_options(options),
            diagnostics: Vec::new(),
            target: Target::Section(String::new()),
            pending: Vec::new(),
        }
    }

    /// Parses `text` to completion.
    ///
    /// In strict mode the first error is returned; in lenient mode every error
    /// becomes a [`Diagnostic`] and the offending line is skipped.
    pub(crate) fn parse(mut self, text: &str) -> Result<Parsed> {
        for token in Tokenizer::new(text, self.options) {
            let (line, column) = (token.line, token.column);
            if let Err(error) = self.accept(token) {
                self.recover(error, line, column)?;
            }
        }
        Ok(self.finish(text))
    }

    fn accept(&mut self, token: Token<'_>) -> Result<()> {
        match token.kind {
            TokenKind::BlankLine | TokenKind::Comment(_) => {
                self.pending.push(token.raw.to_string());
                Ok(())
            }
            TokenKind::SectionHeader { name, comment } => {
                self.header(token.line, token.raw, name, comment)
            }
            TokenKind::KeyValue {
                key,
                value,
                comment,
            } => self.key_value(token.line, token.column, token.raw, key, value, comment),
            TokenKind::Error { reason } => Err(Error::syntax(token.line, token.column, &reason)),
        }
    }

    fn header(
        &mut self,
        line: usize,
        raw: &str,
        name: String,
        comment: Option<Comment>,
    ) -> Result<()> {
        if self.document.section(&name).is_some() {
            return match self.options.duplicate_sections {
                DuplicateSectionPolicy::Merge => {
                    tracing::debug!(section = %name, line, "merging repeated section header");
                    self.target = Target::Section(name);
                    Ok(())
                }
                DuplicateSectionPolicy::Reject => {
                    self.target = Target::Discard;
                    Err(Error::duplicate_section(&name, Some(line)))
                }
            };
        }

        let id = self.document.section_or_insert(&name).id();
        self.document.layout.sections.insert(
            id,
            SectionFormat {
                leading: mem::take(&mut self.pending),
                raw: raw.to_string(),
                comment,
            },
        );
        tracing::trace!(section = %name, line, "section created");
        self.target = Target::Section(name);
        Ok(())
    }

    fn key_value(
        &mut self,
        line: usize,
        column: usize,
        raw: &str,
        key: String,
        value: String,
        comment: Option<Comment>,
    ) -> Result<()> {
        let name = match &self.target {
            Target::Section(name) => name,
            Target::Discard => {
                return Err(Error::syntax(
                    line,
                    column,
                    &format!("key '{key}' belongs to a rejected duplicate section"),
                ))
            }
        };

        let policy = self.options.duplicate_keys;
        let section = self.document.section_or_insert(name);
        let exists = section.contains_key(&key);
        if exists && policy == DuplicateKeyPolicy::Reject {
            return Err(Error::duplicate_key(section.name(), &key, Some(line)));
        }

        let format = LineFormat {
            leading: mem::take(&mut self.pending),
            raw: raw.to_string(),
            value: value.clone(),
            comment: comment.clone(),
        };
        let entry = if exists && policy == DuplicateKeyPolicy::Append {
            section.append(&key, value)
        } else {
            section.set(&key, value)
        };
        entry.set_comment(comment);
        let id = entry.id();

        let layout = &mut self.document.layout;
        match (exists, policy) {
            (false, _) => layout.record_entry(id, format),
            (true, DuplicateKeyPolicy::Append) => {
                tracing::debug!(key = %key, line, "appending value to repeated key");
                layout.append_entry(id, format);
            }
            (true, _) => {
                tracing::debug!(key = %key, line, "repeated key overwrites earlier value");
                layout.replace_entry(id, format);
            }
        }
        Ok(())
    }

    fn recover(&mut self, error: Error, line: usize, column: usize) -> Result<()> {
        if self.options.mode == Mode::Strict {
            return Err(error);
        }
        tracing::warn!(line, column, %error, "skipping malformed line");
        self.diagnostics.push(Diagnostic::new(line, column, error));
        Ok(())
    }

    fn finish(mut self, text: &str) -> Parsed {
        let layout = &mut self.document.layout;
        layout.trailing = mem::take(&mut self.pending);
        layout.final_newline = text.is_empty() || text.ends_with('\n');
        layout.bom = text.starts_with(BOM);

        tracing::debug!(
            sections = self.document.len(),
            diagnostics = self.diagnostics.len(),
            "parsed document"
        );
        Parsed {
            document: self.document,
            diagnostics: self.diagnostics,
        }
    }
}

/// Presents a whole [`Document`] to serde as a map.
///
/// Global entries come first as `key -> value`; each named section follows as
/// `name -> { key -> value }`.
pub struct Deserializer<'a> {
    document: &'a Document,
}

impl<'a> Deserializer<'a> {
    pub fn new(document: &'a Document) -> Self {
        Deserializer { document }
    }
}

impl<'de> de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(DocumentAccess::new(self.document))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

#[derive(Clone, Copy)]
enum Item<'a> {
    Entry(&'a Entry),
    Section(&'a Section),
}

struct DocumentAccess<'a> {
    items: std::vec::IntoIter<Item<'a>>,
    pending: Option<Item<'a>>,
    literals: &'a BoolLiterals,
}

impl<'a> DocumentAccess<'a> {
    fn new(document: &'a Document) -> Self {
        let items: Vec<_> = document
            .global()
            .entries()
            .map(Item::Entry)
            .chain(document.sections().map(Item::Section))
            .collect();
        DocumentAccess {
            items: items.into_iter(),
            pending: None,
            literals: &document.options().bool_literals,
        }
    }
}

impl<'de> de::MapAccess<'de> for DocumentAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some(item) = self.items.next() else {
            return Ok(None);
        };
        let name = match item {
            Item::Entry(entry) => entry.key(),
            Item::Section(section) => section.name(),
        };
        self.pending = Some(item);
        seed.deserialize(BorrowedStrDeserializer::new(name)).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some(Item::Entry(entry)) => {
                seed.deserialize(ValueDeserializer::new(entry.values(), self.literals))
            }
            Some(Item::Section(section)) => {
                seed.deserialize(SectionDeserializer::new(section, self.literals))
            }
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Presents one section to serde as a map of its entries.
struct SectionDeserializer<'a> {
    section: &'a Section,
    literals: &'a BoolLiterals,
}

impl<'a> SectionDeserializer<'a> {
    fn new(section: &'a Section, literals: &'a BoolLiterals) -> Self {
        SectionDeserializer { section, literals }
    }
}

impl<'de> de::Deserializer<'de> for SectionDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let entries: Vec<_> = self.section.entries().collect();
        visitor.visit_map(SectionAccess {
            entries: entries.into_iter(),
            pending: None,
            literals: self.literals,
        })
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

struct SectionAccess<'a> {
    entries: std::vec::IntoIter<&'a Entry>,
    pending: Option<&'a Entry>,
    literals: &'a BoolLiterals,
}

impl<'de> de::MapAccess<'de> for SectionAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some(entry) = self.entries.next() else {
            return Ok(None);
        };
        self.pending = Some(entry);
        seed.deserialize(BorrowedStrDeserializer::new(entry.key()))
            .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some(entry) => seed.deserialize(ValueDeserializer::new(entry.values(), self.literals)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Presents the raw values of one entry to serde.
///
/// Scalar requests read the last value; sequence requests read all of them.
struct ValueDeserializer<'a> {
    values: &'a [String],
    literals: &'a BoolLiterals,
}

impl<'a> ValueDeserializer<'a> {
    fn new(values: &'a [String], literals: &'a BoolLiterals) -> Self {
        ValueDeserializer { values, literals }
    }

    fn raw(&self) -> &'a str {
        self.values.last().map_or("", String::as_str)
    }

    fn coerce<T: FromValue>(&self) -> Result<T> {
        T::from_raw(self.raw(), self.literals)
    }
}

macro_rules! deserialize_coerced {
    ($($method:ident => $visit:ident: $t:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(self.coerce::<$t>()?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = Error;

    /// Self-describing targets see the most specific scalar the text parses as.
    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.values.len() > 1 {
            return self.deserialize_seq(visitor);
        }
        match Value::infer(self.raw()) {
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(_) => visitor.visit_borrowed_str(self.raw()),
        }
    }

    deserialize_coerced! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
        deserialize_char => visit_char: char,
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.raw())
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.raw())
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(self.raw().as_bytes())
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.raw().is_empty() {
            visitor.visit_unit()
        } else {
            Err(Error::custom(format!(
                "expected an empty value, found '{}'",
                self.raw()
            )))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(SeqAccess {
            values: self.values.iter(),
            literals: self.literals,
        })
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::custom(
            "INI values cannot hold nested tables; only sections may contain keys",
        ))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self.raw().into_deserializer())
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct SeqAccess<'a> {
    values: std::slice::Iter<'a, String>,
    literals: &'a BoolLiterals,
}

impl<'de> de::SeqAccess<'de> for SeqAccess<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.values.next() {
            Some(value) => seed
                .deserialize(ValueDeserializer::new(
                    std::slice::from_ref(value),
                    self.literals,
                ))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    fn parse_with(text: &str, options: &ParseOptions) -> Result<Parsed> {
        Parser::new(options).parse(text)
    }

    #[test]
    fn test_global_keys_and_sections() {
        let parsed = parse_with("a = 1\n[s]\nb = 2\n", &ParseOptions::default()).unwrap();
        let doc = parsed.document;
        assert_eq!(doc.get("", "a").unwrap(), "1");
        assert_eq!(doc.get("s", "b").unwrap(), "2");
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_duplicate_key_policies() {
        let text = "[s]\nk = 1\nother = x\nk = 2\n";

        let doc = parse_with(text, &ParseOptions::default()).unwrap().document;
        let keys: Vec<_> = doc.get_section("s").unwrap().keys().collect();
        assert_eq!(keys, vec!["k", "other"]);
        assert_eq!(doc.get("s", "k").unwrap(), "2");

        let append = ParseOptions::new().with_duplicate_keys(DuplicateKeyPolicy::Append);
        let doc = parse_with(text, &append).unwrap().document;
        let entry = doc.get_section("s").unwrap().get("k").unwrap();
        assert_eq!(entry.values(), ["1", "2"]);

        let reject = ParseOptions::new().with_duplicate_keys(DuplicateKeyPolicy::Reject);
        let err = parse_with(text, &reject).unwrap_err();
        assert_eq!(err, Error::duplicate_key("s", "k", Some(4)));
    }

    #[test]
    fn test_duplicate_section_merge_and_reject() {
        let text = "[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\n";

        let doc = parse_with(text, &ParseOptions::default()).unwrap().document;
        let names: Vec<_> = doc.section_names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(doc.get("a", "z").unwrap(), "3");

        let reject = ParseOptions::new().with_duplicate_sections(DuplicateSectionPolicy::Reject);
        let err = parse_with(text, &reject).unwrap_err();
        assert!(matches!(err, Error::DuplicateSection { line: Some(5), .. }));
    }

    #[test]
    fn test_lenient_rejected_section_discards_entries() {
        let options = ParseOptions::lenient()
            .with_duplicate_sections(DuplicateSectionPolicy::Reject);
        let parsed = parse_with("[a]\nx = 1\n[a]\ny = 2\nz = 3\n[b]\nw = 4\n", &options).unwrap();

        let lines: Vec<_> = parsed.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(!parsed.document.has_key("a", "y"));
        assert_eq!(parsed.document.get("b", "w").unwrap(), "4");
    }

    #[test]
    fn test_strict_stops_at_first_error() {
        let err = parse_with("ok = 1\nbad line\n[]\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 2, col: 1, .. }));
    }

    #[test]
    fn test_lenient_collects_every_error() {
        let parsed = parse_with("ok = 1\nbad line\n[]\nfine = 2\n", &ParseOptions::lenient()).unwrap();
        assert_eq!(parsed.diagnostics.len(), 2);
        assert_eq!(parsed.document.global().len(), 2);
    }

    #[test]
    fn test_case_insensitive_merge_keeps_first_spelling() {
        let options = ParseOptions::new()
            .with_case_sensitive_sections(false)
            .with_case_sensitive_keys(false);
        let doc = parse_with("[Net]\nHost = a\n[NET]\nhost = b\n", &options)
            .unwrap()
            .document;
        assert_eq!(doc.len(), 1);
        let section = doc.get_section("net").unwrap();
        assert_eq!(section.name(), "Net");
        assert_eq!(section.get("HOST").unwrap().key(), "Host");
        assert_eq!(doc.get("net", "host").unwrap(), "b");
    }

    #[test]
    fn test_layout_records_trivia_and_newline_state() {
        let doc = parse_with("; head\n[s]\n\nk = v\n; tail", &ParseOptions::default())
            .unwrap()
            .document;
        assert_eq!(doc.layout.trailing, vec!["; tail"]);
        assert!(!doc.layout.final_newline);
        let id = doc.get_section("s").unwrap().id();
        assert_eq!(doc.layout.section(id).unwrap().leading, vec!["; head"]);
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Server {
        host: String,
        port: u16,
        tls: bool,
        #[serde(default)]
        aliases: Vec<String>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Config {
        name: String,
        ratio: f64,
        server: Server,
        missing: Option<u8>,
    }

    #[test]
    fn test_deserialize_struct_with_coercion() {
        let text = "name = demo\nratio = 0.5\n[server]\nhost = localhost\nport = 0x1F90\ntls = on\n";
        let doc = parse_with(text, &ParseOptions::default()).unwrap().document;
        let config = Config::deserialize(Deserializer::new(&doc)).unwrap();
        assert_eq!(
            config,
            Config {
                name: "demo".to_string(),
                ratio: 0.5,
                server: Server {
                    host: "localhost".to_string(),
                    port: 8080,
                    tls: true,
                    aliases: Vec::new(),
                },
                missing: None,
            }
        );
    }

    #[test]
    fn test_deserialize_multi_valued_as_seq() {
        let options = ParseOptions::new().with_duplicate_keys(DuplicateKeyPolicy::Append);
        let text = "[s]\nlist = a\nlist = b\n";
        let doc = parse_with(text, &options).unwrap().document;
        let map: HashMap<String, HashMap<String, Vec<String>>> =
            Deserialize::deserialize(Deserializer::new(&doc)).unwrap();
        assert_eq!(map["s"]["list"], vec!["a", "b"]);
    }

    #[test]
    fn test_deserialize_reports_coercion_failure() {
        let doc = parse_with("[server]\nhost = h\nport = big\ntls = no\n", &ParseOptions::default())
            .unwrap()
            .document;
        #[derive(Deserialize, Debug)]
        struct Only {
            #[allow(dead_code)]
            server: Server,
        }
        let err = Only::deserialize(Deserializer::new(&doc)).unwrap_err();
        assert!(matches!(err, Error::TypeCoercion { .. }));
    }
}
