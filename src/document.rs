//! The in-memory INI document model.
//!
//! A [`Document`] owns an implicit global [`Section`] (keys written before any
//! header) followed by named sections in declaration order. Each section owns
//! its [`Entry`] values in insertion order. Nothing is shared: dropping the
//! document drops everything in it.
//!
//! The document-level helpers (`get`, `set`, `get_as`, ...) address the global
//! section with the empty name `""`.
//!
//! ## Examples
//!
//! ```rust
//! use inidoc::Document;
//!
//! let mut doc = Document::new();
//! doc.set("", "name", "demo");
//! doc.set("server", "port", "8080");
//!
//! assert_eq!(doc.get("", "name").unwrap(), "demo");
//! assert_eq!(doc.get_as::<u16>("server", "port").unwrap(), 8080);
//! assert!(doc.get_section("client").is_err());
//! ```

use crate::layout::Layout;
use crate::map::NameMap;
use crate::value::{BoolLiterals, FromValue};
use crate::{Error, ParseOptions, Result, SerializeOptions, Value};
use std::fmt;

/// Opaque identity of a section within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(u32);

impl SectionId {
    pub(crate) const GLOBAL: SectionId = SectionId(0);

    pub(crate) fn new(raw: u32) -> Self {
        SectionId(raw)
    }
}

/// Opaque identity of an entry within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    section: SectionId,
    index: u32,
}

impl EntryId {
    pub(crate) fn new(section: SectionId, index: u32) -> Self {
        EntryId { section, index }
    }

    pub(crate) fn section(&self) -> SectionId {
        self.section
    }
}

/// A comment: its marker character and the text after it.
///
/// Trailing whitespace is dropped; leading whitespace is kept so `;note` and
/// `; note` render back as written.
///
/// # Examples
///
/// ```rust
/// use inidoc::Comment;
///
/// let comment = Comment::new(';', " primary server  ");
/// assert_eq!(comment.text(), " primary server");
/// assert_eq!(comment.to_string(), "; primary server");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    marker: char,
    text: String,
}

impl Comment {
    pub fn new(marker: char, text: &str) -> Self {
        Comment {
            marker,
            text: text.trim_end().to_string(),
        }
    }

    #[must_use]
    pub fn marker(&self) -> char {
        self.marker
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.marker, self.text)
    }
}

/// A key with one or more raw values and an optional inline comment.
///
/// Only the [`Append`](crate::DuplicateKeyPolicy::Append) policy or
/// [`Section::append`] produce more than one value; single-value readers see
/// the last one.
///
/// # Examples
///
/// ```rust
/// use inidoc::parse;
///
/// let doc = parse("[net]\nretries = 3\nverbose = yes\n").unwrap();
/// let net = doc.get_section("net").unwrap();
///
/// assert_eq!(net.get("retries").unwrap().value_as::<u32>().unwrap(), 3);
/// assert!(net.get("verbose").unwrap().as_bool().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Entry {
    id: EntryId,
    key: String,
    values: Vec<String>,
    comment: Option<Comment>,
}

impl Entry {
    fn new(id: EntryId, key: &str) -> Self {
        Entry {
            id,
            key: key.to_string(),
            values: Vec::new(),
            comment: None,
        }
    }

    pub(crate) fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The current value (the last one for multi-valued entries).
    #[must_use]
    pub fn value(&self) -> &str {
        self.values.last().map_or("", String::as_str)
    }

    /// All values in the order they were added.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[must_use]
    pub fn is_multi_valued(&self) -> bool {
        self.values.len() > 1
    }

    #[must_use]
    pub fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    pub fn set_comment(&mut self, comment: Option<Comment>) {
        self.comment = comment;
    }

    /// Replaces all values with a single raw value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.values.clear();
        self.values.push(value.into());
    }

    /// Adds another value, making the entry multi-valued.
    pub fn push_value(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    /// Coerces the value with the default boolean literals.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeCoercion`] if the value does not fit `T`.
    pub fn value_as<T: FromValue>(&self) -> Result<T> {
        T::from_raw(self.value(), &BoolLiterals::default())
    }

    /// Coerces the value using the given boolean literals.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeCoercion`] if the value does not fit `T`.
    pub fn value_as_with<T: FromValue>(&self, literals: &BoolLiterals) -> Result<T> {
        T::from_raw(self.value(), literals)
    }

    /// Coerces every value of a multi-valued entry.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::TypeCoercion`] encountered.
    pub fn values_as<T: FromValue>(&self) -> Result<Vec<T>> {
        let literals = BoolLiterals::default();
        self.values
            .iter()
            .map(|raw| T::from_raw(raw, &literals))
            .collect()
    }

    pub fn as_bool(&self) -> Result<bool> {
        self.value_as()
    }

    pub fn as_bool_with(&self, literals: &BoolLiterals) -> Result<bool> {
        self.value_as_with(literals)
    }

    pub fn as_i64(&self) -> Result<i64> {
        self.value_as()
    }

    pub fn as_f64(&self) -> Result<f64> {
        self.value_as()
    }

    /// The value as text; never fails.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.value()
    }

    /// The value as the most specific [`Value`] it parses as.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::infer(self.value())
    }
}

/// A named, ordered group of entries.
///
/// # Examples
///
/// ```rust
/// use inidoc::Document;
///
/// let mut doc = Document::new();
/// let server = doc.section_or_insert("server");
/// server.set("host", "localhost");
/// server.set_value("port", 8080);
/// assert!(server.insert("host", "other").is_err());
///
/// let keys: Vec<_> = server.keys().collect();
/// assert_eq!(keys, vec!["host", "port"]);
/// ```
#[derive(Debug, Clone)]
pub struct Section {
    id: SectionId,
    name: String,
    entries: NameMap<Entry>,
    next_entry: u32,
}

impl Section {
    pub(crate) fn new(id: SectionId, name: &str, case_sensitive_keys: bool) -> Self {
        Section {
            id,
            name: name.to_string(),
            entries: NameMap::new(case_sensitive_keys),
            next_entry: 0,
        }
    }

    pub(crate) fn id(&self) -> SectionId {
        self.id
    }

    /// The name as first declared; `""` for the global section.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        self.id == SectionId::GLOBAL
    }

    /// Looks up an entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn get(&self, key: &str) -> Result<&Entry> {
        self.entries
            .get(key)
            .ok_or_else(|| Error::key_not_found(&self.name, key))
    }

    /// Looks up an entry for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Entry> {
        match self.entries.get_mut(key) {
            Some(entry) => Ok(entry),
            None => Err(Error::key_not_found(&self.name, key)),
        }
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    fn entry_or_insert(&mut self, key: &str) -> &mut Entry {
        let section = self.id;
        let next = &mut self.next_entry;
        self.entries.get_or_insert_with(key, || {
            let id = EntryId::new(section, *next);
            *next += 1;
            Entry::new(id, key)
        })
    }

    /// Sets a single raw value, inserting the key at the end if it is new.
    /// An existing entry keeps its position and comment.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Entry {
        let entry = self.entry_or_insert(key);
        entry.set_value(value);
        entry
    }

    /// Sets a typed value, rendered in its canonical textual form.
    pub fn set_value(&mut self, key: &str, value: impl Into<Value>) -> &mut Entry {
        self.set(key, value.into().to_raw())
    }

    /// Inserts a new key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if the key exists; the section is unchanged.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Result<&mut Entry> {
        if self.contains_key(key) {
            return Err(Error::duplicate_key(&self.name, key, None));
        }
        Ok(self.set(key, value))
    }

    /// Adds a value to the key, creating it if needed.
    pub fn append(&mut self, key: &str, value: impl Into<String>) -> &mut Entry {
        let entry = self.entry_or_insert(key);
        entry.push_value(value);
        entry
    }

    /// Removes an entry, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn remove(&mut self, key: &str) -> Result<Entry> {
        self.entries
            .remove(key)
            .ok_or_else(|| Error::key_not_found(&self.name, key))
    }

    /// Keys in insertion order, as first written.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(Entry::key)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.entries.values_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A parsed or constructed INI document.
///
/// Every document remembers the [`ParseOptions`] it was created with; those
/// decide name folding for lookups, the delimiter and comment markers used when
/// rendering, and the boolean literals used by [`Document::get_as`].
#[derive(Debug, Clone)]
pub struct Document {
    options: ParseOptions,
    global: Section,
    sections: NameMap<Section>,
    next_section: u32,
    pub(crate) layout: Layout,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&ParseOptions::default())
    }

    /// Creates an empty document that folds names and renders like text parsed
    /// with `options`.
    #[must_use]
    pub fn with_options(options: &ParseOptions) -> Self {
        Document {
            options: options.clone(),
            global: Section::new(SectionId::GLOBAL, "", options.case_sensitive_keys),
            sections: NameMap::new(options.case_sensitive_sections),
            next_section: 1,
            layout: Layout::default(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// The implicit section holding keys that precede every header.
    #[must_use]
    pub fn global(&self) -> &Section {
        &self.global
    }

    pub fn global_mut(&mut self) -> &mut Section {
        &mut self.global
    }

    /// Looks up a section; `""` names the global section.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        if name.is_empty() {
            Some(&self.global)
        } else {
            self.sections.get(name)
        }
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        if name.is_empty() {
            Some(&mut self.global)
        } else {
            self.sections.get_mut(name)
        }
    }

    /// Looks up a section; `""` names the global section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SectionNotFound`] if no section has this name.
    pub fn get_section(&self, name: &str) -> Result<&Section> {
        self.section(name)
            .ok_or_else(|| Error::section_not_found(name))
    }

    /// # Errors
    ///
    /// Returns [`Error::SectionNotFound`] if no section has this name.
    pub fn get_section_mut(&mut self, name: &str) -> Result<&mut Section> {
        match self.section_mut(name) {
            Some(section) => Ok(section),
            None => Err(Error::section_not_found(name)),
        }
    }

    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        name.is_empty() || self.sections.contains(name)
    }

    #[must_use]
    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.section(section)
            .is_some_and(|section| section.contains_key(key))
    }

    /// Returns the named section, appending an empty one if it does not exist.
    pub fn section_or_insert(&mut self, name: &str) -> &mut Section {
        if name.is_empty() {
            return &mut self.global;
        }
        let case_sensitive_keys = self.options.case_sensitive_keys;
        let next = &mut self.next_section;
        self.sections.get_or_insert_with(name, || {
            let id = SectionId::new(*next);
            *next += 1;
            Section::new(id, name, case_sensitive_keys)
        })
    }

    /// Appends a new empty section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateSection`] if the name is taken (the global
    /// section always exists); the document is unchanged.
    pub fn insert_section(&mut self, name: &str) -> Result<&mut Section> {
        if self.has_section(name) {
            return Err(Error::duplicate_section(name, None));
        }
        Ok(self.section_or_insert(name))
    }

    /// Removes a section and everything in it. Removing `""` empties the
    /// global section and returns its former contents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SectionNotFound`] if no section has this name.
    pub fn remove_section(&mut self, name: &str) -> Result<Section> {
        let removed = if name.is_empty() {
            let fresh = Section::new(SectionId::GLOBAL, "", self.options.case_sensitive_keys);
            let old = std::mem::replace(&mut self.global, fresh);
            // Entry ids keep counting so stale formats are never matched again.
            self.global.next_entry = old.next_entry;
            old
        } else {
            self.sections
                .remove(name)
                .ok_or_else(|| Error::section_not_found(name))?
        };
        self.layout.forget_section(removed.id());
        Ok(removed)
    }

    /// Named sections in declaration order (the global section is excluded).
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn sections_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        self.sections.values_mut()
    }

    /// Names of the named sections, as first declared.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.values().map(Section::name)
    }

    /// Number of named sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// `true` when there are no named sections and no global keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.global.is_empty()
    }

    /// Removes every section, entry and captured formatting.
    pub fn clear(&mut self) {
        self.global.clear();
        self.sections.clear();
        self.layout.clear();
    }

    /// Raw value of `key` in `section`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SectionNotFound`] or [`Error::KeyNotFound`].
    pub fn get(&self, section: &str, key: &str) -> Result<&str> {
        self.get_section(section)?.get(key).map(Entry::value)
    }

    /// Typed value of `key` in `section`, coerced with this document's boolean
    /// literals.
    ///
    /// # Errors
    ///
    /// Returns a lookup error or [`Error::TypeCoercion`].
    pub fn get_as<T: FromValue>(&self, section: &str, key: &str) -> Result<T> {
        let entry = self.get_section(section)?.get(key)?;
        entry.value_as_with(&self.options.bool_literals)
    }

    /// Typed value of `key` in `section`, or `default` when it is missing or
    /// does not coerce.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inidoc::parse;
    ///
    /// let doc = parse("[app]\nworkers = many\n").unwrap();
    /// assert_eq!(doc.get_or("app", "workers", 4u32), 4);
    /// assert_eq!(doc.get_or("app", "timeout", 30u32), 30);
    /// ```
    pub fn get_or<T: FromValue>(&self, section: &str, key: &str, default: T) -> T {
        self.get_as(section, key).unwrap_or(default)
    }

    /// Sets a raw value, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) -> &mut Entry {
        self.section_or_insert(section).set(key, value)
    }

    /// Sets a typed value, creating the section if needed.
    pub fn set_value(&mut self, section: &str, key: &str, value: impl Into<Value>) -> &mut Entry {
        self.section_or_insert(section).set_value(key, value)
    }

    /// Removes `key` from `section`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SectionNotFound`] or [`Error::KeyNotFound`].
    pub fn remove(&mut self, section: &str, key: &str) -> Result<Entry> {
        let entry = self.get_section_mut(section)?.remove(key)?;
        self.layout.forget_entry(entry.id());
        Ok(entry)
    }

    /// Renders the document with explicit options.
    #[must_use]
    pub fn to_string_with(&self, options: &SerializeOptions) -> String {
        crate::ser::serialize(self, options)
    }

    /// A plain listing for debugging: every section with a header (`[Global]`
    /// for global keys) followed by indented `key = value` lines.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inidoc::parse;
    ///
    /// let doc = parse("top = 1\n[a]\nk = v\n").unwrap();
    /// assert_eq!(doc.dump(), "[Global]\n  top = 1\n\n[a]\n  k = v\n\n");
    /// ```
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let global = (!self.global.is_empty()).then_some(&self.global);
        for section in global.into_iter().chain(self.sections()) {
            let name = if section.is_global() {
                "Global"
            } else {
                section.name()
            };
            out.push_str(&format!("[{name}]\n"));
            for entry in section.entries() {
                for value in entry.values() {
                    out.push_str(&format!("  {} = {}\n", entry.key(), value));
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Renders in round-trip style with `\n` line endings.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(&SerializeOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_in_place() {
        let mut doc = Document::new();
        doc.set("s", "a", "1");
        doc.set("s", "b", "2");
        doc.set("s", "a", "3");

        let section = doc.get_section("s").unwrap();
        let pairs: Vec<_> = section.entries().map(|e| (e.key(), e.value())).collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_insert_duplicate_leaves_section_unchanged() {
        let mut doc = Document::new();
        doc.set("s", "a", "1");
        let err = doc.section_mut("s").unwrap().insert("a", "2").unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }));
        assert_eq!(doc.get("s", "a").unwrap(), "1");
        assert_eq!(doc.get_section("s").unwrap().len(), 1);
    }

    #[test]
    fn test_lookup_errors() {
        let mut doc = Document::new();
        doc.set("s", "a", "1");
        assert!(matches!(
            doc.get("missing", "a"),
            Err(Error::SectionNotFound { .. })
        ));
        assert!(matches!(doc.get("s", "b"), Err(Error::KeyNotFound { .. })));
        assert!(matches!(
            doc.get_as::<i32>("s", "a"),
            Ok(1)
        ));
    }

    #[test]
    fn test_case_insensitive_names() {
        let options = ParseOptions::new()
            .with_case_sensitive_keys(false)
            .with_case_sensitive_sections(false);
        let mut doc = Document::with_options(&options);
        doc.set("Server", "Host", "a");
        doc.set("SERVER", "host", "b");

        assert_eq!(doc.len(), 1);
        let section = doc.get_section("server").unwrap();
        assert_eq!(section.name(), "Server");
        assert_eq!(section.get("HOST").unwrap().key(), "Host");
        assert_eq!(section.get("HOST").unwrap().value(), "b");
    }

    #[test]
    fn test_append_and_values() {
        let mut doc = Document::new();
        let section = doc.section_or_insert("paths");
        section.append("include", "a");
        section.append("include", "b");
        let entry = section.get("include").unwrap();
        assert!(entry.is_multi_valued());
        assert_eq!(entry.values(), ["a", "b"]);
        assert_eq!(entry.value(), "b");
    }

    #[test]
    fn test_remove_section_and_global() {
        let mut doc = Document::new();
        doc.set("", "top", "1");
        doc.set("a", "k", "v");
        doc.set("b", "k", "v");

        let removed = doc.remove_section("a").unwrap();
        assert_eq!(removed.name(), "a");
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["b"]);
        assert!(doc.remove_section("a").is_err());

        let global = doc.remove_section("").unwrap();
        assert_eq!(global.len(), 1);
        assert!(doc.global().is_empty());
    }

    #[test]
    fn test_insert_section_rejects_existing() {
        let mut doc = Document::new();
        doc.insert_section("a").unwrap();
        assert!(matches!(
            doc.insert_section("a"),
            Err(Error::DuplicateSection { .. })
        ));
        assert!(doc.insert_section("").is_err());
    }

    #[test]
    fn test_typed_set_uses_canonical_text() {
        let mut doc = Document::new();
        doc.set_value("n", "ratio", 0.5);
        doc.set_value("n", "enabled", true);
        doc.set_value("n", "count", -3);
        assert_eq!(doc.get("n", "ratio").unwrap(), "0.5");
        assert_eq!(doc.get("n", "enabled").unwrap(), "true");
        assert_eq!(doc.get("n", "count").unwrap(), "-3");
    }

    #[test]
    fn test_clear_forgets_bom_and_missing_final_newline() {
        let mut doc = crate::parse("\u{feff}[old]\nk = v").unwrap();
        assert_eq!(doc.to_string(), "\u{feff}[old]\nk = v");

        doc.clear();
        doc.set("new", "k", "v");
        assert_eq!(doc.to_string(), "[new]\nk = v\n");
    }
}
