//! Formatting side-tables for round-trip rendering.
//!
//! The document model only knows names, values and inline comments. Everything
//! else the parser saw (original spacing, quoting, blank lines and standalone
//! comments) is recorded here, keyed by the id of the section or entry it
//! belongs to. The renderer consults these tables; nothing else does.
//!
//! Standalone comments and blank lines are stored as *leading trivia* of the
//! next header or entry line. Trivia after the last element is kept as
//! document trailing trivia.

use crate::document::{Comment, EntryId, SectionId};
use std::collections::HashMap;

/// Captured formatting of a section header line.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SectionFormat {
    pub leading: Vec<String>,
    pub raw: String,
    pub comment: Option<Comment>,
}

/// Captured formatting of one `key = value` line.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LineFormat {
    pub leading: Vec<String>,
    pub raw: String,
    /// The decoded value as parsed; the raw line is reusable while the entry
    /// still holds this value.
    pub value: String,
    pub comment: Option<Comment>,
}

/// Captured formatting of an entry: one line per stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EntryFormat {
    pub lines: Vec<LineFormat>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Layout {
    pub sections: HashMap<SectionId, SectionFormat>,
    pub entries: HashMap<EntryId, EntryFormat>,
    pub trailing: Vec<String>,
    pub final_newline: bool,
    pub bom: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            sections: HashMap::new(),
            entries: HashMap::new(),
            trailing: Vec::new(),
            final_newline: true,
            bom: false,
        }
    }
}

impl Layout {
    pub fn section(&self, id: SectionId) -> Option<&SectionFormat> {
        self.sections.get(&id)
    }

    pub fn entry(&self, id: EntryId) -> Option<&EntryFormat> {
        self.entries.get(&id)
    }

    /// Records the first line of a new entry.
    pub fn record_entry(&mut self, id: EntryId, line: LineFormat) {
        self.entries.insert(id, EntryFormat { lines: vec![line] });
    }

    /// Records an overwriting line: earlier lines are dropped but their trivia
    /// is carried in front of the new line.
    pub fn replace_entry(&mut self, id: EntryId, mut line: LineFormat) {
        let format = self.entries.entry(id).or_default();
        let mut leading: Vec<String> = format
            .lines
            .drain(..)
            .flat_map(|old| old.leading)
            .collect();
        leading.append(&mut line.leading);
        line.leading = leading;
        format.lines.push(line);
    }

    /// Records an additional value line of a multi-valued entry.
    pub fn append_entry(&mut self, id: EntryId, line: LineFormat) {
        self.entries.entry(id).or_default().lines.push(line);
    }

    pub fn forget_section(&mut self, id: SectionId) {
        self.sections.remove(&id);
        self.entries.retain(|entry, _| entry.section() != id);
    }

    pub fn forget_entry(&mut self, id: EntryId) {
        self.entries.remove(&id);
    }

    /// Forgets everything captured from the source text, BOM and final
    /// newline state included.
    pub fn clear(&mut self) {
        *self = Layout::default();
    }
}

/// `true` for trivia lines that contain nothing but whitespace.
pub(crate) fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(leading: &[&str], raw: &str, value: &str) -> LineFormat {
        LineFormat {
            leading: leading.iter().map(|s| s.to_string()).collect(),
            raw: raw.to_string(),
            value: value.to_string(),
            comment: None,
        }
    }

    #[test]
    fn test_replace_entry_keeps_all_trivia() {
        let id = EntryId::new(SectionId::GLOBAL, 0);
        let mut layout = Layout::default();
        layout.record_entry(id, line(&["; first"], "k=1", "1"));
        layout.replace_entry(id, line(&["", "; second"], "k=2", "2"));

        let format = layout.entry(id).expect("entry format");
        assert_eq!(format.lines.len(), 1);
        assert_eq!(format.lines[0].leading, vec!["; first", "", "; second"]);
        assert_eq!(format.lines[0].raw, "k=2");
    }

    #[test]
    fn test_forget_section_drops_its_entries() {
        let section = SectionId::new(3);
        let mut layout = Layout::default();
        layout.sections.insert(section, SectionFormat::default());
        layout.record_entry(EntryId::new(section, 0), line(&[], "a=1", "1"));
        layout.record_entry(EntryId::new(SectionId::GLOBAL, 0), line(&[], "b=1", "1"));

        layout.forget_section(section);
        assert!(layout.section(section).is_none());
        assert_eq!(layout.entries.len(), 1);
    }

    #[test]
    fn test_clear_restores_defaults() {
        let mut layout = Layout::default();
        layout.record_entry(EntryId::new(SectionId::GLOBAL, 0), line(&[], "a=1", "1"));
        layout.trailing.push("; end".to_string());
        layout.bom = true;
        layout.final_newline = false;

        layout.clear();
        assert_eq!(layout, Layout::default());
    }
}
