//! Offset-tracked spans of document text.

use regex::Regex;
use smol_str::SmolStr;
use text_size::TextRange;

use super::{ContentChange, Document, PrefixManager};
use crate::base::{FileId, Range};
use crate::parser::match_spans;

/// A byte range inside one tracked document.
///
/// Occurrences do not own text; line/character locations and the covered
/// text are derived from the document's current text on demand. Offsets are
/// shifted in place as edits arrive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Occurrence {
    pub file: FileId,
    pub range: TextRange,
}

/// A sub-match found inside an occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccurrenceMatch {
    pub whole: Occurrence,
    pub groups: Vec<(SmolStr, Occurrence)>,
}

impl OccurrenceMatch {
    pub fn group(&self, name: &str) -> Option<Occurrence> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, occ)| *occ)
    }
}

impl Occurrence {
    pub fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    /// The covered text of `source`, the current text of [`Self::file`].
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(usize::from(self.range.start())..usize::from(self.range.end()))
            .unwrap_or_default()
    }

    /// The covered text with its prefix resolved against the document's table.
    ///
    /// Text without a matching prefix is returned as is.
    pub fn prefix_resolved_text(&self, source: &str, prefixes: &PrefixManager) -> SmolStr {
        let text = self.text(source);
        prefixes
            .resolve(self.file, text)
            .unwrap_or_else(|| SmolStr::new(text))
    }

    pub fn location(&self, document: &Document) -> Range {
        document.range_of(self.range)
    }

    /// Run `regex` over this occurrence's scrubbed text.
    ///
    /// Every match, or only the first with `only_first`, becomes an
    /// occurrence in absolute document offsets, together with one occurrence
    /// per named group that took part.
    pub fn sub_occurrences(
        &self,
        source: &str,
        regex: &Regex,
        only_first: bool,
    ) -> Vec<OccurrenceMatch> {
        match_spans(source, self.range, regex, only_first)
            .into_iter()
            .map(|m| OccurrenceMatch {
                whole: Occurrence::new(self.file, m.range),
                groups: m
                    .groups()
                    .map(|(name, range)| (SmolStr::new(name), Occurrence::new(self.file, range)))
                    .collect(),
            })
            .collect()
    }

    /// Shift the offsets through `change` if it belongs to this document.
    pub fn adjust(&mut self, file: FileId, change: &ContentChange) {
        if self.file == file {
            self.range = change.adjust_range(self.range);
        }
    }

    /// Whether this occurrence touches `range` of `file`; shared endpoints count.
    pub fn intersects(&self, file: FileId, range: TextRange) -> bool {
        self.file == file && self.range.start() <= range.end() && range.start() <= self.range.end()
    }
}
