//! Text edits and the offset arithmetic that follows them.

use text_size::{TextRange, TextSize};

use super::Document;
use crate::base::Range;

/// One replaced text range, in the byte offsets of the text *before* the edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentChange {
    pub range_offset: TextSize,
    pub range_length: TextSize,
    pub text: String,
}

impl ContentChange {
    pub fn new(range_offset: u32, range_length: u32, text: impl Into<String>) -> Self {
        Self {
            range_offset: TextSize::from(range_offset),
            range_length: TextSize::from(range_length),
            text: text.into(),
        }
    }

    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(offset, 0, text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range.start().into(), range.len().into(), "")
    }

    /// Build a change from a line/character range of `document`.
    pub fn from_range(document: &Document, range: Range, text: impl Into<String>) -> Self {
        let start = document.offset_at(range.start);
        let end = document.offset_at(range.end).max(start);
        Self {
            range_offset: start,
            range_length: end - start,
            text: text.into(),
        }
    }

    /// The replaced range.
    pub fn range(&self) -> TextRange {
        TextRange::at(self.range_offset, self.range_length)
    }

    pub fn inserted_len(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    /// Where `offset` ends up once this change is applied.
    ///
    /// Offsets at or before the change start stay put, offsets after the
    /// replaced range move by the length delta, and offsets inside the replaced
    /// range clamp to the end of the inserted text.
    pub fn adjust_offset(&self, offset: TextSize) -> TextSize {
        if offset <= self.range_offset {
            return offset;
        }
        let end = self.range_offset + self.range_length;
        offset - (offset.min(end) - self.range_offset) + self.inserted_len()
    }

    pub fn adjust_range(&self, range: TextRange) -> TextRange {
        let start = self.adjust_offset(range.start());
        let end = self.adjust_offset(range.end()).max(start);
        TextRange::new(start, end)
    }
}

/// All content changes of one document, applied in order.
///
/// Each change is expressed against the text produced by the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentChange {
    pub uri: String,
    pub changes: Vec<ContentChange>,
}

impl DocumentChange {
    pub fn new(uri: impl Into<String>, changes: Vec<ContentChange>) -> Self {
        Self {
            uri: uri.into(),
            changes,
        }
    }
}

/// Sort ranges and union every run of touching or overlapping ones.
pub fn connect_ranges(mut ranges: Vec<TextRange>) -> Vec<TextRange> {
    ranges.sort_by_key(|r| (r.start(), r.end()));
    let mut merged: Vec<TextRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start() <= last.end() => {
                *last = last.cover(range);
            }
            _ => merged.push(range),
        }
    }
    merged
}
