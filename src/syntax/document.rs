//! Tracked documents and the store that hands out their ids.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use text_size::{TextRange, TextSize};

use super::ContentChange;
use crate::base::{FileId, LineIndex, Position, Range};

/// The current text of one document.
#[derive(Clone, Debug)]
pub struct Document {
    uri: Arc<str>,
    text: String,
    line_index: LineIndex,
}

impl Document {
    pub fn new(uri: impl Into<Arc<str>>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self {
            uri: uri.into(),
            text,
            line_index,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_index.line_count()
    }

    pub fn offset_at(&self, position: Position) -> TextSize {
        self.line_index.offset(&self.text, position)
    }

    pub fn position_at(&self, offset: TextSize) -> Position {
        self.line_index.position(&self.text, offset)
    }

    pub fn range_of(&self, range: TextRange) -> Range {
        Range::new(self.position_at(range.start()), self.position_at(range.end()))
    }

    /// Text inside `range`, clamped to the document.
    pub fn text_in(&self, range: TextRange) -> &str {
        let start = floor_char_boundary(&self.text, range.start().into());
        let end = floor_char_boundary(&self.text, range.end().into()).max(start);
        &self.text[start..end]
    }

    /// Apply one change to the text.
    ///
    /// Offsets past the end of the text or inside a multi-byte character are
    /// clamped.
    pub fn apply_change(&mut self, change: &ContentChange) {
        let start = floor_char_boundary(&self.text, change.range_offset.into());
        let end = floor_char_boundary(&self.text, change.range().end().into()).max(start);
        self.text.replace_range(start..end, &change.text);
        self.line_index = LineIndex::new(&self.text);
    }

    fn replace(&mut self, text: String) {
        self.line_index = LineIndex::new(&text);
        self.text = text;
    }
}

fn floor_char_boundary(text: &str, offset: u32) -> usize {
    let mut offset = (offset as usize).min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Every document the engine has seen, addressed by [`FileId`].
///
/// Documents are loaded once and cached; ids are never reused.
#[derive(Clone, Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    by_uri: FxHashMap<Arc<str>, FileId>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a document. Opening a known URI returns its id and keeps the
    /// cached text.
    pub fn open(&mut self, uri: &str, text: impl Into<String>) -> FileId {
        if let Some(&file) = self.by_uri.get(uri) {
            return file;
        }
        let file = FileId::new(self.documents.len() as u32);
        let uri: Arc<str> = Arc::from(uri);
        self.documents.push(Document::new(uri.clone(), text));
        self.by_uri.insert(uri, file);
        file
    }

    /// Replace the cached text of a known document.
    pub fn refresh(&mut self, uri: &str, text: impl Into<String>) -> Option<FileId> {
        let file = self.file_id(uri)?;
        self.documents[file.index()].replace(text.into());
        Some(file)
    }

    pub fn apply_change(&mut self, file: FileId, change: &ContentChange) {
        if let Some(document) = self.documents.get_mut(file.index()) {
            document.apply_change(change);
        }
    }

    pub fn file_id(&self, uri: &str) -> Option<FileId> {
        self.by_uri.get(uri).copied()
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.by_uri.contains_key(uri)
    }

    pub fn get(&self, file: FileId) -> Option<&Document> {
        self.documents.get(file.index())
    }

    pub fn text(&self, file: FileId) -> &str {
        self.get(file).map(Document::text).unwrap_or_default()
    }

    pub fn uri(&self, file: FileId) -> Option<&str> {
        self.get(file).map(Document::uri)
    }

    pub fn files(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.documents.len() as u32).map(FileId::new)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
