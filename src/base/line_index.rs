//! Offset ↔ line/character conversion.

use text_size::TextSize;

use super::Position;

/// Maps byte offsets of a text to 0-indexed line/character positions.
///
/// Characters are counted in UTF-16 code units, which is what editors
/// speaking LSP expect. Offsets that fall inside a multi-byte character are
/// rounded down to the character boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn len(&self) -> TextSize {
        TextSize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Line/character position of `offset` within `text`.
    ///
    /// `text` must be the text this index was built from.
    pub fn position(&self, text: &str, offset: TextSize) -> Position {
        let offset = u32::from(offset).min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line] as usize;
        let mut end = offset as usize;
        while end > line_start && !text.is_char_boundary(end) {
            end -= 1;
        }
        let character = text[line_start..end].encode_utf16().count() as u32;
        Position::new(line as u32, character)
    }

    /// Byte offset of a line/character position within `text`.
    ///
    /// Positions past the end of a line clamp to the line end, positions past
    /// the last line clamp to the end of the text.
    pub fn offset(&self, text: &str, position: Position) -> TextSize {
        let Some(&line_start) = self.line_starts.get(position.line as usize) else {
            return TextSize::from(self.len);
        };
        let line_end = self
            .line_starts
            .get(position.line as usize + 1)
            .map(|next| next - 1)
            .unwrap_or(self.len);
        let line = &text[line_start as usize..line_end as usize];

        let mut units = 0u32;
        for (idx, ch) in line.char_indices() {
            if units >= position.character {
                return TextSize::from(line_start + idx as u32);
            }
            units += ch.len_utf16() as u32;
        }
        TextSize::from(line_end)
    }
}
