//! Comment and directive removal with offset recovery.
//!
//! Triple matching runs on a copy of the text with `#` comments and
//! prefix/base directives cut out. IRIs and string literals are copied
//! verbatim so a `#` inside them is never taken for a comment. Every cut is
//! recorded so offsets in the scrubbed copy can be mapped back to the source.

use text_size::{TextRange, TextSize};

use super::grammar::SCRUB_RE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovedKind {
    Comment,
    Directive,
}

/// A span cut out of the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemovedSpan {
    /// Offset in the scrubbed text where the span used to be.
    pub scrubbed_at: u32,
    /// Range of the span in the source text.
    pub source: TextRange,
    pub kind: RemovedKind,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrubbedText {
    text: String,
    removed: Vec<RemovedSpan>,
    /// `removed_before[i]` = total length of `removed[..i]`.
    removed_before: Vec<u32>,
}

impl ScrubbedText {
    pub fn new(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut removed = Vec::new();
        let mut last = 0;

        for caps in SCRUB_RE.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            text.push_str(&source[last..whole.start()]);
            if caps.name("keep").is_some() {
                text.push_str(whole.as_str());
            } else {
                let kind = if caps.name("comment").is_some() {
                    RemovedKind::Comment
                } else {
                    RemovedKind::Directive
                };
                removed.push(RemovedSpan {
                    scrubbed_at: text.len() as u32,
                    source: TextRange::new(
                        TextSize::from(whole.start() as u32),
                        TextSize::from(whole.end() as u32),
                    ),
                    kind,
                });
            }
            last = whole.end();
        }
        text.push_str(&source[last..]);

        let mut removed_before = Vec::with_capacity(removed.len() + 1);
        let mut total = 0u32;
        removed_before.push(0);
        for span in &removed {
            total += u32::from(span.source.len());
            removed_before.push(total);
        }

        Self {
            text,
            removed,
            removed_before,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn removed(&self) -> &[RemovedSpan] {
        &self.removed
    }

    /// Source offset of a match starting at `offset` in the scrubbed text.
    ///
    /// Spans cut exactly at `offset` lie before the match.
    pub fn to_source_start(&self, offset: usize) -> u32 {
        let offset = offset as u32;
        let idx = self.removed.partition_point(|r| r.scrubbed_at <= offset);
        offset + self.removed_before[idx]
    }

    /// Source offset of a match ending at `offset` in the scrubbed text.
    ///
    /// Spans cut exactly at `offset` lie after the match.
    pub fn to_source_end(&self, offset: usize) -> u32 {
        let offset = offset as u32;
        let idx = self.removed.partition_point(|r| r.scrubbed_at < offset);
        offset + self.removed_before[idx]
    }

    /// Source range of the scrubbed range `start..end`.
    pub fn to_source_range(&self, start: usize, end: usize) -> TextRange {
        let s = self.to_source_start(start);
        let e = if end == start {
            s
        } else {
            self.to_source_end(end).max(s)
        };
        TextRange::new(TextSize::from(s), TextSize::from(e))
    }
}
