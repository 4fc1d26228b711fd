//! Cursor-based scanning of `<tag>...</tag>` occurrences in a text buffer.
//!
//! This is deliberately not an XML parser. Markers are matched literally, the
//! scan never recurses, and an occurrence whose `</tag>` is missing runs to
//! the end of the buffer instead of failing.

use crate::data_model::TagSpan;
use crate::utils::text::normalize_text;

/// How an occurrence's body is returned by [`extract_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// The whole occurrence, markers and inner markup included, only trimmed.
    Raw,
    /// Inner content only, passed through [`normalize_text`].
    Normalized,
}

fn markers(tag: &str) -> (String, String) {
    (format!("<{}>", tag), format!("</{}>", tag))
}

fn find_from(data: &str, needle: &str, from: usize) -> Option<usize> {
    data.get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|pos| pos + from)
}

/// Walks the occurrences of one tag left to right, exactly once each.
///
/// Each search starts at the end of the previous span, so spans never overlap.
pub struct TagScanner<'a> {
    data: &'a str,
    start_marker: String,
    end_marker: String,
    inner_only: bool,
    cursor: usize,
    finished: bool,
}

impl<'a> TagScanner<'a> {
    /// Scans `data` for `<tag>`. With `inner_only` the spans exclude the markers.
    pub fn new(data: &'a str, tag: &str, inner_only: bool) -> Self {
        let (start_marker, end_marker) = markers(tag);
        TagScanner {
            data,
            start_marker,
            end_marker,
            inner_only,
            cursor: 0,
            finished: false,
        }
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = TagSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let Some(tag_start) = find_from(self.data, &self.start_marker, self.cursor) else {
            self.finished = true;
            return None;
        };

        let body_start = if self.inner_only {
            tag_start + self.start_marker.len()
        } else {
            tag_start
        };
        let end = match find_from(self.data, &self.end_marker, body_start) {
            Some(end_pos) if self.inner_only => end_pos,
            Some(end_pos) => end_pos + self.end_marker.len(),
            // Unterminated: the occurrence swallows the rest of the buffer.
            None => {
                self.finished = true;
                self.data.len()
            }
        };

        self.cursor = end;
        Some(TagSpan {
            start: body_start,
            end,
            body: &self.data[body_start..end],
        })
    }
}

/// Returns the trimmed, non-empty bodies of every `<tag>` occurrence in order.
pub fn extract_tag(data: &str, tag: &str, mode: ExtractMode) -> Vec<String> {
    let inner_only = mode == ExtractMode::Normalized;
    TagScanner::new(data, tag, inner_only)
        .map(|span| match mode {
            ExtractMode::Raw => span.body.trim().to_string(),
            ExtractMode::Normalized => normalize_text(span.body).trim().to_string(),
        })
        .filter(|body| !body.is_empty())
        .collect()
}

/// Removes every `<tag>` occurrence (content included) from `data`.
///
/// The text between occurrences and the trailing remainder are trimmed, empty
/// pieces are dropped and the rest joined with `\n`.
pub fn cut_tag(data: &str, tag: &str) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    let mut outside_start = 0;

    for span in TagScanner::new(data, tag, false) {
        pieces.push(&data[outside_start..span.start]);
        outside_start = span.end;
    }
    pieces.push(&data[outside_start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
