// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering of a document with its pending suggestions.
//!
//! [`segments`] splits the text into plain runs, highlighted suggestions, and an optional insertion
//! caret. [`annotate`] additionally maps every painted highlight to cell coordinates so hosts can
//! hit-test or re-style it without re-running the segmentation.
//!
//! Painting is sequential in display order. A span that starts inside a highlight that is already
//! open is swallowed by it: its characters are painted once, as part of the open highlight.

use std::collections::BTreeMap;

use crate::model::text::{char_len, char_slice};
use crate::model::{EditSpan, SpanId};
use crate::query::display_order;

pub mod ansi;
pub mod pointer;
mod text;

pub use ansi::{paint_ansi, AnsiOptions};
pub use pointer::{GridResolver, Point, PointerResolver};
pub use text::preview_line;

/// One painted piece of a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Highlight { span: &'a EditSpan, text: &'a str },
    /// Insertion point for a keyword being placed.
    Caret,
}

impl Segment<'_> {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Highlight { text, .. } => *text,
            Self::Caret => "",
        }
    }
}

/// Splits `text` into segments for painting.
///
/// `caret` is painted when it lies outside every painted highlight; at the start of a highlight it
/// comes first. A caret past the end of the text is ignored. Concatenating the segments' text
/// always reproduces `text`.
pub fn segments<'a>(
    text: &'a str,
    spans: &'a [EditSpan],
    caret: Option<usize>,
) -> Vec<Segment<'a>> {
    let len = char_len(text);
    let mut caret = caret.filter(|offset| *offset <= len);
    let mut out = Vec::new();
    let mut cursor = 0usize;

    for span in display_order(spans) {
        if span.start_index < cursor {
            continue;
        }
        let start = span.start_index.min(len);
        let end = span.end_index.min(len);
        if end <= start {
            continue;
        }

        if let Some(offset) = caret.filter(|offset| *offset <= start) {
            push_plain(&mut out, text, cursor, offset);
            out.push(Segment::Caret);
            cursor = offset;
            caret = None;
        }

        push_plain(&mut out, text, cursor, start);
        out.push(Segment::Highlight {
            span,
            text: char_slice(text, start, end),
        });
        cursor = end;

        if caret.is_some_and(|offset| offset > start && offset < end) {
            caret = None;
        }
    }

    if let Some(offset) = caret {
        push_plain(&mut out, text, cursor, offset);
        out.push(Segment::Caret);
        cursor = offset;
    }
    push_plain(&mut out, text, cursor, len);

    out
}

fn push_plain<'a>(out: &mut Vec<Segment<'a>>, text: &'a str, from: usize, to: usize) {
    if to > from {
        out.push(Segment::Plain(char_slice(text, from, to)));
    }
}

/// A contiguous run of highlighted cells within a single line.
///
/// Coordinates are `(y, x0, x1)` in character-cell indices, inclusive, relative to the lines of
/// the document text.
pub type LineSpan = (usize, usize, usize);

/// Cells covered by each painted highlight, keyed by span id.
pub type HighlightIndex = BTreeMap<SpanId, Vec<LineSpan>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRender<'a> {
    pub segments: Vec<Segment<'a>>,
    pub highlight_index: HighlightIndex,
}

/// Segments plus the cell coordinates of every painted highlight.
pub fn annotate<'a>(
    text: &'a str,
    spans: &'a [EditSpan],
    caret: Option<usize>,
) -> AnnotatedRender<'a> {
    let segments = segments(text, spans, caret);
    let mut highlight_index = HighlightIndex::new();

    let (mut y, mut x) = (0usize, 0usize);
    for segment in &segments {
        let mut run: Option<(usize, usize)> = None;
        let mut runs = Vec::new();
        for ch in segment.text().chars() {
            if ch == '\n' {
                if let Some((x0, x1)) = run.take() {
                    runs.push((y, x0, x1));
                }
                y += 1;
                x = 0;
                continue;
            }
            run = Some(match run {
                Some((x0, _)) => (x0, x),
                None => (x, x),
            });
            x += 1;
        }
        if let Some((x0, x1)) = run {
            runs.push((y, x0, x1));
        }

        if let Segment::Highlight { span, .. } = segment {
            if !runs.is_empty() {
                highlight_index.insert(span.id.clone(), runs);
            }
        }
    }

    AnnotatedRender {
        segments,
        highlight_index,
    }
}

#[cfg(test)]
mod tests;
