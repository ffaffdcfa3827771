// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use crate::model::text::char_slice;
use crate::model::{Category, EditSpan, SpanId};

use super::{annotate, segments, Segment};

fn span(id: &str, start: usize, end: usize) -> EditSpan {
    EditSpan {
        id: SpanId::new(id).expect("span id"),
        start_index: start,
        end_index: end,
        category: Category::Clarity,
        original: String::new(),
        replacement: String::new(),
        title: None,
        description: None,
    }
}

/// Compact view: plain text as-is, highlights as `<id:text>`, caret as `|`.
fn sketch(segments: &[Segment<'_>]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain(text) => (*text).to_owned(),
            Segment::Highlight { span, text } => format!("<{}:{text}>", span.id),
            Segment::Caret => "|".to_owned(),
        })
        .collect()
}

fn collect_spanned_text(text: &str, spans: &[(usize, usize, usize)]) -> String {
    let lines = text.split('\n').collect::<Vec<_>>();
    let mut out = String::new();
    for &(y, x0, x1) in spans {
        let line = lines.get(y).expect("y in bounds");
        out.extend(line.chars().skip(x0).take(x1 - x0 + 1));
        out.push('\n');
    }
    out
}

#[test]
fn text_without_spans_is_one_plain_segment() {
    assert_eq!(segments("plain", &[], None), vec![Segment::Plain("plain")]);
    assert!(segments("", &[], None).is_empty());
}

#[test]
fn highlights_are_painted_in_offset_order() {
    let text = "The the cat sat.";
    let spans = [span("end", 12, 16), span("dup", 0, 7)];
    assert_eq!(
        sketch(&segments(text, &spans, None)),
        "<dup:The the> cat <end:sat.>"
    );
}

#[rstest]
#[case::nested(vec![span("a", 0, 10), span("b", 3, 5)], "<a:abcdefghij>")]
#[case::partial(vec![span("a", 0, 5), span("b", 3, 8)], "<a:abcde>fghij")]
#[case::adjacent(vec![span("a", 0, 3), span("b", 3, 5)], "<a:abc><b:de>fghij")]
#[case::same_start(vec![span("a", 2, 4), span("b", 2, 9)], "ab<a:cd>efghij")]
#[case::clipped(vec![span("a", 8, 40)], "abcdefgh<a:ij>")]
#[case::past_end(vec![span("a", 12, 14)], "abcdefghij")]
fn spans_starting_inside_an_open_highlight_are_swallowed(
    #[case] spans: Vec<EditSpan>,
    #[case] expected: &str,
) {
    assert_eq!(sketch(&segments("abcdefghij", &spans, None)), expected);
}

#[rstest]
#[case(0, "|see <s:the> cat")]
#[case(4, "see |<s:the> cat")]
#[case(5, "see <s:the> cat")]
#[case(7, "see <s:the>| cat")]
#[case(9, "see <s:the> c|at")]
#[case(11, "see <s:the> cat|")]
#[case(12, "see <s:the> cat")]
fn caret_is_painted_only_outside_highlights(#[case] caret: usize, #[case] expected: &str) {
    let spans = [span("s", 4, 7)];
    assert_eq!(
        sketch(&segments("see the cat", &spans, Some(caret))),
        expected
    );
}

#[test]
fn caret_inside_a_swallowed_span_stays_hidden() {
    let spans = [span("a", 0, 6), span("b", 4, 9)];
    assert_eq!(
        sketch(&segments("abcdefghij", &spans, Some(5))),
        "<a:abcdef>ghij"
    );
}

#[test]
fn segments_always_reproduce_the_text() {
    let text = "Grüße aus Köln,\nGrüße!";
    let spans = [span("a", 0, 5), span("b", 3, 12), span("c", 16, 21), span("d", 30, 31)];
    for caret in [None, Some(0), Some(14), Some(22)] {
        let joined: String = segments(text, &spans, caret)
            .iter()
            .map(Segment::text)
            .collect();
        assert_eq!(joined, text);
    }
}

#[test]
fn highlight_text_is_sliced_by_characters() {
    let text = "naïve café";
    let spans = [span("c", 6, 10)];
    let painted = segments(text, &spans, None);
    assert_eq!(painted[1].text(), char_slice(text, 6, 10));
    assert_eq!(painted[1].text(), "café");
}

#[test]
fn annotate_indexes_highlight_cells_per_line() {
    let text = "ab\ncd ef\ng";
    let spans = [span("wrap", 1, 5), span("tail", 6, 8), span("nl", 2, 3)];

    let annotated = annotate(text, &spans, None);

    let wrap = &annotated.highlight_index[&SpanId::new("wrap").expect("span id")];
    assert_eq!(wrap, &vec![(0, 1, 1), (1, 0, 1)]);
    assert_eq!(collect_spanned_text(text, wrap), "b\ncd\n");

    let tail = &annotated.highlight_index[&SpanId::new("tail").expect("span id")];
    assert_eq!(tail, &vec![(1, 3, 4)]);
    assert_eq!(collect_spanned_text(text, tail), "ef\n");

    // Swallowed by "wrap", so never painted.
    assert!(!annotated
        .highlight_index
        .contains_key(&SpanId::new("nl").expect("span id")));
}

#[test]
fn annotate_skips_highlights_that_cover_only_a_newline() {
    let text = "ab\ncd";
    let spans = [span("nl", 2, 3)];
    let annotated = annotate(text, &spans, Some(0));
    assert!(annotated.highlight_index.is_empty());
    assert_eq!(annotated.segments.first(), Some(&Segment::Caret));
}
