// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Operation bodies used by `apply_op`.
// Each returns the input document unchanged, with a `Noop` outcome, when the request is stale.
fn noop(document: &Document, reason: NoopReason) -> Mutation {
    debug!(%reason, "ignoring stale mutation request");
    Mutation {
        document: document.clone(),
        outcome: Outcome::Noop(reason),
    }
}

/// Replaces the span's range with its replacement and drops the span.
///
/// Spans starting strictly after the accepted span's start move by the length delta; spans at
/// or before it keep their offsets.
pub fn accept_edit(document: &Document, span_id: &SpanId) -> Mutation {
    let Some(accepted) = document.span(span_id) else {
        return noop(
            document,
            NoopReason::UnknownSpan {
                span_id: span_id.clone(),
            },
        );
    };

    let text = splice(
        &document.text,
        accepted.start_index,
        accepted.end_index,
        &accepted.replacement,
    );
    let text_delta = char_len(&accepted.replacement) as isize - accepted.len() as isize;

    let mut shifted = Vec::new();
    let spans = document
        .spans
        .iter()
        .filter(|span| &span.id != span_id)
        .map(|span| {
            let mut span = span.clone();
            if span.start_index > accepted.start_index && text_delta != 0 {
                span.shift(text_delta);
                shifted.push(span.id.clone());
            }
            span
        })
        .collect();

    Mutation {
        document: Document {
            text,
            spans,
            keywords: document.keywords.clone(),
        },
        outcome: Outcome::Applied(Edit {
            text_delta,
            removed_span: Some(span_id.clone()),
            consumed_keyword: None,
            shifted,
        }),
    }
}

/// Drops the span. Text and other offsets are untouched.
pub fn dismiss_edit(document: &Document, span_id: &SpanId) -> Mutation {
    if document.span(span_id).is_none() {
        return noop(
            document,
            NoopReason::UnknownSpan {
                span_id: span_id.clone(),
            },
        );
    }

    let mut next = document.clone();
    next.spans.retain(|span| &span.id != span_id);
    Mutation {
        document: next,
        outcome: Outcome::Applied(Edit {
            removed_span: Some(span_id.clone()),
            ..Edit::default()
        }),
    }
}

/// `keyword` as it would be inserted at `insertion_index`.
///
/// A space is added on each side whose neighbouring character exists and is neither a space nor
/// a newline, so the keyword never fuses with adjacent words.
pub fn padded_keyword(text: &str, insertion_index: usize, keyword: &str) -> String {
    let needs_pad = |ch: Option<char>| ch.is_some_and(|ch| ch != ' ' && ch != '\n');
    let before = insertion_index
        .checked_sub(1)
        .and_then(|index| char_at(text, index));
    let after = char_at(text, insertion_index);

    let mut padded = String::with_capacity(keyword.len() + 2);
    if needs_pad(before) {
        padded.push(' ');
    }
    padded.push_str(keyword);
    if needs_pad(after) {
        padded.push(' ');
    }
    padded
}

/// Inserts the keyword marker's text at `insertion_index` and consumes the marker.
///
/// Spans starting at or after the insertion point move right by the inserted length.
pub fn insert_keyword(
    document: &Document,
    keyword_id: &KeywordId,
    insertion_index: usize,
) -> Mutation {
    let Some(marker) = document.keyword(keyword_id) else {
        return noop(
            document,
            NoopReason::UnknownKeyword {
                keyword_id: keyword_id.clone(),
            },
        );
    };

    let text_len = char_len(&document.text);
    if insertion_index > text_len {
        return noop(
            document,
            NoopReason::IndexOutOfBounds {
                index: insertion_index,
                text_len,
            },
        );
    }

    let inserted = padded_keyword(&document.text, insertion_index, &marker.keyword);
    let text_delta = char_len(&inserted) as isize;
    let text = splice(&document.text, insertion_index, insertion_index, &inserted);

    let mut shifted = Vec::new();
    let spans = document
        .spans
        .iter()
        .map(|span| {
            let mut span = span.clone();
            if span.start_index >= insertion_index && text_delta != 0 {
                span.shift(text_delta);
                shifted.push(span.id.clone());
            }
            span
        })
        .collect();

    let keywords = document
        .keywords
        .iter()
        .filter(|keyword| &keyword.id != keyword_id)
        .cloned()
        .collect();

    Mutation {
        document: Document {
            text,
            spans,
            keywords,
        },
        outcome: Outcome::Applied(Edit {
            text_delta,
            removed_span: None,
            consumed_keyword: Some(keyword_id.clone()),
            shifted,
        }),
    }
}

/// Drops the keyword marker without inserting it.
pub fn dismiss_keyword(document: &Document, keyword_id: &KeywordId) -> Mutation {
    if document.keyword(keyword_id).is_none() {
        return noop(
            document,
            NoopReason::UnknownKeyword {
                keyword_id: keyword_id.clone(),
            },
        );
    }

    let mut next = document.clone();
    next.keywords.retain(|keyword| &keyword.id != keyword_id);
    Mutation {
        document: next,
        outcome: Outcome::Applied(Edit {
            consumed_keyword: Some(keyword_id.clone()),
            ..Edit::default()
        }),
    }
}
