// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use regex::RegexBuilder;

use crate::model::{EditSpan, SpanId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanSearchMode {
    Substring,
    Regex,
}

/// Spans ordered for painting: by start offset, list order kept among equal starts.
pub fn display_order(spans: &[EditSpan]) -> Vec<&EditSpan> {
    let mut ordered = spans.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|span| span.start_index);
    ordered
}

/// Pairs of spans whose ranges intersect, in display order.
///
/// Touching spans (`a.end == b.start`) are adjacent, not overlapping.
pub fn overlapping_pairs(spans: &[EditSpan]) -> Vec<(&SpanId, &SpanId)> {
    let ordered = display_order(spans);
    let mut pairs = Vec::new();
    for (index, left) in ordered.iter().enumerate() {
        for right in &ordered[index + 1..] {
            if right.start_index >= left.end_index {
                break;
            }
            pairs.push((&left.id, &right.id));
        }
    }
    pairs
}

/// Pairs of spans where one ends exactly where the next starts.
pub fn adjacent_pairs(spans: &[EditSpan]) -> Vec<(&SpanId, &SpanId)> {
    let ordered = display_order(spans);
    let mut pairs = Vec::new();
    for left in &ordered {
        for right in &ordered {
            if left.end_index == right.start_index && left.id != right.id {
                pairs.push((&left.id, &right.id));
            }
        }
    }
    pairs
}

/// The first span in display order covering `offset`.
pub fn span_at_offset(spans: &[EditSpan], offset: usize) -> Option<&EditSpan> {
    display_order(spans)
        .into_iter()
        .find(|span| span.contains(offset))
}

pub fn span_search<'a>(
    spans: &'a [EditSpan],
    needle: &str,
    mode: SpanSearchMode,
    case_insensitive: bool,
) -> Result<Vec<&'a EditSpan>, regex::Error> {
    let fields = |span: &'a EditSpan| {
        [
            Some(span.original.as_str()),
            Some(span.replacement.as_str()),
            span.title.as_deref(),
            span.description.as_deref(),
        ]
        .into_iter()
        .flatten()
    };

    match mode {
        SpanSearchMode::Substring => {
            if case_insensitive {
                let needle_lower = needle.to_lowercase();
                Ok(display_order(spans)
                    .into_iter()
                    .filter(|span| fields(*span).any(|f| f.to_lowercase().contains(&needle_lower)))
                    .collect())
            } else {
                Ok(display_order(spans)
                    .into_iter()
                    .filter(|span| fields(*span).any(|f| f.contains(needle)))
                    .collect())
            }
        }
        SpanSearchMode::Regex => {
            let regex = RegexBuilder::new(needle)
                .case_insensitive(case_insensitive)
                .build()?;
            Ok(display_order(spans)
                .into_iter()
                .filter(|span| fields(*span).any(|f| regex.is_match(f)))
                .collect())
        }
    }
}
