// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Anchors raw suggestions onto the current text.
//!
//! Offsets supplied by the model are hints only. A hint that verifies exactly is trusted as-is;
//! otherwise the snippet is searched for and the occurrence closest to the hint wins. Items that
//! cannot be anchored are dropped, never reported as errors.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::model::ids::unique_id;
use crate::model::text::{char_len, char_slice};
use crate::model::{Category, EditSpan, SpanId};

mod raw;
mod scan;

pub use raw::RawSuggestion;
pub(crate) use raw::{lenient_opt_string, lenient_string};
pub use scan::{find_occurrences, nearest_to_hint, Occurrences};

/// Why an item was left out of the aligned list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    EmptyOriginal,
    NotFound,
    EmptyAfterClip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedSuggestion {
    /// Position in the input batch.
    pub index: usize,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    /// Anchored spans in input order. Not sorted by offset.
    pub spans: Vec<EditSpan>,
    pub dropped: Vec<DroppedSuggestion>,
}

/// Anchors `raw` onto `text`, silently dropping items that cannot be placed.
pub fn align_suggestions(raw: &[RawSuggestion], text: &str) -> Vec<EditSpan> {
    align_suggestions_with_report(raw, text).spans
}

/// Same as [`align_suggestions`], but also reports which items were dropped and why.
pub fn align_suggestions_with_report(raw: &[RawSuggestion], text: &str) -> Alignment {
    let text_len = char_len(text);
    let mut alignment = Alignment::default();
    let mut used_ids = HashSet::<SpanId>::new();

    for (index, item) in raw.iter().enumerate() {
        match anchor(item, text, text_len) {
            Ok((start_index, end_index)) => {
                let id: SpanId = unique_id(item.id.as_deref(), "s", index, &used_ids);
                used_ids.insert(id.clone());
                alignment.spans.push(EditSpan {
                    id,
                    start_index,
                    end_index,
                    category: item
                        .category
                        .as_deref()
                        .map(Category::parse_lenient)
                        .unwrap_or_default(),
                    original: item.original.clone(),
                    replacement: item.replacement.clone(),
                    title: item.title.clone(),
                    description: item.description.clone(),
                });
            }
            Err(reason) => {
                debug!(index, ?reason, "dropping unanchorable suggestion");
                alignment.dropped.push(DroppedSuggestion { index, reason });
            }
        }
    }

    info!(
        accepted = alignment.spans.len(),
        dropped = alignment.dropped.len(),
        "aligned suggestions"
    );
    alignment
}

fn anchor(item: &RawSuggestion, text: &str, text_len: usize) -> Result<(usize, usize), DropReason> {
    let original = item.original.as_str();
    if original.is_empty() {
        return Err(DropReason::EmptyOriginal);
    }
    let original_len = char_len(original);

    let provided_start = item
        .start_index
        .filter(|start| *start >= 0)
        .and_then(|start| usize::try_from(start).ok());
    let provided_span = match (item.start_index, item.end_index) {
        (Some(start), Some(end)) if end > start => {
            end.checked_sub(start).and_then(|span| usize::try_from(span).ok())
        }
        _ => None,
    };

    let fast_path = provided_start.filter(|&start| {
        char_slice(text, start, start.saturating_add(original_len)) == original
    });

    let (start, span_len) = match fast_path {
        Some(start) => (start, provided_span.unwrap_or(original_len)),
        None => {
            let occurrences = find_occurrences(text, original);
            let start = match provided_start {
                None => occurrences.first().copied(),
                Some(hint) => nearest_to_hint(&occurrences, hint),
            };
            // A hinted length describes the hinted location, not a re-derived one.
            (start.ok_or(DropReason::NotFound)?, original_len)
        }
    };

    let start = start.min(text_len);
    let end = start.saturating_add(span_len).min(text_len);
    if end <= start {
        return Err(DropReason::EmptyAfterClip);
    }
    Ok((start, end))
}
