// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::time::Duration;

use criterion::Criterion;

use marginalia::align::{align_suggestions, RawSuggestion};
use marginalia::model::{Document, EditSpan, KeywordId, KeywordMarker};

const SENTENCES: [&str; 6] = [
    "Dear professor, i wanted to ask about the the deadline for our essay.",
    "Their is a small chance that the libary will be closed on friday.",
    "We has prepared the slides, but the demo still need some work.",
    "Could you please let me know weather an extension is possible?",
    "The results was surprising and we would like to discus them further.",
    "Thank you for you're time and for the helpful feedback last week.",
];

// Each pair occurs in exactly one sentence of `SENTENCES`.
const EDITS: [(&str, &str, &str); 8] = [
    ("the the", "the", "correctness"),
    ("Their is", "There is", "correctness"),
    ("libary", "library", "correctness"),
    ("We has", "We have", "correctness"),
    ("need some work", "needs some work", "clarity"),
    ("weather", "whether", "correctness"),
    ("discus", "discuss", "engagement"),
    ("you're time", "your time", "delivery"),
];

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

pub fn criterion() -> Criterion {
    let sample_size = env_usize("BENCH_SAMPLE_SIZE", 60).clamp(10, 200);
    let warmup_secs = env_u64("BENCH_WARMUP_SECS", 3).clamp(1, 60);
    let measurement_secs = env_u64("BENCH_MEASUREMENT_SECS", 5).clamp(1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup_secs))
        .measurement_time(Duration::from_secs(measurement_secs))
}

/// `paragraphs` copies of the sample letter, one blank line apart.
pub fn letter(paragraphs: usize) -> String {
    let paragraph = SENTENCES.join(" ");
    let mut out = String::with_capacity((paragraph.len() + 2) * paragraphs);
    for idx in 0..paragraphs {
        if idx > 0 {
            out.push_str("\n\n");
        }
        out.push_str(&paragraph);
    }
    out
}

/// One raw suggestion per known edit per paragraph.
///
/// With `accurate_hints` every hint is exact and alignment takes the fast path; otherwise hints
/// are a fixed distance off and each suggestion needs a scan.
pub fn raw_suggestions(text: &str, accurate_hints: bool) -> Vec<RawSuggestion> {
    let mut out = Vec::new();
    for (original, replacement, category) in EDITS {
        for (byte_start, _) in text.match_indices(original) {
            let start = text[..byte_start].chars().count() as i64;
            let len = original.chars().count() as i64;
            let hint = if accurate_hints { start } else { start + 17 };
            out.push(
                RawSuggestion::new(original, replacement)
                    .with_category(category)
                    .with_hint(hint, hint + len),
            );
        }
    }
    out
}

pub fn aligned_document(paragraphs: usize) -> Document {
    let text = letter(paragraphs);
    let spans = align_suggestions(&raw_suggestions(&text, true), &text);
    Document::new(text)
        .with_spans(spans)
        .with_keywords(keywords(paragraphs))
}

pub fn keywords(count: usize) -> Vec<KeywordMarker> {
    (0..count)
        .map(|idx| KeywordMarker {
            id: KeywordId::new(format!("kw-{idx}")).expect("keyword id"),
            keyword: format!("keyword{idx}").into(),
            description: String::new(),
        })
        .collect()
}

pub fn checksum_spans(spans: &[EditSpan]) -> u64 {
    let mut acc = 0u64;
    for span in spans {
        acc = acc.wrapping_mul(131).wrapping_add(span.start_index as u64);
        acc = acc.wrapping_mul(131).wrapping_add(span.end_index as u64);
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(span.id.as_str().len() as u64);
    }
    acc
}
