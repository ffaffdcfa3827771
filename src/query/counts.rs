// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Category, Document};

/// Pending suggestions per category, plus keyword markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub correctness: usize,
    pub clarity: usize,
    pub engagement: usize,
    pub delivery: usize,
    /// Free-form tags outside the known set, keyed by their raw name.
    pub other: BTreeMap<String, usize>,
    pub keywords: usize,
}

impl CategoryCounts {
    /// Spans plus keyword markers.
    pub fn total(&self) -> usize {
        self.correctness
            + self.clarity
            + self.engagement
            + self.delivery
            + self.other.values().sum::<usize>()
            + self.keywords
    }

    pub fn for_category(&self, category: &Category) -> usize {
        match category {
            Category::Correctness => self.correctness,
            Category::Clarity => self.clarity,
            Category::Engagement => self.engagement,
            Category::Delivery => self.delivery,
            Category::Other(name) => self.other.get(name.as_str()).copied().unwrap_or(0),
        }
    }
}

pub fn category_counts(document: &Document) -> CategoryCounts {
    let mut counts = CategoryCounts {
        keywords: document.keywords.len(),
        ..CategoryCounts::default()
    };
    for span in &document.spans {
        match &span.category {
            Category::Correctness => counts.correctness += 1,
            Category::Clarity => counts.clarity += 1,
            Category::Engagement => counts.engagement += 1,
            Category::Delivery => counts.delivery += 1,
            Category::Other(name) => *counts.other.entry(name.to_string()).or_default() += 1,
        }
    }
    counts
}

pub(crate) fn whitespace_run() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

/// Whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    whitespace_run()
        .split(text.trim())
        .filter(|word| !word.is_empty())
        .count()
}
