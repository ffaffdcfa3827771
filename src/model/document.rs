// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{KeywordId, SpanId};
use super::span::{EditSpan, KeywordMarker};

/// The text plus every live suggestion anchored to it.
///
/// Documents are values: mutations in `crate::ops` take a `&Document` and return a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    #[serde(default)]
    pub spans: Vec<EditSpan>,
    #[serde(default)]
    pub keywords: Vec<KeywordMarker>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
            keywords: Vec::new(),
        }
    }

    pub fn with_spans(mut self, spans: Vec<EditSpan>) -> Self {
        self.spans = spans;
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<KeywordMarker>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn span(&self, span_id: &SpanId) -> Option<&EditSpan> {
        self.spans.iter().find(|span| &span.id == span_id)
    }

    pub fn keyword(&self, keyword_id: &KeywordId) -> Option<&KeywordMarker> {
        self.keywords.iter().find(|keyword| &keyword.id == keyword_id)
    }

    /// Spans, plus keyword markers, still awaiting a decision.
    pub fn pending_count(&self) -> usize {
        self.spans.len() + self.keywords.len()
    }

    /// Ids of spans whose `original` no longer matches the text at their offsets.
    pub fn invariant_violations(&self) -> Vec<&SpanId> {
        self.spans
            .iter()
            .filter(|span| !span.is_anchored_in(&self.text))
            .map(|span| &span.id)
            .collect()
    }
}
