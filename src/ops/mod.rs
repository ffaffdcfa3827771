// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations over a [`Document`].
//!
//! Every operation is pure: it reads a document and returns a new one, rebasing the surviving
//! spans by the length delta the edit introduced. Requests that no longer make sense (unknown id,
//! insertion point outside the text) are no-ops rather than errors, since the caller's view of
//! valid ids may be stale by the time the request arrives.
//!
//! Rebase boundaries differ on purpose and must stay that way:
//! - accepting a replacement shifts spans with `start > accepted.start`;
//! - inserting a keyword at `i` shifts spans with `start >= i`.
//!
//! Spans are never re-sorted or merged afterwards, so callers must not rely on spans that overlap
//! a mutated region keeping meaningful offsets.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::model::text::{char_at, char_len, splice};
use crate::model::{Document, KeywordId, SpanId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    AcceptEdit {
        span_id: SpanId,
    },
    DismissEdit {
        span_id: SpanId,
    },
    InsertKeyword {
        keyword_id: KeywordId,
        insertion_index: usize,
    },
    DismissKeyword {
        keyword_id: KeywordId,
    },
}

/// Result of a single operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub document: Document,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied(Edit),
    Noop(NoopReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// What an applied operation did to the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edit {
    /// Change in text length, in characters.
    pub text_delta: isize,
    pub removed_span: Option<SpanId>,
    pub consumed_keyword: Option<KeywordId>,
    /// Spans whose offsets moved, in list order.
    pub shifted: Vec<SpanId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoopReason {
    UnknownSpan { span_id: SpanId },
    UnknownKeyword { keyword_id: KeywordId },
    IndexOutOfBounds { index: usize, text_len: usize },
}

impl fmt::Display for NoopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSpan { span_id } => write!(f, "span not found (id={span_id})"),
            Self::UnknownKeyword { keyword_id } => {
                write!(f, "keyword not found (id={keyword_id})")
            }
            Self::IndexOutOfBounds { index, text_len } => {
                write!(f, "insertion index {index} is outside the text (len={text_len})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub document: Document,
    pub applied: usize,
    pub delta: Delta,
    /// Skipped ops, by position in the batch.
    pub noops: Vec<(usize, NoopReason)>,
}

/// Net effect of a batch of ops.
///
/// Spans removed later in the batch do not also appear as shifted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub removed_spans: Vec<SpanId>,
    pub consumed_keywords: Vec<KeywordId>,
    pub shifted_spans: Vec<SpanId>,
    pub text_delta: isize,
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    removed_spans: BTreeSet<SpanId>,
    consumed_keywords: BTreeSet<KeywordId>,
    shifted_spans: BTreeSet<SpanId>,
    text_delta: isize,
}

impl DeltaBuilder {
    fn record(&mut self, edit: &Edit) {
        self.text_delta += edit.text_delta;
        for span_id in &edit.shifted {
            if !self.removed_spans.contains(span_id) {
                self.shifted_spans.insert(span_id.clone());
            }
        }
        if let Some(span_id) = &edit.removed_span {
            self.shifted_spans.remove(span_id);
            self.removed_spans.insert(span_id.clone());
        }
        if let Some(keyword_id) = &edit.consumed_keyword {
            self.consumed_keywords.insert(keyword_id.clone());
        }
    }

    fn finish(self) -> Delta {
        Delta {
            removed_spans: self.removed_spans.into_iter().collect(),
            consumed_keywords: self.consumed_keywords.into_iter().collect(),
            shifted_spans: self.shifted_spans.into_iter().collect(),
            text_delta: self.text_delta,
        }
    }
}

/// Applies `op` to `document`.
pub fn apply_op(document: &Document, op: &Op) -> Mutation {
    match op {
        Op::AcceptEdit { span_id } => accept_edit(document, span_id),
        Op::DismissEdit { span_id } => dismiss_edit(document, span_id),
        Op::InsertKeyword {
            keyword_id,
            insertion_index,
        } => insert_keyword(document, keyword_id, *insertion_index),
        Op::DismissKeyword { keyword_id } => dismiss_keyword(document, keyword_id),
    }
}

/// Applies `ops` in order, each against the result of the previous one.
pub fn apply_ops(document: &Document, ops: &[Op]) -> ApplyResult {
    let mut current = document.clone();
    let mut delta = DeltaBuilder::default();
    let mut applied = 0usize;
    let mut noops = Vec::new();

    for (index, op) in ops.iter().enumerate() {
        let Mutation { document, outcome } = apply_op(&current, op);
        match outcome {
            Outcome::Applied(edit) => {
                delta.record(&edit);
                applied += 1;
                current = document;
            }
            Outcome::Noop(reason) => noops.push((index, reason)),
        }
    }

    ApplyResult {
        document: current,
        applied,
        delta: delta.finish(),
        noops,
    }
}

// Operation bodies live next door to keep this file about types and orchestration.
include!("ops_impl.rs");
