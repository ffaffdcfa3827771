// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Review state shared by whatever host drives the engine.
//!
//! Tracks the analysis phase, which suggestion is hovered or selected, and a keyword being
//! placed. `rev` increases on every observable change so hosts can skip redundant redraws.

use crate::model::{Document, KeywordId, SessionId, SpanId};
use crate::ops::{Edit, Outcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Analyzing,
    Analyzed,
    Error(String),
}

impl AnalysisPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Analyzing)
    }
}

/// A keyword marker being dragged over the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub keyword_id: KeywordId,
    /// Resolved insertion point under the pointer, if any.
    pub caret: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    rev: u64,
    phase: AnalysisPhase,
    active_session_id: Option<SessionId>,
    hovered: Option<SpanId>,
    selected: Option<SpanId>,
    placement: Option<Placement>,
}

impl UiState {
    pub fn rev(&self) -> u64 {
        self.rev
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }

    pub fn phase(&self) -> &AnalysisPhase {
        &self.phase
    }

    pub fn active_session_id(&self) -> Option<&SessionId> {
        self.active_session_id.as_ref()
    }

    pub fn hovered(&self) -> Option<&SpanId> {
        self.hovered.as_ref()
    }

    pub fn selected(&self) -> Option<&SpanId> {
        self.selected.as_ref()
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Hovered or selected spans are painted as active.
    pub fn is_active(&self, span_id: &SpanId) -> bool {
        self.hovered.as_ref() == Some(span_id) || self.selected.as_ref() == Some(span_id)
    }

    /// The span to emphasise: the hovered one, else the selected one.
    pub fn active_span(&self) -> Option<&SpanId> {
        self.hovered.as_ref().or(self.selected.as_ref())
    }

    pub fn begin_analysis(&mut self) {
        self.phase = AnalysisPhase::Analyzing;
        self.bump();
    }

    /// A fresh analysis replaces every span, so any hover or selection is gone.
    pub fn finish_analysis(&mut self, session_id: SessionId) {
        self.phase = AnalysisPhase::Analyzed;
        self.active_session_id = Some(session_id);
        self.hovered = None;
        self.selected = None;
        self.bump();
    }

    pub fn fail_analysis(&mut self, message: impl Into<String>) {
        self.phase = AnalysisPhase::Error(message.into());
        self.bump();
    }

    /// Back to idle, e.g. after the text was edited by hand or an analysis was cancelled.
    pub fn reset(&mut self) {
        let was_default = self.phase == AnalysisPhase::Idle
            && self.active_session_id.is_none()
            && self.hovered.is_none()
            && self.selected.is_none()
            && self.placement.is_none();
        if was_default {
            return;
        }
        self.phase = AnalysisPhase::Idle;
        self.active_session_id = None;
        self.hovered = None;
        self.selected = None;
        self.placement = None;
        self.bump();
    }

    /// Opens a saved session for review.
    pub fn open_session(&mut self, session_id: SessionId) {
        self.phase = AnalysisPhase::Analyzed;
        self.active_session_id = Some(session_id);
        self.hovered = None;
        self.selected = None;
        self.placement = None;
        self.bump();
    }

    pub fn set_hovered(&mut self, span_id: Option<SpanId>) {
        if self.hovered == span_id {
            return;
        }
        self.hovered = span_id;
        self.bump();
    }

    pub fn set_selected(&mut self, span_id: Option<SpanId>) {
        if self.selected == span_id {
            return;
        }
        self.selected = span_id;
        self.bump();
    }

    /// Drops hover and selection that point at spans no longer in `document`.
    pub fn sync_with(&mut self, document: &Document) {
        let stale = |id: &Option<SpanId>| id.as_ref().is_some_and(|id| document.span(id).is_none());
        let mut changed = false;
        if stale(&self.hovered) {
            self.hovered = None;
            changed = true;
        }
        if stale(&self.selected) {
            self.selected = None;
            changed = true;
        }
        if let Some(placement) = &self.placement {
            if document.keyword(&placement.keyword_id).is_none() {
                self.placement = None;
                changed = true;
            }
        }
        if changed {
            self.bump();
        }
    }

    /// Applies the UI side of a mutation outcome: the removed span loses hover and selection.
    pub fn observe(&mut self, outcome: &Outcome) {
        let Outcome::Applied(Edit { removed_span, .. }) = outcome else {
            return;
        };
        let Some(removed) = removed_span else {
            return;
        };
        let mut changed = false;
        if self.hovered.as_ref() == Some(removed) {
            self.hovered = None;
            changed = true;
        }
        if self.selected.as_ref() == Some(removed) {
            self.selected = None;
            changed = true;
        }
        if changed {
            self.bump();
        }
    }

    pub fn start_placing(&mut self, keyword_id: KeywordId) {
        self.placement = Some(Placement {
            keyword_id,
            caret: None,
        });
        self.bump();
    }

    pub fn move_caret(&mut self, caret: Option<usize>) {
        let Some(placement) = self.placement.as_mut() else {
            return;
        };
        if placement.caret == caret {
            return;
        }
        placement.caret = caret;
        self.bump();
    }

    /// Ends the drag. Yields the keyword and insertion point when the drop landed on the text.
    pub fn finish_placing(&mut self) -> Option<(KeywordId, usize)> {
        let placement = self.placement.take()?;
        self.bump();
        let caret = placement.caret?;
        Some((placement.keyword_id, caret))
    }

    /// Caret to paint while a keyword is being placed.
    pub fn caret(&self) -> Option<usize> {
        self.placement.as_ref().and_then(|placement| placement.caret)
    }

    pub fn score_label(&self, score: Option<u8>) -> String {
        if self.phase.is_busy() {
            return "Analyzing…".to_owned();
        }
        score_text(score)
    }
}

/// Scores at or above this read as good.
pub const GOOD_SCORE: u8 = 80;

/// Score caption outside of a running analysis.
pub fn score_text(score: Option<u8>) -> String {
    match score {
        Some(score) => format!("{score} Overall score"),
        None => "Awaiting analysis".to_owned(),
    }
}
