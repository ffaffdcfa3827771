// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::document::Document;
use super::ids::SessionId;

/// One analysed draft, as kept in the history list.
///
/// A later analysis saved under the same id replaces the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    session_id: SessionId,
    title: String,
    document: Document,
    score: Option<u8>,
    updated_at_ms: u64,
}

impl Session {
    pub fn new(session_id: SessionId, title: impl Into<String>, document: Document) -> Self {
        Self {
            session_id,
            title: title.into(),
            document,
            score: None,
            updated_at_ms: 0,
        }
    }

    pub fn with_score(mut self, score: Option<u8>) -> Self {
        self.score = score;
        self
    }

    pub fn with_updated_at_ms(mut self, updated_at_ms: u64) -> Self {
        self.updated_at_ms = updated_at_ms;
        self
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Replaces the document after a mutation. Title and score describe the analysis and stay.
    pub fn set_document(&mut self, document: Document) {
        self.document = document;
    }

    pub fn score(&self) -> Option<u8> {
        self.score
    }

    pub fn updated_at_ms(&self) -> u64 {
        self.updated_at_ms
    }

    pub fn set_updated_at_ms(&mut self, updated_at_ms: u64) {
        self.updated_at_ms = updated_at_ms;
    }
}
