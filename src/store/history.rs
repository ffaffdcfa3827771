// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{write_atomic, StoreError, WriteDurability};
use crate::model::ids::positional_id;
use crate::model::{Document, Session, SessionId};
use crate::query::counts::whitespace_run;

/// Sessions kept in the history; older ones are evicted.
pub const MAX_SESSIONS: usize = 12;
pub const UNTITLED: &str = "Untitled note";
const TITLE_MAX_CHARS: usize = 64;
const HISTORY_VERSION: u32 = 1;

/// List title for a draft: whitespace runs collapsed, trimmed, cut after 64 characters.
pub fn session_title(text: &str) -> String {
    let collapsed = whitespace_run().replace_all(text, " ");
    let cleaned = collapsed.trim();
    if cleaned.is_empty() {
        return UNTITLED.to_owned();
    }

    match cleaned.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => {
            let mut title = cleaned[..cut].to_owned();
            title.push('…');
            title
        }
        None => cleaned.to_owned(),
    }
}

/// Id for a session first saved at `now_ms`.
pub fn new_session_id(now_ms: u64) -> SessionId {
    positional_id("session", now_ms)
}

/// Saved sessions, most recently analysed first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHistory {
    sessions: Vec<Session>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, session_id: &SessionId) -> Option<&Session> {
        self.sessions
            .iter()
            .find(|session| session.session_id() == session_id)
    }

    pub fn latest(&self) -> Option<&Session> {
        self.sessions.first()
    }

    /// Saves `session` at the front, replacing any session with the same id.
    ///
    /// Returns the sessions evicted to stay within [`MAX_SESSIONS`].
    pub fn upsert(&mut self, session: Session) -> Vec<Session> {
        let session_id = session.session_id().clone();
        self.sessions
            .retain(|existing| existing.session_id() != &session_id);
        self.sessions.insert(0, session);

        let evicted = if self.sessions.len() > MAX_SESSIONS {
            self.sessions.split_off(MAX_SESSIONS)
        } else {
            Vec::new()
        };
        for session in &evicted {
            debug!(session_id = %session.session_id(), "evicting session from history");
        }
        evicted
    }

    /// Stores the reviewed document for `session_id` without changing its position.
    ///
    /// Returns `false` when no such session exists.
    pub fn replace_document(
        &mut self,
        session_id: &SessionId,
        document: Document,
        updated_at_ms: u64,
    ) -> bool {
        let Some(session) = self
            .sessions
            .iter_mut()
            .find(|session| session.session_id() == session_id)
        else {
            return false;
        };
        session.set_document(document);
        session.set_updated_at_ms(updated_at_ms);
        true
    }

    pub fn remove(&mut self, session_id: &SessionId) -> Option<Session> {
        let index = self
            .sessions
            .iter()
            .position(|session| session.session_id() == session_id)?;
        Some(self.sessions.remove(index))
    }
}

#[derive(Serialize)]
struct HistoryOut<'a> {
    version: u32,
    sessions: &'a [Session],
}

#[derive(Deserialize)]
struct HistoryIn {
    version: u32,
    #[serde(default)]
    sessions: Vec<Session>,
}

/// The history as a single JSON file.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    /// Loads the history; a missing file is an empty history.
    pub fn load(&self) -> Result<SessionHistory, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no history file yet");
                return Ok(SessionHistory::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let file: HistoryIn = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        if file.version != HISTORY_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: self.path.clone(),
                version: file.version,
            });
        }

        let mut sessions = file.sessions;
        sessions.truncate(MAX_SESSIONS);
        Ok(SessionHistory { sessions })
    }

    pub fn save(&self, history: &SessionHistory) -> Result<(), StoreError> {
        let out = HistoryOut {
            version: HISTORY_VERSION,
            sessions: history.sessions(),
        };
        let mut json = serde_json::to_vec_pretty(&out).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        json.push(b'\n');

        write_atomic(&self.path, &json, self.durability)?;
        info!(path = ?self.path, sessions = history.len(), "saved session history");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
