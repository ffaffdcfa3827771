// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Where the completion service key lives.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{write_atomic_with_mode, StoreError, WriteDurability};

pub const API_KEY_ENV: &str = "MARGINALIA_API_KEY";

/// Owner read/write only.
const KEY_FILE_MODE: u32 = 0o600;

/// Loads an optional secret at startup and saves it on demand.
pub trait SecretStore {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, secret: &str) -> Result<(), StoreError>;
}

/// A secret kept as the single line of a file.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
    durability: WriteDurability,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::Durable,
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SecretStore for FileSecretStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(non_blank(raw.lines().next().unwrap_or_default())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Rejects blank secrets and secrets spanning more than one line.
    fn save(&self, secret: &str) -> Result<(), StoreError> {
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidSecret {
                reason: "secret is empty",
            });
        }
        if trimmed.contains(['\n', '\r']) {
            return Err(StoreError::InvalidSecret {
                reason: "secret must be a single line",
            });
        }

        let mut line = trimmed.to_owned();
        line.push('\n');
        write_atomic_with_mode(&self.path, line.as_bytes(), self.durability, Some(KEY_FILE_MODE))?;

        info!(path = ?self.path, "saved api key");
        Ok(())
    }
}

/// A secret read from an environment variable. Saving is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvSecret {
    fn default() -> Self {
        Self::new(API_KEY_ENV)
    }
}

impl SecretStore for EnvSecret {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(env::var(&self.var).ok().as_deref().and_then(non_blank))
    }

    fn save(&self, _secret: &str) -> Result<(), StoreError> {
        Err(StoreError::ReadOnly {
            store: "environment secret",
        })
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
