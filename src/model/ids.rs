// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A stable identifier for spans, keyword markers and sessions.
///
/// Ids come from an external model and are otherwise opaque; the only enforced rule is that an id
/// is a non-empty string without `/`, so it can be used as a CLI argument and as a history key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsSlash,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsSlash => f.write_str("id must not contain '/'"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.contains('/') {
        return Err(IdError::ContainsSlash);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpanIdTag {}
pub type SpanId = Id<SpanIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeywordIdTag {}
pub type KeywordId = Id<KeywordIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionIdTag {}
pub type SessionId = Id<SessionIdTag>;

/// Builds `{prefix}-{index}`, the positional id used when a raw record carries none.
pub(crate) fn positional_id<T>(prefix: &str, index: impl itoa::Integer) -> Id<T> {
    let mut buf = itoa::Buffer::new();
    let digits = buf.format(index);
    let mut value = String::with_capacity(prefix.len() + 1 + digits.len());
    value.push_str(prefix);
    value.push('-');
    value.push_str(digits);
    Id {
        value,
        _marker: PhantomData,
    }
}

/// Picks an id for the record at `index` that is not in `used`.
///
/// A valid raw id wins when free. Otherwise the positional `{prefix}-{index}` is used, and if that
/// is taken too, `{prefix}-{index}-{n}` for the first free `n`.
pub(crate) fn unique_id<T>(
    raw: Option<&str>,
    prefix: &str,
    index: usize,
    used: &HashSet<Id<T>>,
) -> Id<T>
where
    T: Eq + std::hash::Hash,
{
    if let Some(id) = raw.and_then(|raw| Id::new(raw).ok()) {
        if !used.contains(&id) {
            return id;
        }
    }

    let fallback = positional_id(prefix, index);
    if !used.contains(&fallback) {
        return fallback;
    }

    let base = fallback.into_string();
    let mut suffix = 1_usize;
    loop {
        let candidate = positional_id(&base, suffix);
        if !used.contains(&candidate) {
            return candidate;
        }
        suffix = suffix.saturating_add(1);
    }
}
