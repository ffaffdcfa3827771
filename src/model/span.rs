// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;

use super::ids::{KeywordId, SpanId};
use super::text::char_slice;

/// Descriptive tag carried by a suggestion. Alignment and mutation never look at it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Correctness,
    #[default]
    Clarity,
    Engagement,
    Delivery,
    /// A tag outside the known set, kept verbatim.
    Other(SmolStr),
}

impl Category {
    pub const KNOWN: [Category; 4] = [
        Category::Correctness,
        Category::Clarity,
        Category::Engagement,
        Category::Delivery,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Correctness => "correctness",
            Self::Clarity => "clarity",
            Self::Engagement => "engagement",
            Self::Delivery => "delivery",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Maps a raw tag onto the known set, case-insensitively.
    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "correctness" => Self::Correctness,
            "clarity" => Self::Clarity,
            "engagement" => Self::Engagement,
            "delivery" => Self::Delivery,
            _ => Self::Other(SmolStr::new(trimmed)),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Correctness => "Correctness",
            Self::Clarity => "Clarity",
            Self::Engagement => "Engagement",
            Self::Delivery => "Delivery",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = SmolStr::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

/// One anchored replacement suggestion.
///
/// `start_index..end_index` is a half-open character range into the document text, and
/// `original` is the text expected there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSpan {
    pub id: SpanId,
    pub start_index: usize,
    pub end_index: usize,
    #[serde(default)]
    pub category: Category,
    pub original: String,
    pub replacement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EditSpan {
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `original` still matches `text` at this span's offsets.
    pub fn is_anchored_in(&self, text: &str) -> bool {
        self.end_index > self.start_index
            && char_slice(text, self.start_index, self.end_index) == self.original
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start_index <= offset && offset < self.end_index
    }

    pub(crate) fn shift(&mut self, delta: isize) {
        self.start_index = self.start_index.saturating_add_signed(delta);
        self.end_index = self.end_index.saturating_add_signed(delta);
    }
}

/// A proposed keyword insertion. Unpositioned until the user picks an insertion point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMarker {
    pub id: KeywordId,
    pub keyword: SmolStr,
    pub description: String,
}
