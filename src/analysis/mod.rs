// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Turning a completion service reply into a reviewable document.
//!
//! The reply is untrusted: lists may be missing or of the wrong type, individual records may be
//! garbage, offsets may be stale. Only a body that is not a JSON object at all fails the batch.

use std::collections::HashSet;
use std::fmt;

use schemars::{JsonSchema, Schema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::align::{
    align_suggestions_with_report, lenient_opt_string, lenient_string, DroppedSuggestion,
    RawSuggestion,
};
use crate::model::ids::unique_id;
use crate::model::{Document, KeywordId, KeywordMarker};

mod prompt;
mod tracker;

pub use prompt::{analysis_messages, AnalysisRequest, ChatMessage, ResponseFormat, Role};
pub use tracker::{RequestTracker, Ticket};

pub const DEFAULT_KEYWORD_DESCRIPTION: &str = "Suggested keyword to add";

/// A keyword proposal as produced by the completion service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawKeyword {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    #[schemars(with = "Option<String>")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub keyword: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    #[schemars(with = "Option<String>")]
    pub description: Option<String>,
}

/// Top-level reply shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResponse {
    /// Overall quality from 0 to 100.
    #[serde(default, deserialize_with = "lenient_score")]
    #[schemars(with = "Option<f64>")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    #[schemars(with = "Vec<RawSuggestion>")]
    pub suggestions: Vec<RawSuggestion>,
    #[serde(default, deserialize_with = "lenient_list")]
    #[schemars(with = "Vec<RawKeyword>")]
    pub keywords: Vec<RawKeyword>,
}

fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().filter(|score| score.is_finite()),
        _ => None,
    })
}

/// Non-arrays read as empty; elements that are not records of the right shape read as defaults.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

/// An analysis ready for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub document: Document,
    pub score: Option<u8>,
    pub dropped: Vec<DroppedSuggestion>,
}

impl Analysis {
    /// Suggestions that could not be anchored onto the text.
    pub fn dropped_suggestions(&self) -> usize {
        self.dropped.len()
    }
}

#[derive(Debug)]
pub enum AnalysisError {
    Empty,
    Malformed { source: serde_json::Error },
    NotAnObject { found: &'static str },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("analysis response is empty"),
            Self::Malformed { source } => write!(f, "analysis response is not JSON: {source}"),
            Self::NotAnObject { found } => {
                write!(f, "analysis response must be a JSON object (got {found})")
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed { source } => Some(source),
            Self::Empty | Self::NotAnObject { .. } => None,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses a raw reply and anchors its suggestions onto `text`.
pub fn parse_analysis(raw_json: &str, text: &str) -> Result<Analysis, AnalysisError> {
    if raw_json.trim().is_empty() {
        return Err(AnalysisError::Empty);
    }

    let value: Value =
        serde_json::from_str(raw_json).map_err(|source| AnalysisError::Malformed { source })?;
    if !value.is_object() {
        return Err(AnalysisError::NotAnObject {
            found: json_kind(&value),
        });
    }
    let response: AnalysisResponse =
        serde_json::from_value(value).map_err(|source| AnalysisError::Malformed { source })?;

    Ok(analysis_from_response(&response, text))
}

/// Builds the reviewable document from an already-decoded reply.
pub fn analysis_from_response(response: &AnalysisResponse, text: &str) -> Analysis {
    let alignment = align_suggestions_with_report(&response.suggestions, text);
    let keywords = normalize_keywords(&response.keywords);
    let score = response.score.and_then(normalize_score);

    info!(
        spans = alignment.spans.len(),
        keywords = keywords.len(),
        score,
        "parsed analysis"
    );

    Analysis {
        document: Document::new(text)
            .with_spans(alignment.spans)
            .with_keywords(keywords),
        score,
        dropped: alignment.dropped,
    }
}

/// Rounds and clamps to `0..=100`; non-finite scores are absent.
pub fn normalize_score(score: f64) -> Option<u8> {
    score
        .is_finite()
        .then(|| score.round().clamp(0.0, 100.0) as u8)
}

/// Trims keyword text, drops blank entries, and fills in ids and descriptions.
///
/// Positional ids (`kw-{index}`) count every input entry, including dropped ones.
pub fn normalize_keywords(raw: &[RawKeyword]) -> Vec<KeywordMarker> {
    let mut used = HashSet::<KeywordId>::new();
    let mut out = Vec::with_capacity(raw.len());

    for (index, item) in raw.iter().enumerate() {
        let keyword = item.keyword.trim();
        if keyword.is_empty() {
            debug!(index, "dropping blank keyword");
            continue;
        }
        let id: KeywordId = unique_id(item.id.as_deref(), "kw", index, &used);
        used.insert(id.clone());
        let description = item
            .description
            .as_deref()
            .filter(|description| !description.is_empty())
            .unwrap_or(DEFAULT_KEYWORD_DESCRIPTION);
        out.push(KeywordMarker {
            id,
            keyword: keyword.into(),
            description: description.to_owned(),
        });
    }
    out
}

/// JSON Schema describing [`AnalysisResponse`], for structured-output requests.
pub fn analysis_response_schema() -> Schema {
    schemars::schema_for!(AnalysisResponse)
}

#[cfg(test)]
mod tests;
