// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A suggestion as produced by the completion service, before alignment.
///
/// Every field is read leniently: wrong JSON types degrade to "absent" instead of failing the
/// record, so a sloppy model reply loses single fields rather than whole suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawSuggestion {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    #[schemars(with = "Option<String>")]
    pub id: Option<String>,
    #[serde(default, rename = "type", alias = "category", deserialize_with = "lenient_opt_string")]
    #[schemars(with = "Option<String>")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    #[schemars(with = "Option<String>")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    #[schemars(with = "Option<String>")]
    pub description: Option<String>,
    /// Exact text span the suggestion refers to.
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub original: String,
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub replacement: String,
    /// Character offset hint; may be stale.
    #[serde(default, deserialize_with = "lenient_index")]
    #[schemars(with = "Option<i64>")]
    pub start_index: Option<i64>,
    /// Exclusive end offset hint; may be stale.
    #[serde(default, deserialize_with = "lenient_index")]
    #[schemars(with = "Option<i64>")]
    pub end_index: Option<i64>,
}

impl RawSuggestion {
    pub fn new(original: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            replacement: replacement.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_hint(mut self, start_index: i64, end_index: i64) -> Self {
        self.start_index = Some(start_index);
        self.end_index = Some(end_index);
        self
    }

    pub fn with_start_hint(mut self, start_index: i64) -> Self {
        self.start_index = Some(start_index);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        _ => String::new(),
    })
}

pub(crate) fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    })
}

/// Integers, and floats without a fractional part, are hints; anything else is absent.
pub(crate) fn lenient_index<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    Ok(integer_value(&Value::deserialize(deserializer)?))
}

fn integer_value(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
