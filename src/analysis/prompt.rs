// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str = "You are a concise writing assistant that returns JSON describing \
suggestions to improve academic emails. Keep outputs short and actionable.";

const USER_PROMPT_HEAD: &str = r#"Analyze the following text and respond with a JSON object containing:
- "score": integer from 0-100 (higher is better).
- "suggestions": up to 6 items. Each item must have id, type ("correctness", "clarity", "engagement", or "delivery"), title, description, original (exact text span), replacement (improved version), startIndex, endIndex (character offsets in the provided text, endIndex exclusive).
- "keywords": up to 3 missing keywords to add, each with id, keyword, and description.

Use character indexes based on the exact text. If the text is already strong, keep arrays short.

Text to analyze:
""""#;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The system and user messages asking for an analysis of `text`.
pub fn analysis_messages(text: &str) -> [ChatMessage; 2] {
    let mut user = String::with_capacity(USER_PROMPT_HEAD.len() + text.len() + 3);
    user.push_str(USER_PROMPT_HEAD);
    user.push_str(text);
    user.push_str(r#"""""#);

    [
        ChatMessage {
            role: Role::System,
            content: SYSTEM_PROMPT.to_owned(),
        },
        ChatMessage {
            role: Role::User,
            content: user,
        },
    ]
}

/// Chat-completions request body for an analysis. Sending it is up to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub model: String,
    pub messages: [ChatMessage; 2],
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl AnalysisRequest {
    pub fn new(text: &str) -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            messages: analysis_messages(text),
            temperature: 0.2,
            max_tokens: 600,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
