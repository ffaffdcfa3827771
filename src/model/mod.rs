// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A session holds one document: its text, the edit spans anchored to it and the keyword markers
//! waiting to be placed.

pub mod document;
pub mod ids;
pub mod session;
pub mod span;
pub mod text;

pub use document::Document;
pub use ids::{Id, IdError, KeywordId, SessionId, SpanId};
pub use session::Session;
pub use span::{Category, EditSpan, KeywordMarker};
