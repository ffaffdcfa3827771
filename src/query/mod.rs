// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over documents and their spans.
//!
//! Queries provide derived views (display order, overlaps, summaries) that power the renderer
//! and the CLI. None of them mutate or re-sort the stored span list.

pub mod counts;
pub mod spans;

pub use counts::{category_counts, word_count, CategoryCounts};
pub use spans::{
    adjacent_pairs, display_order, overlapping_pairs, span_at_offset, span_search,
    SpanSearchMode,
};
