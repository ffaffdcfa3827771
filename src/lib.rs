// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Marginalia: anchored writing suggestions for an editor.
//!
//! A completion model proposes edits as `(original, replacement)` pairs with rough offsets.
//! [`align`] anchors them onto the exact text, [`ops`] applies accept, dismiss, and keyword
//! insertion decisions while keeping every remaining span aligned, and [`render`] paints the
//! result. Sessions persist through [`store`].

pub mod align;
pub mod analysis;
pub mod model;
pub mod ops;
pub mod query;
pub mod render;
pub mod store;
pub mod ui;
