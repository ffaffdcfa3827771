// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Character-offset helpers.
//!
//! Every offset in the public API counts Unicode scalar values, not bytes. These helpers convert
//! between the two and never panic on out-of-range offsets.

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the character at `char_offset`, or `None` when past the end.
///
/// `char_offset == char_len(text)` maps to `text.len()`.
pub fn byte_offset(text: &str, char_offset: usize) -> Option<usize> {
    if char_offset == 0 {
        return Some(0);
    }
    let mut seen = 0usize;
    for (byte_idx, _) in text.char_indices() {
        if seen == char_offset {
            return Some(byte_idx);
        }
        seen += 1;
    }
    (seen == char_offset).then_some(text.len())
}

/// Character offset of the byte offset `byte_idx`, which must sit on a char boundary.
pub(crate) fn char_offset_of_byte(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}

/// Slice `[start, end)` in characters, clipped to the text. Empty when the range is inverted.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let Some(from) = byte_offset(text, start) else {
        return "";
    };
    let to = byte_offset(text, end).unwrap_or(text.len());
    &text[from..to]
}

/// The character at `char_offset`, if any.
pub fn char_at(text: &str, char_offset: usize) -> Option<char> {
    text.chars().nth(char_offset)
}

/// Replaces the character range `[start, end)` with `replacement` and returns the new text.
///
/// Offsets beyond the text are clipped to its end.
pub(crate) fn splice(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let from = byte_offset(text, start).unwrap_or(text.len());
    let to = byte_offset(text, end.max(start)).unwrap_or(text.len());
    let mut out = String::with_capacity(text.len() - (to - from) + replacement.len());
    out.push_str(&text[..from]);
    out.push_str(replacement);
    out.push_str(&text[to..]);
    out
}
