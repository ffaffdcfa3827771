// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use memchr::memmem;
use smallvec::SmallVec;

/// Character offsets of matches. Most snippets occur a handful of times at most.
pub type Occurrences = SmallVec<[usize; 4]>;

/// Every non-overlapping occurrence of `needle` in `haystack`, left to right, as char offsets.
///
/// After a match the scan resumes at the match end. An empty needle never matches.
pub fn find_occurrences(haystack: &str, needle: &str) -> Occurrences {
    let mut occurrences = Occurrences::new();
    if needle.is_empty() || needle.len() > haystack.len() {
        return occurrences;
    }

    let finder = memmem::Finder::new(needle.as_bytes());
    let bytes = haystack.as_bytes();
    let needle_chars = needle.chars().count();

    // Byte matches of valid UTF-8 always start on char boundaries, so the char offset can be
    // advanced incrementally from the previous match end.
    let mut byte_pos = 0usize;
    let mut char_pos = 0usize;
    while let Some(found) = finder.find(&bytes[byte_pos..]) {
        let match_byte = byte_pos + found;
        char_pos += haystack[byte_pos..match_byte].chars().count();
        occurrences.push(char_pos);

        byte_pos = match_byte + needle.len();
        char_pos += needle_chars;
    }

    occurrences
}

/// The occurrence numerically closest to `hint`.
///
/// Ties keep the earlier occurrence: a later candidate only wins when strictly closer.
pub fn nearest_to_hint(occurrences: &[usize], hint: usize) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for &candidate in occurrences {
        let distance = candidate.abs_diff(hint);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(offset, _)| offset)
}
