// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal output for rendered segments.

use std::fmt::Write as _;

use crossterm::style::{style, Color, Stylize};

use super::Segment;
use crate::model::{Category, SpanId};

const KEYWORD_BAR: Color = Color::Rgb {
    r: 0x8b,
    g: 0x5c,
    b: 0xf6,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnsiOptions {
    /// Emit ANSI escapes. Without them highlights are bracketed and the caret is `|`.
    pub color: bool,
    /// Span painted with a background, as when hovered or selected.
    pub active: Option<SpanId>,
}

/// Underline color per category.
pub fn category_bar(category: &Category) -> Color {
    match category {
        Category::Correctness => Color::Rgb {
            r: 0xef,
            g: 0x44,
            b: 0x44,
        },
        Category::Clarity => Color::Rgb {
            r: 0x3b,
            g: 0x82,
            b: 0xf6,
        },
        Category::Engagement => Color::Rgb {
            r: 0x10,
            g: 0xb9,
            b: 0x81,
        },
        Category::Delivery => Color::Rgb {
            r: 0xf5,
            g: 0x9e,
            b: 0x0b,
        },
        Category::Other(_) => Color::DarkGrey,
    }
}

fn category_background(category: &Category) -> Color {
    match category {
        Category::Correctness => Color::Rgb {
            r: 0xfe,
            g: 0xe2,
            b: 0xe2,
        },
        Category::Clarity => Color::Rgb {
            r: 0xdb,
            g: 0xea,
            b: 0xfe,
        },
        Category::Engagement => Color::Rgb {
            r: 0xd1,
            g: 0xfa,
            b: 0xe5,
        },
        Category::Delivery => Color::Rgb {
            r: 0xfe,
            g: 0xf3,
            b: 0xc7,
        },
        Category::Other(_) => Color::Grey,
    }
}

pub fn paint_ansi(segments: &[Segment<'_>], options: &AnsiOptions) -> String {
    let mut out = String::new();
    for segment in segments {
        // Writing into a String cannot fail.
        let _ = match segment {
            Segment::Plain(text) => write!(out, "{text}"),
            Segment::Caret if options.color => {
                write!(out, "{}", style("▏").with(KEYWORD_BAR).bold())
            }
            Segment::Caret => write!(out, "|"),
            Segment::Highlight { span, text } if options.color => {
                let styled = style(*text).with(category_bar(&span.category)).underlined();
                if options.active.as_ref() == Some(&span.id) {
                    write!(
                        out,
                        "{}",
                        styled.on(category_background(&span.category)).bold()
                    )
                } else {
                    write!(out, "{styled}")
                }
            }
            Segment::Highlight { span, text } => {
                if options.active.as_ref() == Some(&span.id) {
                    write!(out, "[[{text}]]")
                } else {
                    write!(out, "[{text}]")
                }
            }
        };
    }
    out
}
